//! Stroke rasterization for the placement guides.
//!
//! A pixel `(x, y)` is sampled at its centre `(x + 0.5, y + 0.5)` and painted
//! with full ink when that centre lies within half the stroke width of the
//! shape. Everything is clipped to the canvas.

use image::Rgb;

use crate::Canvas;

/// Draw a straight segment between two grid points.
pub fn draw_line(
    canvas: &mut Canvas,
    from: (i64, i64),
    to: (i64, i64),
    ink: Rgb<u8>,
    stroke_px: f32,
) {
    let half = f64::from(stroke_px) / 2.0;
    let (ax, ay) = (from.0 as f64, from.1 as f64);
    let (bx, by) = (to.0 as f64, to.1 as f64);
    let pad = half.ceil() as i64 + 1;
    let (x_lo, x_hi) = span(from.0.min(to.0) - pad, from.0.max(to.0) + pad, canvas.width());
    let (y_lo, y_hi) = span(from.1.min(to.1) - pad, from.1.max(to.1) + pad, canvas.height());

    let (dx, dy) = (bx - ax, by - ay);
    let len2 = dx * dx + dy * dy;
    for y in y_lo..y_hi {
        for x in x_lo..x_hi {
            let (px, py) = (x as f64 + 0.5, y as f64 + 0.5);
            let t = if len2 > 0.0 {
                (((px - ax) * dx + (py - ay) * dy) / len2).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let (qx, qy) = (ax + t * dx - px, ay + t * dy - py);
            if qx * qx + qy * qy <= half * half {
                canvas.blend_pixel(x, y, ink, 1.0);
            }
        }
    }
}

/// Draw a circle outline of `radius` around the grid point `center`.
pub fn draw_circle(
    canvas: &mut Canvas,
    center: (i64, i64),
    radius: f32,
    ink: Rgb<u8>,
    stroke_px: f32,
) {
    let half = f64::from(stroke_px) / 2.0;
    let r = f64::from(radius);
    let (cx, cy) = (center.0 as f64, center.1 as f64);
    let reach = (r + half).ceil() as i64 + 1;
    let (x_lo, x_hi) = span(center.0 - reach, center.0 + reach, canvas.width());
    let (y_lo, y_hi) = span(center.1 - reach, center.1 + reach, canvas.height());

    for y in y_lo..y_hi {
        for x in x_lo..x_hi {
            let (px, py) = (x as f64 + 0.5 - cx, y as f64 + 0.5 - cy);
            let d = (px * px + py * py).sqrt();
            if (d - r).abs() <= half {
                canvas.blend_pixel(x, y, ink, 1.0);
            }
        }
    }
}

/// Clamp `[lo, hi]` to the pixel range `[0, limit)`, as a half-open range.
fn span(lo: i64, hi: i64, limit: u32) -> (i64, i64) {
    (lo.max(0), (hi + 1).min(i64::from(limit)))
}
