//! The drawing stages of the card pipeline.
//!
//! Each stage takes the canvas by value and returns it; [`compose_card`]
//! chains them as marker, guides, labels, logo.

use std::path::Path;

use aruco_card_aruco::render_marker;
use image::imageops::{self, FilterType};
use image::RgbaImage;
use log::{debug, warn};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::draw::{draw_circle, draw_line};
use crate::{Canvas, CardConfig, CardError, Element, LabelFont};

/// Validate `cfg` and allocate a background-filled canvas.
pub fn init_canvas(cfg: &CardConfig) -> Result<Canvas, CardError> {
    cfg.validate()?;
    let (w, h) = cfg.canvas_size();
    debug!("canvas {w}x{h} px at {} dpi", cfg.dpi);
    Ok(Canvas::new(w, h, cfg.background))
}

/// Render the configured marker and copy it to the top-left margin.
#[cfg_attr(feature = "tracing", instrument(level = "debug", skip_all, fields(id = cfg.marker_id)))]
pub fn composite_marker(mut canvas: Canvas, cfg: &CardConfig) -> Result<Canvas, CardError> {
    let side = cfg.marker_side_px() as usize;
    let marker = render_marker(cfg.dictionary, cfg.marker_id, side, cfg.marker_border_bits)?;
    let at = i64::from(cfg.margin_px);
    canvas.blit_gray(Element::Marker, &marker, at, at)?;
    debug!(
        "marker {} of {} ({side}x{side} px) at ({at}, {at})",
        cfg.marker_id, cfg.dictionary.name
    );
    Ok(canvas)
}

/// Draw the key-blade cross right of centre and the key-head circle left of it.
#[cfg_attr(feature = "tracing", instrument(level = "debug", skip_all))]
pub fn draw_guides(mut canvas: Canvas, cfg: &CardConfig) -> Result<Canvas, CardError> {
    let layout = cfg.guide_layout();
    let (cx, cy) = layout.cross_center;
    let half = layout.half_span();
    draw_line(&mut canvas, (cx - half, cy), (cx + half, cy), cfg.ink, cfg.stroke_px);
    draw_line(&mut canvas, (cx, cy - half), (cx, cy + half), cfg.ink, cfg.stroke_px);
    draw_circle(
        &mut canvas,
        layout.circle_center,
        layout.circle_radius() as f32,
        cfg.ink,
        cfg.stroke_px,
    );
    debug!(
        "cross at {:?}, circle at {:?}, size {} px",
        layout.cross_center, layout.circle_center, layout.size_px
    );
    Ok(canvas)
}

/// Draw both instruction lines, horizontally centred.
///
/// Text wider than the canvas is clipped, not rejected.
#[cfg_attr(feature = "tracing", instrument(level = "debug", skip_all))]
pub fn draw_labels(mut canvas: Canvas, cfg: &CardConfig) -> Result<Canvas, CardError> {
    let font = LabelFont::embedded(cfg.label_px_height)?;
    let (top, bottom) = cfg.label_baselines();
    let canvas_w = canvas.width() as f32;
    for (text, baseline) in [(&cfg.top_label, top), (&cfg.bottom_label, bottom)] {
        let width = font.measure(text);
        let x = ((canvas_w - width) / 2.0).floor();
        if width > canvas_w {
            warn!("label is {width:.0} px wide and will be clipped: {text:?}");
        }
        font.draw(&mut canvas, text, x, baseline as f32, cfg.ink);
        debug!("label at ({x}, {baseline}), {width:.1} px wide");
    }
    Ok(canvas)
}

/// Decode the logo file as RGBA.
pub fn load_logo(path: &Path) -> Result<RgbaImage, CardError> {
    let img = image::open(path).map_err(|source| CardError::AssetNotFound {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(img.to_rgba8())
}

/// Scale `logo` to `width` pixels, keeping its aspect ratio.
///
/// The height is `floor(h * width / w)`, at least one pixel.
pub fn resize_logo(logo: &RgbaImage, width: u32) -> RgbaImage {
    let (w, h) = logo.dimensions();
    let height = ((u64::from(h) * u64::from(width)) / u64::from(w.max(1))).max(1) as u32;
    imageops::resize(logo, width.max(1), height, FilterType::Triangle)
}

/// Load, resize and place the logo at the top-right margin.
#[cfg_attr(feature = "tracing", instrument(level = "debug", skip_all, fields(path = %cfg.logo_path.display())))]
pub fn composite_logo(mut canvas: Canvas, cfg: &CardConfig) -> Result<Canvas, CardError> {
    let logo = load_logo(&cfg.logo_path)?;
    let resized = resize_logo(&logo, cfg.logo_width_px());
    let x = i64::from(canvas.width()) - i64::from(cfg.margin_px) - i64::from(resized.width());
    let y = i64::from(cfg.margin_px);
    canvas.blit_rgba(Element::Logo, &resized, x, y, cfg.logo_blend)?;
    debug!(
        "logo {}x{} -> {}x{} at ({x}, {y}), {:?}",
        logo.width(),
        logo.height(),
        resized.width(),
        resized.height(),
        cfg.logo_blend
    );
    Ok(canvas)
}

/// Run every drawing stage in order.
pub fn compose_card(cfg: &CardConfig) -> Result<Canvas, CardError> {
    let canvas = init_canvas(cfg)?;
    let canvas = composite_marker(canvas, cfg)?;
    let canvas = draw_guides(canvas, cfg)?;
    let canvas = draw_labels(canvas, cfg)?;
    composite_logo(canvas, cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, Rgba};

    #[test]
    fn resize_keeps_aspect() {
        let logo = RgbaImage::from_pixel(400, 150, Rgba([10, 20, 30, 255]));
        let out = resize_logo(&logo, 210);
        assert_eq!(out.dimensions(), (210, 78));

        let tall = RgbaImage::new(3, 1000);
        assert_eq!(resize_logo(&tall, 2).dimensions(), (2, 666));

        let thin = RgbaImage::new(1000, 1);
        assert_eq!(resize_logo(&thin, 210).dimensions(), (210, 1));
    }

    #[test]
    fn guides_follow_layout() {
        let cfg = CardConfig::default();
        let canvas = init_canvas(&cfg).expect("canvas");
        let canvas = draw_guides(canvas, &cfg).expect("guides");
        let ink = Rgb([0, 0, 0]);

        // cross arms through (675, 300)
        assert_eq!(canvas.pixel(661, 300), ink);
        assert_eq!(canvas.pixel(688, 299), ink);
        assert_eq!(canvas.pixel(675, 287), ink);
        assert_eq!(canvas.pixel(674, 313), ink);
        assert_eq!(canvas.pixel(675 + 20, 300), cfg.background);
        // circle of radius 14 around (375, 300)
        assert_eq!(canvas.pixel(389, 300), ink);
        assert_eq!(canvas.pixel(360, 300), ink);
        assert_eq!(canvas.pixel(375, 300), cfg.background);
    }

    #[test]
    fn invalid_marker_id_is_reported() {
        let cfg = CardConfig {
            marker_id: 50,
            ..CardConfig::default()
        };
        let canvas = init_canvas(&cfg).expect("canvas");
        let err = composite_marker(canvas, &cfg).unwrap_err();
        assert!(matches!(
            err,
            CardError::InvalidIdentifier {
                id: 50,
                count: 50,
                ..
            }
        ));
    }

    #[test]
    fn oversized_marker_is_out_of_bounds() {
        let cfg = CardConfig {
            marker_size_in: 2.0,
            ..CardConfig::default()
        };
        let canvas = init_canvas(&cfg).expect("canvas");
        let err = composite_marker(canvas, &cfg).unwrap_err();
        assert!(matches!(
            err,
            CardError::OutOfBounds {
                element: Element::Marker,
                width: 600,
                ..
            }
        ));
    }

    #[test]
    fn labels_stay_in_the_bottom_band() {
        let cfg = CardConfig::default();
        let canvas = init_canvas(&cfg).expect("canvas");
        let canvas = draw_labels(canvas, &cfg).expect("labels");
        for y in 0..500 {
            for x in 0..canvas.width() {
                assert_eq!(canvas.pixel(x, y), cfg.background, "stray ink at ({x}, {y})");
            }
        }
        assert!((545..=575).any(|y| (0..canvas.width()).any(|x| canvas.pixel(x, y) != cfg.background)));
    }
}
