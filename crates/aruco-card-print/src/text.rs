//! Label typesetting with the embedded DejaVu Sans face.

use ab_glyph::{point, Font, FontRef, GlyphId, PxScale, ScaleFont};
use image::Rgb;

use crate::{Canvas, CardError};

static DEJAVU_SANS: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

/// A font face fixed at one pixel size.
#[derive(Clone, Debug)]
pub struct LabelFont {
    font: FontRef<'static>,
    scale: PxScale,
}

impl LabelFont {
    /// The bundled sans-serif face at `px_height` pixels.
    pub fn embedded(px_height: f32) -> Result<Self, CardError> {
        let font = FontRef::try_from_slice(DEJAVU_SANS)?;
        Ok(Self {
            font,
            scale: PxScale::from(px_height),
        })
    }

    /// Advance width of `text` in pixels, kerning included.
    pub fn measure(&self, text: &str) -> f32 {
        let scaled = self.font.as_scaled(self.scale);
        let mut width = 0.0;
        let mut prev: Option<GlyphId> = None;
        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(p) = prev {
                width += scaled.kern(p, id);
            }
            width += scaled.h_advance(id);
            prev = Some(id);
        }
        width
    }

    /// Draw `text` with its origin at `(x, baseline)`; coverage is blended
    /// over the canvas and anything outside it is dropped.
    pub fn draw(&self, canvas: &mut Canvas, text: &str, x: f32, baseline: f32, ink: Rgb<u8>) {
        let scaled = self.font.as_scaled(self.scale);
        let mut caret = x;
        let mut prev: Option<GlyphId> = None;
        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(p) = prev {
                caret += scaled.kern(p, id);
            }
            let glyph = id.with_scale_and_position(self.scale, point(caret, baseline));
            caret += scaled.h_advance(id);
            prev = Some(id);

            let Some(outlined) = self.font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            let (ox, oy) = (bounds.min.x as i64, bounds.min.y as i64);
            outlined.draw(|gx, gy, coverage| {
                canvas.blend_pixel(ox + i64::from(gx), oy + i64::from(gy), ink, coverage);
            });
        }
    }
}
