//! Card layout configuration.

use aruco_card_aruco::{builtins, Dictionary};
use image::Rgb;
use std::path::PathBuf;

use crate::CardError;

/// How the logo is written over the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogoBlend {
    /// Source-over alpha compositing; transparent logo pixels keep the card background.
    #[default]
    Alpha,
    /// Copy the logo's RGB channels verbatim and ignore its alpha.
    Overwrite,
}

/// Physical size of the exported PDF page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PageScale {
    /// Page matches the card's physical size (72 points per inch).
    #[default]
    Physical,
    /// One point per raster pixel.
    PixelPoints,
}

/// Everything that describes one card.
///
/// `Default` yields the 3.5" × 2" business card at 300 DPI with marker 42 of
/// `DICT_4X4_50`, a cross and circle guide for placing a key, two instruction
/// lines and the logo in the top-right corner.
#[derive(Clone, Debug)]
pub struct CardConfig {
    /// Card width in inches.
    pub width_in: f64,
    /// Card height in inches.
    pub height_in: f64,
    /// Raster resolution in dots per inch.
    pub dpi: u32,
    pub dictionary: Dictionary,
    pub marker_id: u32,
    /// Marker side in inches.
    pub marker_size_in: f64,
    /// Width of the marker's black border, in cells.
    pub marker_border_bits: usize,
    /// Inset of marker, logo and bottom label from the canvas edges.
    pub margin_px: u32,
    /// Cross span and circle diameter in millimetres.
    pub guide_size_mm: f64,
    /// Horizontal distance of each guide from the canvas centre.
    pub guide_offset_px: i64,
    pub stroke_px: f32,
    pub ink: Rgb<u8>,
    pub background: Rgb<u8>,
    /// Upper instruction line.
    pub top_label: String,
    /// Lower instruction line, sitting on the bottom margin.
    pub bottom_label: String,
    /// Font em size in pixels.
    pub label_px_height: f32,
    /// Distance between the two label baselines.
    pub label_line_gap_px: u32,
    pub logo_path: PathBuf,
    /// Logo width as a fraction of the canvas width.
    pub logo_width_frac: f64,
    pub logo_blend: LogoBlend,
    pub page_scale: PageScale,
    pub output_path: PathBuf,
    /// Show the composited raster before export.
    pub preview: bool,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            width_in: 3.5,
            height_in: 2.0,
            dpi: 300,
            dictionary: builtins::DICT_4X4_50,
            marker_id: 42,
            marker_size_in: 0.5,
            marker_border_bits: 1,
            margin_px: 25,
            guide_size_mm: 2.5,
            guide_offset_px: 150,
            stroke_px: 2.0,
            ink: Rgb([0, 0, 0]),
            background: Rgb([255, 255, 255]),
            top_label: "Put the key head on the circle and the key blade on the cross".into(),
            bottom_label: "Please take the picture from upright position for better result"
                .into(),
            label_px_height: 24.0,
            label_line_gap_px: 30,
            logo_path: PathBuf::from("FSLlogo.png"),
            logo_width_frac: 0.2,
            logo_blend: LogoBlend::Alpha,
            page_scale: PageScale::Physical,
            output_path: PathBuf::from("aruco_business_card.pdf"),
            preview: false,
        }
    }
}

/// Guide geometry in canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GuideLayout {
    pub cross_center: (i64, i64),
    pub circle_center: (i64, i64),
    /// Full cross span, also the circle diameter.
    pub size_px: i64,
}

impl GuideLayout {
    #[inline]
    pub fn half_span(&self) -> i64 {
        self.size_px / 2
    }

    #[inline]
    pub fn circle_radius(&self) -> i64 {
        self.size_px / 2
    }
}

impl CardConfig {
    /// Reject sizes that cannot produce a card.
    pub fn validate(&self) -> Result<(), CardError> {
        let positive = |name: &str, v: f64| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(CardError::InvalidConfig(format!("{name} must be > 0 (got {v})")))
            }
        };
        positive("width_in", self.width_in)?;
        positive("height_in", self.height_in)?;
        positive("dpi", f64::from(self.dpi))?;
        positive("marker_size_in", self.marker_size_in)?;
        positive("guide_size_mm", self.guide_size_mm)?;
        positive("stroke_px", f64::from(self.stroke_px))?;
        positive("label_px_height", f64::from(self.label_px_height))?;
        positive("logo_width_frac", self.logo_width_frac)?;
        if self.logo_width_frac > 1.0 {
            return Err(CardError::InvalidConfig(format!(
                "logo_width_frac must be <= 1 (got {})",
                self.logo_width_frac
            )));
        }
        let (w, h) = self.canvas_size();
        if w == 0 || h == 0 {
            return Err(CardError::InvalidConfig(format!(
                "canvas of {w}x{h} px is empty"
            )));
        }
        Ok(())
    }

    #[inline]
    fn to_px(&self, inches: f64) -> u32 {
        (inches * f64::from(self.dpi)).floor() as u32
    }

    /// Raster size `(width, height)` in pixels.
    pub fn canvas_size(&self) -> (u32, u32) {
        (self.to_px(self.width_in), self.to_px(self.height_in))
    }

    pub fn marker_side_px(&self) -> u32 {
        self.to_px(self.marker_size_in)
    }

    pub fn guide_size_px(&self) -> i64 {
        self.to_px(self.guide_size_mm / 25.4) as i64
    }

    pub fn logo_width_px(&self) -> u32 {
        let (w, _) = self.canvas_size();
        (self.logo_width_frac * f64::from(w)).floor() as u32
    }

    /// Cross and circle placement around the canvas centre.
    pub fn guide_layout(&self) -> GuideLayout {
        let (w, h) = self.canvas_size();
        let cx = i64::from(w / 2);
        let cy = i64::from(h / 2);
        GuideLayout {
            cross_center: (cx + self.guide_offset_px, cy),
            circle_center: (cx - self.guide_offset_px, cy),
            size_px: self.guide_size_px(),
        }
    }

    /// Baselines `(top, bottom)` of the two labels.
    pub fn label_baselines(&self) -> (i64, i64) {
        let (_, h) = self.canvas_size();
        let bottom = i64::from(h) - i64::from(self.margin_px);
        (bottom - i64::from(self.label_line_gap_px), bottom)
    }

    /// PDF page size `(width, height)` in points, landscape.
    pub fn page_size_pt(&self) -> (f32, f32) {
        let (w, h) = match self.page_scale {
            PageScale::Physical => (self.width_in * 72.0, self.height_in * 72.0),
            PageScale::PixelPoints => {
                let (w, h) = self.canvas_size();
                (f64::from(w), f64::from(h))
            }
        };
        let (w, h) = (w as f32, h as f32);
        if h > w {
            (h, w)
        } else {
            (w, h)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_page(cfg: &CardConfig, w: f32, h: f32) {
        let (pw, ph) = cfg.page_size_pt();
        assert_relative_eq!(pw, w);
        assert_relative_eq!(ph, h);
    }

    #[test]
    fn default_card_dimensions() {
        let cfg = CardConfig::default();
        assert_eq!(cfg.canvas_size(), (1050, 600));
        assert_eq!(cfg.marker_side_px(), 150);
        assert_eq!(cfg.guide_size_px(), 29);
        assert_eq!(cfg.logo_width_px(), 210);
        assert_eq!(cfg.label_baselines(), (545, 575));
        cfg.validate().expect("default config is valid");
    }

    #[test]
    fn guides_sit_either_side_of_centre() {
        let layout = CardConfig::default().guide_layout();
        assert_eq!(layout.cross_center, (675, 300));
        assert_eq!(layout.circle_center, (375, 300));
        assert_eq!(layout.half_span(), 14);
        assert_eq!(layout.circle_radius(), 14);
    }

    #[test]
    fn page_size_follows_scale() {
        let mut cfg = CardConfig::default();
        assert_page(&cfg, 252.0, 144.0);
        cfg.page_scale = PageScale::PixelPoints;
        assert_page(&cfg, 1050.0, 600.0);
    }

    #[test]
    fn portrait_cards_export_landscape_pages() {
        let cfg = CardConfig {
            width_in: 2.0,
            height_in: 3.5,
            ..CardConfig::default()
        };
        assert_eq!(cfg.canvas_size(), (600, 1050));
        assert_page(&cfg, 252.0, 144.0);
    }

    #[test]
    fn rejects_bad_sizes() {
        let cfg = CardConfig {
            dpi: 0,
            ..CardConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(CardError::InvalidConfig(_))));

        let cfg = CardConfig {
            logo_width_frac: 1.5,
            ..CardConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(CardError::InvalidConfig(_))));

        let cfg = CardConfig {
            width_in: f64::NAN,
            ..CardConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
