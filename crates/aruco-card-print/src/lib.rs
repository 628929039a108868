//! Printable ArUco card composition and single-page PDF export.
//!
//! The card is built in a fixed sequence of stages, each consuming the
//! [`Canvas`] and handing it to the next:
//!
//! 1. [`init_canvas`] allocates the raster from the physical size and DPI,
//! 2. [`composite_marker`] renders the marker and copies it to the top-left margin,
//! 3. [`draw_guides`] strokes the cross and circle placement guides,
//! 4. [`draw_labels`] centres the two instruction lines near the bottom edge,
//! 5. [`composite_logo`] loads, resizes and places the logo top-right.
//!
//! [`render_card`] runs them, optionally previews the result, and writes the
//! PDF through a temporary PNG that never outlives the export.
//!
//! ```no_run
//! use aruco_card_print::{render_card, CardConfig};
//!
//! # fn main() -> Result<(), aruco_card_print::CardError> {
//! let out = render_card(&CardConfig::default())?;
//! println!("Image saved as {}", out.output_path.display());
//! # Ok(())
//! # }
//! ```

mod canvas;
mod compose;
mod config;
mod draw;
mod error;
mod export;
mod preview;
mod text;

use std::path::PathBuf;

use log::info;

#[cfg(feature = "tracing")]
use tracing::instrument;

pub use canvas::Canvas;
pub use compose::{
    compose_card, composite_logo, composite_marker, draw_guides, draw_labels, init_canvas,
    load_logo, resize_logo,
};
pub use config::{CardConfig, GuideLayout, LogoBlend, PageScale};
pub use draw::{draw_circle, draw_line};
pub use error::{CardError, Element, Stage};
pub use export::{build_pdf, export_pdf, TempRaster};
pub use preview::preview;
pub use text::LabelFont;

/// What [`render_card`] produced.
#[derive(Clone, Debug, PartialEq)]
pub struct CardOutput {
    pub output_path: PathBuf,
    /// PDF page size in points, landscape.
    pub page_size_pt: (f32, f32),
    /// Raster size in pixels.
    pub canvas_size: (u32, u32),
}

/// Compose the card described by `cfg` and write it to `cfg.output_path`.
///
/// Any failure aborts the run before the output file is created.
#[cfg_attr(feature = "tracing", instrument(level = "info", skip_all, fields(out = %cfg.output_path.display())))]
pub fn render_card(cfg: &CardConfig) -> Result<CardOutput, CardError> {
    let canvas = compose_card(cfg)?;
    info!(
        "composed {}x{} card with marker {} of {}",
        canvas.width(),
        canvas.height(),
        cfg.marker_id,
        cfg.dictionary.name
    );

    if cfg.preview {
        if let Err(err) = preview(&canvas) {
            log::warn!("{err}; continuing without preview");
        }
    }

    let output_path = export_pdf(&canvas, cfg)?;
    let page_size_pt = cfg.page_size_pt();
    info!(
        "wrote {} ({}x{} pt)",
        output_path.display(),
        page_size_pt.0,
        page_size_pt.1
    );
    Ok(CardOutput {
        output_path,
        page_size_pt,
        canvas_size: (canvas.width(), canvas.height()),
    })
}
