//! Core types shared by the ArUco card crates.
//!
//! This crate is intentionally small: a plain grayscale raster type used for
//! synthesized markers and decoding, plus the process-wide logger setup. It
//! does *not* depend on any concrete image library.

mod image;
mod logger;

pub use image::{GrayImage, GrayImageView, ImageError};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
