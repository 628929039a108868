//! ArUco marker dictionaries, synthesis and decoding.
//!
//! This crate focuses on:
//! - embedded built-in dictionaries (compiled into the binary from `data/`),
//! - rendering a marker id into a grayscale bitmap ready for printing,
//! - matching observed marker codes against a dictionary,
//! - decoding a marker from its rectified square, which is how the card tests
//!   check that a printed marker reads back as the id it was rendered from.
//!
//! It does **not** perform quad detection in camera images.

pub mod builtins;
mod dictionary;
mod matcher;
mod render;
mod scan;
mod threshold;

pub use dictionary::{code_from_opencv_bytes, Dictionary};
pub use matcher::{rotate_code_u64, Match, Matcher};
pub use render::{render_marker, MarkerRenderError};
pub use scan::{decode_marker, DecodeConfig, MarkerDetection};
