//! Facade crate for the `aruco-card-*` workspace.
//!
//! Generates a printable business card carrying an ArUco marker, a cross and
//! a circle for placing a key, two instruction lines and a logo, and exports
//! it as a single-page PDF.
//!
//! ## Quickstart
//!
//! ```no_run
//! use aruco_card::{render_card, CardConfig};
//!
//! # fn main() -> Result<(), aruco_card::CardError> {
//! let cfg = CardConfig {
//!     logo_path: "assets/logo.png".into(),
//!     ..CardConfig::default()
//! };
//! let out = render_card(&cfg)?;
//! println!("Image saved as {}", out.output_path.display());
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `aruco_card::core`: grayscale raster type and logger setup.
//! - `aruco_card::aruco`: dictionaries, marker rendering and decoding.
//! - `aruco_card::print`: canvas stages, PDF export and preview.

pub use aruco_card_aruco as aruco;
pub use aruco_card_core as core;
pub use aruco_card_print as print;

pub use aruco_card_print::{render_card, CardConfig, CardError, CardOutput, Stage};
