//! Card pipeline errors, tagged with the stage and element they came from.

use aruco_card_aruco::MarkerRenderError;
use std::fmt;
use std::path::PathBuf;

/// Pipeline stage a failure belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Config,
    Marker,
    Labels,
    Logo,
    Preview,
    Export,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Config => "configuration",
            Stage::Marker => "marker synthesis",
            Stage::Labels => "label rendering",
            Stage::Logo => "logo compositing",
            Stage::Preview => "preview",
            Stage::Export => "document export",
        })
    }
}

/// A raster composited onto the card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Element {
    Marker,
    Logo,
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Element::Marker => "marker",
            Element::Logo => "logo",
        })
    }
}

/// Errors produced while building a card.
#[derive(thiserror::Error, Debug)]
pub enum CardError {
    #[error("invalid card configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid marker id {id}: dictionary {dictionary} has {count} markers")]
    InvalidIdentifier {
        dictionary: &'static str,
        id: u32,
        count: usize,
    },

    #[error(
        "{element} of {width}x{height} at ({x}, {y}) does not fit a {canvas_width}x{canvas_height} canvas"
    )]
    OutOfBounds {
        element: Element,
        x: i64,
        y: i64,
        width: u32,
        height: u32,
        canvas_width: u32,
        canvas_height: u32,
    },

    #[error("cannot load asset {}", .path.display())]
    AssetNotFound {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("embedded label font is invalid")]
    Font(#[from] ab_glyph::InvalidFont),

    #[error("temporary raster {}", .path.display())]
    TempRaster {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    PngEncode(#[from] png::EncodingError),

    #[error(transparent)]
    PngDecode(#[from] png::DecodingError),

    #[error("temporary raster is {0:?}, expected 8-bit RGB")]
    UnexpectedRasterFormat(png::ColorType),

    #[error("preview window failed: {0}")]
    Preview(String),

    #[error("cannot write {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CardError {
    /// Stage that raised this error, for user-facing diagnostics.
    pub fn stage(&self) -> Stage {
        match self {
            CardError::InvalidConfig(_) => Stage::Config,
            CardError::InvalidIdentifier { .. } => Stage::Marker,
            CardError::OutOfBounds { element, .. } => match element {
                Element::Marker => Stage::Marker,
                Element::Logo => Stage::Logo,
            },
            CardError::AssetNotFound { .. } => Stage::Logo,
            CardError::Font(_) => Stage::Labels,
            CardError::Preview(_) => Stage::Preview,
            CardError::TempRaster { .. }
            | CardError::PngEncode(_)
            | CardError::PngDecode(_)
            | CardError::UnexpectedRasterFormat(_)
            | CardError::Io { .. } => Stage::Export,
        }
    }
}

impl From<MarkerRenderError> for CardError {
    fn from(err: MarkerRenderError) -> Self {
        match err {
            MarkerRenderError::InvalidIdentifier {
                dictionary,
                id,
                count,
            } => CardError::InvalidIdentifier {
                dictionary,
                id,
                count,
            },
            other @ MarkerRenderError::TooSmall { .. } => {
                CardError::InvalidConfig(other.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_name_the_failing_step() {
        let err = CardError::OutOfBounds {
            element: Element::Logo,
            x: 900,
            y: 25,
            width: 210,
            height: 90,
            canvas_width: 1050,
            canvas_height: 600,
        };
        assert_eq!(err.stage(), Stage::Logo);
        assert_eq!(
            err.to_string(),
            "logo of 210x90 at (900, 25) does not fit a 1050x600 canvas"
        );

        let err: CardError = MarkerRenderError::InvalidIdentifier {
            dictionary: "DICT_4X4_50",
            id: 60,
            count: 50,
        }
        .into();
        assert_eq!(err.stage(), Stage::Marker);
        assert!(matches!(err, CardError::InvalidIdentifier { id: 60, .. }));
    }

    #[test]
    fn undersized_marker_is_a_config_error() {
        let err: CardError = MarkerRenderError::TooSmall {
            side_px: 3,
            cells: 6,
        }
        .into();
        assert_eq!(err.stage(), Stage::Config);
    }
}
