//! Marker synthesis.

use crate::Dictionary;
use aruco_card_core::GrayImage;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors returned by [`render_marker`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MarkerRenderError {
    #[error("invalid marker id {id}: dictionary {dictionary} has {count} markers")]
    InvalidIdentifier {
        dictionary: &'static str,
        id: u32,
        count: usize,
    },
    #[error("marker side of {side_px}px cannot hold {cells} cells")]
    TooSmall { side_px: usize, cells: usize },
}

/// Render marker `id` of `dict` as a `side_px × side_px` grayscale image.
///
/// The marker is a grid of `marker_size + 2 * border_bits` cells with a black
/// border; inner cells are black (0) for set bits and white (255) otherwise.
/// When `side_px` is not a multiple of the cell count, each pixel takes the
/// cell it falls into (`cell = x * cells / side_px`), so cells differ by at
/// most one pixel.
#[cfg_attr(feature = "tracing", instrument(level = "debug", skip(dict), fields(dict = dict.name)))]
pub fn render_marker(
    dict: Dictionary,
    id: u32,
    side_px: usize,
    border_bits: usize,
) -> Result<GrayImage, MarkerRenderError> {
    let code = dict.code(id).ok_or(MarkerRenderError::InvalidIdentifier {
        dictionary: dict.name,
        id,
        count: dict.len(),
    })?;

    let bits = dict.marker_size;
    let cells = bits + 2 * border_bits;
    if side_px < cells {
        return Err(MarkerRenderError::TooSmall { side_px, cells });
    }

    let cell_of = |p: usize| p * cells / side_px;
    let mut img = GrayImage::filled(side_px, side_px, 255);
    for y in 0..side_px {
        let cy = cell_of(y);
        for x in 0..side_px {
            let cx = cell_of(x);
            let inner = (border_bits..border_bits + bits).contains(&cx)
                && (border_bits..border_bits + bits).contains(&cy);
            let black = !inner || dict.bit(code, cx - border_bits, cy - border_bits);
            if black {
                img.data[y * side_px + x] = 0;
            }
        }
    }

    log::trace!("rendered {} id {id} at {side_px}px", dict.name);
    Ok(img)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::DICT_4X4_50;

    #[test]
    fn marker_has_requested_size_and_border() {
        let img = render_marker(DICT_4X4_50, 42, 150, 1).expect("render");
        assert_eq!((img.width, img.height), (150, 150));

        // 6 cells of 25 px; the outer ring is black.
        for i in 0..150 {
            assert_eq!(img.get(i, 0), Some(0));
            assert_eq!(img.get(i, 149), Some(0));
            assert_eq!(img.get(0, i), Some(0));
            assert_eq!(img.get(149, i), Some(0));
        }
    }

    #[test]
    fn inner_cells_follow_the_code() {
        let dict = DICT_4X4_50;
        let code = dict.codes[42];
        let img = render_marker(dict, 42, 150, 1).expect("render");

        for by in 0..4 {
            for bx in 0..4 {
                // centre of inner cell (bx, by)
                let px = (bx + 1) * 25 + 12;
                let py = (by + 1) * 25 + 12;
                let expected = if dict.bit(code, bx, by) { 0 } else { 255 };
                assert_eq!(img.get(px, py), Some(expected), "bit ({bx}, {by})");
            }
        }
    }

    #[test]
    fn id_outside_catalog_is_rejected() {
        let err = render_marker(DICT_4X4_50, 50, 150, 1).unwrap_err();
        assert_eq!(
            err,
            MarkerRenderError::InvalidIdentifier {
                dictionary: "DICT_4X4_50",
                id: 50,
                count: 50
            }
        );
    }

    #[test]
    fn side_smaller_than_grid_is_rejected() {
        let err = render_marker(DICT_4X4_50, 0, 5, 1).unwrap_err();
        assert_eq!(err, MarkerRenderError::TooSmall { side_px: 5, cells: 6 });
    }

    #[test]
    fn uneven_side_still_covers_every_pixel() {
        let img = render_marker(DICT_4X4_50, 1, 100, 1).expect("render");
        assert_eq!(img.data.len(), 100 * 100);
        assert_eq!(img.get(99, 50), Some(0));
    }
}
