//! Marker decoding from rectified images.
//!
//! The decoder expects a square view filled by one axis-aligned marker,
//! which is exactly the marker region the card composer writes.
//! Decoding reads the cell grid, checks the black border, and matches the
//! inner bits against the dictionary in all four rotations.

use crate::threshold::otsu_threshold;
use crate::Matcher;
use aruco_card_core::GrayImageView;

/// Decoder configuration.
#[derive(Clone, Debug)]
pub struct DecodeConfig {
    /// Marker border width in cells (OpenCV typically uses 1).
    pub border_bits: usize,
    /// Require border-black ratio >= this.
    pub min_border_score: f32,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            border_bits: 1,
            min_border_score: 0.85,
        }
    }
}

/// One decoded marker.
#[derive(Clone, Debug, PartialEq)]
pub struct MarkerDetection {
    pub id: u32,
    pub rotation: u8,
    pub hamming: u8,
    pub score: f32,
    pub border_score: f32,
    /// Observed inner bits (row-major, black=1).
    pub code: u64,
    /// Whether the decoder inverted polarity to maximize `border_score`.
    pub inverted: bool,
}

/// Decode a single marker that fills the whole (square) view.
pub fn decode_marker(
    view: &GrayImageView<'_>,
    cfg: &DecodeConfig,
    matcher: &Matcher,
) -> Option<MarkerDetection> {
    if view.width != view.height {
        return None;
    }
    let obs = read_marker(view, cfg, matcher.dictionary().marker_size)?;
    build_detection(obs, matcher)
}

#[derive(Clone, Copy, Debug)]
struct MarkerObservation {
    code: u64,
    border_score: f32,
    inverted: bool,
}

const MIN_SIDE_PX: i32 = 12;

fn build_detection(obs: MarkerObservation, matcher: &Matcher) -> Option<MarkerDetection> {
    let m = matcher.match_code(obs.code)?;
    let bits = matcher.dictionary().bit_count().max(1) as f32;
    let ham_pen = 1.0 - (m.hamming as f32 / bits);

    Some(MarkerDetection {
        id: m.id,
        rotation: m.rotation,
        hamming: m.hamming,
        score: (obs.border_score * ham_pen).clamp(0.0, 1.0),
        border_score: obs.border_score,
        code: obs.code,
        inverted: obs.inverted,
    })
}

fn read_marker(
    view: &GrayImageView<'_>,
    cfg: &DecodeConfig,
    bits: usize,
) -> Option<MarkerObservation> {
    let border = cfg.border_bits;
    let cells = bits + 2 * border;
    let side = view.width as i32;
    if bits * bits > 64 || cells == 0 || side < MIN_SIDE_PX {
        return None;
    }

    let step = side as f32 / cells as f32;
    let mut samples = Vec::with_capacity(cells * cells);
    for cy in 0..cells {
        for cx in 0..cells {
            let rx = (cx as f32 + 0.5) * step;
            let ry = (cy as f32 + 0.5) * step;
            samples.push(mean_3x3(view, rx, ry));
        }
    }

    classify_cells(
        &samples,
        otsu_threshold(view.data),
        cells,
        bits,
        border,
        cfg.min_border_score,
    )
}

fn classify_cells(
    samples: &[u8],
    thr: u8,
    cells: usize,
    bits: usize,
    border: usize,
    min_border_score: f32,
) -> Option<MarkerObservation> {
    let mut best: Option<MarkerObservation> = None;

    for inverted in [false, true] {
        let mut border_ok = 0u32;
        let mut border_total = 0u32;
        let mut code = 0u64;

        for cy in 0..cells {
            for cx in 0..cells {
                let is_black = (samples[cy * cells + cx] < thr) != inverted;
                let on_border = cx < border
                    || cy < border
                    || cx >= cells - border
                    || cy >= cells - border;
                if on_border {
                    border_total += 1;
                    border_ok += u32::from(is_black);
                } else if is_black {
                    code |= 1u64 << ((cy - border) * bits + (cx - border));
                }
            }
        }

        let border_score = if border_total == 0 {
            1.0
        } else {
            border_ok as f32 / border_total as f32
        };
        if border_score < min_border_score {
            continue;
        }
        if best.map_or(true, |b| border_score > b.border_score) {
            best = Some(MarkerObservation {
                code,
                border_score,
                inverted,
            });
        }
    }

    best
}

fn mean_3x3(img: &GrayImageView<'_>, x: f32, y: f32) -> u8 {
    let ix = x.floor() as i32;
    let iy = y.floor() as i32;
    let mut sum = 0u32;
    for dy in -1..=1 {
        for dx in -1..=1 {
            sum += u32::from(img.get_or_black(ix + dx, iy + dy));
        }
    }
    (sum / 9) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{builtins, render_marker, rotate_code_u64};
    use aruco_card_core::GrayImage;

    fn rotate_quarter(img: &GrayImage) -> GrayImage {
        // 90° clockwise
        let n = img.width;
        let mut out = GrayImage::filled(n, n, 0);
        for y in 0..n {
            for x in 0..n {
                out.data[x * n + (n - 1 - y)] = img.data[y * n + x];
            }
        }
        out
    }

    #[test]
    fn decodes_every_id_of_the_dictionary() {
        let dict = builtins::DICT_4X4_50;
        let matcher = Matcher::exact(dict).expect("matcher");
        let cfg = DecodeConfig::default();

        for id in 0..dict.len() as u32 {
            let img = render_marker(dict, id, 60, 1).expect("render");
            let det = decode_marker(&img.view(), &cfg, &matcher).expect("decode");
            assert_eq!(det.id, id);
            assert_eq!(det.rotation, 0);
            assert_eq!(det.hamming, 0);
            assert!(!det.inverted);
        }
    }

    #[test]
    fn rotated_marker_reports_rotation() {
        let dict = builtins::DICT_4X4_50;
        let matcher = Matcher::exact(dict).expect("matcher");
        let img = rotate_quarter(&render_marker(dict, 42, 150, 1).expect("render"));

        let det = decode_marker(&img.view(), &DecodeConfig::default(), &matcher)
            .expect("decode");
        assert_eq!(det.id, 42);
        assert_eq!(
            rotate_code_u64(dict.codes[42], dict.marker_size, det.rotation),
            det.code
        );
    }

    #[test]
    fn non_square_or_tiny_views_are_not_decoded() {
        let dict = builtins::DICT_4X4_50;
        let matcher = Matcher::exact(dict).expect("matcher");
        let cfg = DecodeConfig::default();

        let wide = GrayImage::filled(60, 48, 0);
        assert!(decode_marker(&wide.view(), &cfg, &matcher).is_none());

        let tiny = render_marker(dict, 42, 6, 1).expect("render");
        assert!(decode_marker(&tiny.view(), &cfg, &matcher).is_none());
    }

    #[test]
    fn blank_square_is_not_a_marker() {
        let dict = builtins::DICT_4X4_50;
        let matcher = Matcher::exact(dict).expect("matcher");
        let blank = GrayImage::filled(60, 60, 255);
        assert!(decode_marker(&blank.view(), &DecodeConfig::default(), &matcher).is_none());
    }
}
