//! Dictionary metadata and packed marker codes.

/// A fixed ArUco-style dictionary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dictionary {
    /// Name used in logs and error messages, e.g. `DICT_4X4_50`.
    pub name: &'static str,
    /// Inner cells per side, border excluded.
    pub marker_size: usize,
    /// Bit errors a decoder may correct without confusing two markers.
    pub max_correction_bits: u8,
    /// Packed inner bits indexed by marker id: bit `y * marker_size + x` is
    /// cell `(x, y)`, set for black.
    pub codes: &'static [u64],
}

impl Dictionary {
    /// Inner cells per marker.
    #[inline]
    pub fn bit_count(&self) -> usize {
        self.marker_size * self.marker_size
    }

    /// Number of distinct markers in the catalog.
    #[inline]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Code for marker `id`, if the id is inside the catalog.
    #[inline]
    pub fn code(&self, id: u32) -> Option<u64> {
        self.codes.get(id as usize).copied()
    }

    /// Read bit `(x, y)` of a code (`true` = black).
    #[inline]
    pub fn bit(&self, code: u64, x: usize, y: usize) -> bool {
        (code >> (y * self.marker_size + x)) & 1 == 1
    }
}

/// Repack one marker from OpenCV's byte layout (cells row-major, MSB first,
/// set bit = white) into a code with bit `y * marker_size + x` set for black.
///
/// Returns `None` when `bytes` is not exactly `ceil(marker_size² / 8)` long
/// or the marker does not fit in 64 bits.
pub fn code_from_opencv_bytes(bytes: &[u8], marker_size: usize) -> Option<u64> {
    let bits = marker_size * marker_size;
    if bits > 64 || bytes.len() != bits.div_ceil(8) {
        return None;
    }
    let code = (0..bits)
        .filter(|&k| (bytes[k / 8] >> (7 - k % 8)) & 1 == 0)
        .fold(0u64, |code, k| code | (1 << k));
    Some(code)
}
