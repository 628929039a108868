//! Dictionary matching and rotation helpers.

use crate::Dictionary;

/// Result of looking an observed code up in a dictionary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Match {
    pub id: u32,
    /// Quarter turns with `observed == rotate_code_u64(code, n, rotation)`.
    pub rotation: u8,
    /// Differing bits against the rotated dictionary code.
    pub hamming: u8,
}

/// Brute-force matcher for a fixed dictionary.
///
/// Every code is stored in all four rotations up front; matching is a linear
/// scan, which is plenty for catalogs of a few dozen markers.
#[derive(Clone, Debug)]
pub struct Matcher {
    dict: Dictionary,
    max_hamming: u8,
    rotated: Vec<[u64; 4]>,
}

impl Matcher {
    /// Build a matcher accepting observations within `max_hamming` bit errors.
    ///
    /// Returns `None` for dictionaries whose markers do not fit into 64 bits.
    pub fn new(dict: Dictionary, max_hamming: u8) -> Option<Self> {
        if dict.bit_count() > 64 {
            return None;
        }

        let n = dict.marker_size;
        let rotated = dict
            .codes
            .iter()
            .map(|&base| [0u8, 1, 2, 3].map(|rot| rotate_code_u64(base, n, rot)))
            .collect();

        Some(Self {
            dict,
            max_hamming,
            rotated,
        })
    }

    /// Matcher that only accepts exact codes.
    pub fn exact(dict: Dictionary) -> Option<Self> {
        Self::new(dict, 0)
    }

    #[inline]
    pub fn dictionary(&self) -> Dictionary {
        self.dict
    }

    #[inline]
    pub fn max_hamming(&self) -> u8 {
        self.max_hamming
    }

    /// Best match within `max_hamming`; ties go to the lowest id, then rotation.
    pub fn match_code(&self, observed: u64) -> Option<Match> {
        let mut best: Option<Match> = None;

        for (id, rots) in self.rotated.iter().enumerate() {
            for (rot, &cand) in rots.iter().enumerate() {
                let hamming = (observed ^ cand).count_ones() as u8;
                if hamming > self.max_hamming {
                    continue;
                }
                if best.is_some_and(|b| b.hamming <= hamming) {
                    continue;
                }
                best = Some(Match {
                    id: id as u32,
                    rotation: rot as u8,
                    hamming,
                });
                if hamming == 0 {
                    return best;
                }
            }
        }

        best
    }
}

/// Rotate a code stored in row-major bits (`idx = y * n + x`) by `rot` quarter turns.
pub fn rotate_code_u64(code: u64, n: usize, rot: u8) -> u64 {
    let rot = rot & 3;
    if rot == 0 {
        return code;
    }

    let mut out = 0u64;
    for y in 0..n {
        for x in 0..n {
            let (sx, sy) = match rot {
                1 => (y, n - 1 - x),
                2 => (n - 1 - x, n - 1 - y),
                _ => (n - 1 - y, x),
            };
            out |= ((code >> (sy * n + sx)) & 1) << (y * n + x);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins;

    #[test]
    fn rotate_four_times_is_identity() {
        let code = 0x0123_4567_89ab_cdef_u64;
        let r = (0..4).fold(code, |c, _| rotate_code_u64(c, 8, 1));
        assert_eq!(code, r);
    }

    #[test]
    fn matcher_finds_rotated_code() {
        let dict = builtins::DICT_4X4_50;
        let matcher = Matcher::exact(dict).expect("matcher");

        let observed = rotate_code_u64(dict.codes[42], dict.marker_size, 3);
        let m = matcher.match_code(observed).expect("match");
        assert_eq!(
            m,
            Match {
                id: 42,
                rotation: 3,
                hamming: 0
            }
        );
    }

    #[test]
    fn single_bit_error_is_corrected_within_budget() {
        let dict = builtins::DICT_4X4_50;
        let strict = Matcher::exact(dict).expect("matcher");
        let tolerant = Matcher::new(dict, dict.max_correction_bits).expect("matcher");

        let observed = dict.codes[7] ^ (1 << 5);
        assert!(strict.match_code(observed).is_none());
        let m = tolerant.match_code(observed).expect("match");
        assert_eq!((m.id, m.hamming), (7, 1));
    }
}
