//! Thresholding utilities for marker decoding.

/// Otsu threshold over a set of intensities.
///
/// Values `< threshold` are treated as black. Degenerate inputs fall back to
/// something sensible: mid-gray for empty input, the midpoint for two-level
/// input, and the single value for flat input.
pub(crate) fn otsu_threshold(samples: &[u8]) -> u8 {
    let Some((&min_v, &max_v)) = samples.iter().min().zip(samples.iter().max()) else {
        return 127;
    };
    if min_v == max_v {
        return min_v;
    }

    let mut hist = [0u64; 256];
    for &v in samples {
        hist[v as usize] += 1;
    }
    if hist.iter().filter(|&&h| h > 0).count() <= 2 {
        return ((u16::from(min_v) + u16::from(max_v) + 1) / 2) as u8;
    }

    let total = samples.len() as f64;
    let sum_total: f64 = hist
        .iter()
        .enumerate()
        .map(|(i, &h)| i as f64 * h as f64)
        .sum();

    let mut w_b = 0.0;
    let mut sum_b = 0.0;
    let mut best = (f64::MIN, 127u8);

    for (t, &h) in hist.iter().enumerate() {
        w_b += h as f64;
        sum_b += t as f64 * h as f64;
        let w_f = total - w_b;
        if w_b == 0.0 {
            continue;
        }
        if w_f == 0.0 {
            break;
        }

        let m_b = sum_b / w_b;
        let m_f = (sum_total - sum_b) / w_f;
        let between = w_b * w_f * (m_b - m_f) * (m_b - m_f);
        if between > best.0 {
            // Pixels <= t form the dark class, so split just above it.
            best = (between, (t + 1).min(255) as u8);
        }
    }

    best.1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_samples_split_in_the_middle() {
        let samples = [0u8, 0, 255, 255, 0];
        assert_eq!(otsu_threshold(&samples), 128);
    }

    #[test]
    fn flat_and_empty_inputs() {
        assert_eq!(otsu_threshold(&[]), 127);
        assert_eq!(otsu_threshold(&[40, 40, 40]), 40);
    }

    #[test]
    fn separates_noisy_modes() {
        let mut samples = Vec::new();
        samples.extend([10u8, 12, 15, 20, 18, 11]);
        samples.extend([230u8, 240, 250, 245, 235]);
        let t = otsu_threshold(&samples);
        assert!(t > 20 && t <= 230, "threshold {t}");
    }
}
