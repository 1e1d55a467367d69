//! Global binarization producing the mask the extractor consumes.

use fiducial_grid_core::{GrayImage, GrayImageView};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdMode {
    /// Pixels strictly above the value become foreground.
    Fixed(u8),
    /// Otsu threshold over the whole frame.
    #[default]
    Otsu,
}

/// Otsu threshold of an intensity histogram built from `samples`.
pub fn otsu_threshold(samples: &[u8]) -> u8 {
    if samples.is_empty() {
        return 127;
    }

    let mut hist = [0u32; 256];
    let (mut min_v, mut max_v) = (255u8, 0u8);
    for &v in samples {
        hist[v as usize] += 1;
        min_v = min_v.min(v);
        max_v = max_v.max(v);
    }
    if min_v == max_v {
        return min_v;
    }
    if hist.iter().filter(|&&h| h > 0).count() <= 2 {
        return ((min_v as u16 + max_v as u16) / 2) as u8;
    }

    let total = samples.len() as f64;
    let sum_total: f64 = hist
        .iter()
        .enumerate()
        .map(|(i, &h)| i as f64 * h as f64)
        .sum();

    let mut sum_b = 0f64;
    let mut w_b = 0f64;
    let mut best_var = -1f64;
    let mut best_t = 127u8;

    for (t, &h) in hist.iter().enumerate() {
        w_b += h as f64;
        if w_b < 1.0 {
            continue;
        }
        let w_f = total - w_b;
        if w_f < 1.0 {
            break;
        }

        sum_b += t as f64 * h as f64;
        let m_b = sum_b / w_b;
        let m_f = (sum_total - sum_b) / w_f;

        let var_between = w_b * w_f * (m_b - m_f) * (m_b - m_f);
        if var_between > best_var {
            best_var = var_between;
            best_t = t as u8;
        }
    }

    best_t
}

/// Binary mask (`0` / `255`) of `src`.
///
/// Foreground is `value > threshold`, or `value <= threshold` when `invert`.
pub fn binarize(src: &GrayImageView<'_>, mode: ThresholdMode, invert: bool) -> GrayImage {
    let t = match mode {
        ThresholdMode::Fixed(t) => t,
        ThresholdMode::Otsu => otsu_threshold(src.data),
    };
    log::debug!("binarize: threshold {t} (invert = {invert})");

    GrayImage {
        width: src.width,
        height: src.height,
        data: src
            .data
            .iter()
            .map(|&v| if (v > t) != invert { 255 } else { 0 })
            .collect(),
    }
}
