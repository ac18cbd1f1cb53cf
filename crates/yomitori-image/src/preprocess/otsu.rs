// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Histogram-based Otsu threshold selection.

/// 256-bin intensity histogram.
pub type Histogram = [u64; 256];

/// Add every byte of `pixels` to `bins`.
pub fn accumulate(bins: &mut Histogram, pixels: &[u8]) {
    for &value in pixels {
        bins[value as usize] += 1;
    }
}

/// Element-wise sum of two histograms.
pub fn merge(mut left: Histogram, right: Histogram) -> Histogram {
    for (l, r) in left.iter_mut().zip(right.iter()) {
        *l += r;
    }
    left
}

/// Pick the threshold that maximises the between-class variance.
///
/// The returned level is the last intensity of the dark class: pixels
/// `<= threshold` are background, pixels `> threshold` foreground. Ties keep
/// the lowest level. An empty or single-valued histogram yields 0.
pub fn threshold_from_histogram(bins: &Histogram) -> u8 {
    let total_pixels: u64 = bins.iter().sum();
    if total_pixels == 0 {
        return 0;
    }

    let mut sum_total: f64 = 0.0;
    for (i, &count) in bins.iter().enumerate() {
        sum_total += i as f64 * count as f64;
    }

    let mut sum_background: f64 = 0.0;
    let mut weight_background: u64 = 0;
    let mut max_variance: f64 = 0.0;
    let mut best_threshold: u8 = 0;

    for (t, &count) in bins.iter().enumerate() {
        weight_background += count;
        if weight_background == 0 {
            continue;
        }
        let weight_foreground = total_pixels - weight_background;
        if weight_foreground == 0 {
            break;
        }

        sum_background += t as f64 * count as f64;
        let mean_background = sum_background / weight_background as f64;
        let mean_foreground = (sum_total - sum_background) / weight_foreground as f64;

        let between_variance = weight_background as f64
            * weight_foreground as f64
            * (mean_background - mean_foreground).powi(2);

        if between_variance > max_variance {
            max_variance = between_variance;
            best_threshold = t as u8;
        }
    }

    best_threshold
}
