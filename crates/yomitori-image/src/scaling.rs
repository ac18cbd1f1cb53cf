// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Uniform scale factor derivation for resolution normalization.

/// Uniform per-axis scale factor. `1.0` leaves the image unchanged.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct ScalingFactor(f64);

impl ScalingFactor {
    pub fn value(self) -> f64 {
        self.0
    }

    /// Scale `width` × `height` by this factor.
    ///
    /// Each axis is rounded to the nearest integer and never drops below one
    /// pixel. Both preprocessing strategies size their output through this
    /// method so they agree on dimensions exactly.
    pub fn apply(self, width: u32, height: u32) -> (u32, u32) {
        let scale = |len: u32| -> u32 {
            let scaled = (len as f64 * self.0).round();
            if scaled < 1.0 {
                1
            } else if scaled > u32::MAX as f64 {
                u32::MAX
            } else {
                scaled as u32
            }
        };
        (scale(width), scale(height))
    }
}

/// Compute the factor that brings a `width` × `height` image to
/// `target_pixel_area`: `sqrt(target / (width * height))`.
///
/// Callers only use this when the current area is below the target; the
/// decision whether to scale at all lives with the preprocessor.
pub fn compute_scaling_factor(width: u32, height: u32, target_pixel_area: f64) -> ScalingFactor {
    let current_area = width as f64 * height as f64;
    ScalingFactor((target_pixel_area / current_area).sqrt())
}

/// Factor to apply to a `width` × `height` image, or `None` when it already
/// meets the target. Images are only ever upsampled.
pub fn upscale_factor(width: u32, height: u32, target_pixel_area: f64) -> Option<ScalingFactor> {
    let current_area = width as f64 * height as f64;
    if current_area < target_pixel_area {
        Some(compute_scaling_factor(width, height, target_pixel_area))
    } else {
        None
    }
}
