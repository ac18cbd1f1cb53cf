// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// yomitori-image: Image preprocessing for the Yomitori OCR pipeline.
//
// Normalizes resolution (upscaling small images to a target pixel area),
// binarizes with Otsu's method, and encodes the result as PNG. Preprocessing
// runs on one of two interchangeable strategies: the standard single-threaded
// path, or data-parallel kernels behind the `accelerated` feature.

pub mod preprocess;
pub mod raster;
pub mod scaling;

// Re-export the primary items so callers can use `yomitori_image::preprocess` etc.
pub use preprocess::{
    AcceleratedPreprocessor, Preprocessor, StandardPreprocessor, preprocess, preprocessor_for,
};
pub use raster::ImageProcessor;
pub use scaling::{ScalingFactor, compute_scaling_factor};
