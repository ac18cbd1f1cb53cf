// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Single-threaded preprocessing built on the `image` / `imageproc` operations.

use image::{DynamicImage, GrayImage};
use tracing::{info, instrument};
use yomitori_core::ProcessingMode;
use yomitori_core::config::validate_target_pixel_area;
use yomitori_core::error::Result;

use super::Preprocessor;
use crate::raster::ImageProcessor;

/// Grayscale → upscale → Otsu on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardPreprocessor;

impl Preprocessor for StandardPreprocessor {
    fn mode(&self) -> ProcessingMode {
        ProcessingMode::Standard
    }

    #[instrument(skip(self, image), fields(width = image.width(), height = image.height()))]
    fn binarize(&self, image: DynamicImage, target_pixel_area: f64) -> Result<GrayImage> {
        validate_target_pixel_area(target_pixel_area)?;
        info!("Running standard preprocessing");

        let binary = ImageProcessor::from_dynamic(image)
            .grayscale()
            .upscale_to_area(target_pixel_area)
            .binarize_otsu()
            .into_dynamic();

        Ok(match binary {
            DynamicImage::ImageLuma8(gray) => gray,
            other => other.to_luma8(),
        })
    }
}
