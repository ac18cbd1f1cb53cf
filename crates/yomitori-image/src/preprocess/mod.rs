// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OCR preprocessing: grayscale, upscale to a minimum pixel area, Otsu
// binarization, PNG encoding. Two interchangeable strategies implement the
// same `Preprocessor` contract.

pub mod accelerated;
pub mod otsu;
pub mod standard;

use std::path::Path;

use image::{DynamicImage, GrayImage};
use tracing::{debug, instrument};
use yomitori_core::config::validate_target_pixel_area;
use yomitori_core::error::Result;
use yomitori_core::{EncodedImage, ProcessingMode};

use crate::raster::ImageProcessor;

pub use accelerated::AcceleratedPreprocessor;
pub use standard::StandardPreprocessor;

/// One execution strategy for the preprocessing steps.
///
/// For the same input and target area every implementation produces an image
/// of identical dimensions whose pixels are only 0 or 255, and whose pixel
/// values agree with the other strategies up to interpolation rounding.
pub trait Preprocessor: Send + Sync {
    /// Which mode this strategy implements.
    fn mode(&self) -> ProcessingMode;

    /// Grayscale, upscale (only when below `target_pixel_area`), and binarize.
    ///
    /// Fails with `InvalidConfig` when `target_pixel_area` is not a positive
    /// value within `MAX_TARGET_PIXEL_AREA`.
    fn binarize(&self, image: DynamicImage, target_pixel_area: f64) -> Result<GrayImage>;

    /// Run [`binarize`](Self::binarize) and encode the result as PNG.
    fn preprocess_image(
        &self,
        image: DynamicImage,
        target_pixel_area: f64,
    ) -> Result<EncodedImage> {
        let binary = self.binarize(image, target_pixel_area)?;
        ImageProcessor::from_dynamic(DynamicImage::ImageLuma8(binary)).encode_png()
    }

    /// Decode the image at `path` and preprocess it.
    fn preprocess(&self, path: &Path, target_pixel_area: f64) -> Result<EncodedImage> {
        validate_target_pixel_area(target_pixel_area)?;
        let image = ImageProcessor::open(path)?.into_dynamic();
        self.preprocess_image(image, target_pixel_area)
    }
}

/// Build the strategy for `mode`.
///
/// Fails with `AccelerationUnavailable` when the accelerated strategy cannot
/// run in this build or on this host.
pub fn preprocessor_for(mode: ProcessingMode) -> Result<Box<dyn Preprocessor>> {
    match mode {
        ProcessingMode::Standard => Ok(Box::new(StandardPreprocessor)),
        ProcessingMode::Accelerated => Ok(Box::new(AcceleratedPreprocessor::new()?)),
    }
}

/// Preprocess the image at `image_path` for recognition.
#[instrument(skip_all, fields(
    path = %image_path.as_ref().display(),
    target_pixel_area = target_pixel_area,
    mode = %mode
))]
pub fn preprocess(
    image_path: impl AsRef<Path>,
    target_pixel_area: f64,
    mode: ProcessingMode,
) -> Result<EncodedImage> {
    let preprocessor = preprocessor_for(mode)?;
    let encoded = preprocessor.preprocess(image_path.as_ref(), target_pixel_area)?;
    debug!(
        width = encoded.width(),
        height = encoded.height(),
        png_bytes = encoded.as_bytes().len(),
        "Preprocessing complete"
    );
    Ok(encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb, RgbImage};

    /// Dark "glyph" strokes on a light, unevenly shaded background.
    pub(crate) fn synthetic_page(width: u32, height: u32) -> DynamicImage {
        let img = RgbImage::from_fn(width, height, |x, y| {
            let stroke = (x % 11 < 2) || (y % 7 == 3 && x % 3 != 0);
            if stroke {
                Rgb([25, 25, 35])
            } else {
                let shade = 180 + ((x + y) % 50) as u8;
                Rgb([shade, shade, shade.saturating_sub(10)])
            }
        });
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn standard_mode_writes_png_of_upscaled_size() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("page.png");
        synthetic_page(60, 40).save(&path).expect("save");

        let encoded = preprocess(&path, 9_600.0, ProcessingMode::Standard).expect("preprocess");
        assert_eq!((encoded.width(), encoded.height()), (120, 80));

        let decoded = image::load_from_memory(encoded.as_bytes())
            .expect("decode")
            .to_luma8();
        assert!(decoded.pixels().all(|Luma([v])| *v == 0 || *v == 255));
    }

    #[test]
    fn missing_file_is_reported_before_any_work() {
        let result = preprocess("/nonexistent/page.png", 1_000.0, ProcessingMode::Standard);
        assert!(matches!(
            result,
            Err(yomitori_core::YomitoriError::ImageRead { .. })
        ));
    }

    #[test]
    fn oversized_target_is_rejected_before_decoding() {
        // The path does not exist: decoding first would report ImageRead.
        let result = preprocess("/nonexistent/page.png", 1e19, ProcessingMode::Standard);
        assert!(matches!(
            result,
            Err(yomitori_core::YomitoriError::InvalidConfig(_))
        ));
    }

    #[test]
    fn preprocessor_for_standard_reports_its_mode() {
        let p = preprocessor_for(ProcessingMode::Standard).expect("standard always available");
        assert_eq!(p.mode(), ProcessingMode::Standard);
    }

    #[cfg(not(feature = "accelerated"))]
    #[test]
    fn accelerated_without_feature_is_unavailable() {
        let result = preprocessor_for(ProcessingMode::Accelerated);
        assert!(matches!(
            result,
            Err(yomitori_core::YomitoriError::AccelerationUnavailable(_))
        ));
    }
}
