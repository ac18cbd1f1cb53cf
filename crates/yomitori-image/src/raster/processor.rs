// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor: decode, grayscale, area-driven upscaling, Otsu
// binarization, and PNG encoding. Operates on in-memory images using the
// `image` and `imageproc` crates.

use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, ImageFormat};
use imageproc::contrast::otsu_level;
use tracing::{debug, info, instrument};
use yomitori_core::EncodedImage;
use yomitori_core::error::YomitoriError;

use crate::scaling::{ScalingFactor, upscale_factor};

/// Image processing pipeline operating on a single in-memory image.
///
/// Each method consumes `self` and returns a new `ImageProcessor` wrapping the
/// transformed image, enabling method chaining.
///
/// ```ignore
/// let png = ImageProcessor::open("receipt.jpg")?
///     .grayscale()
///     .upscale_to_area(500_000.0)
///     .binarize_otsu()
///     .encode_png()?;
/// ```
pub struct ImageProcessor {
    /// The current working image.
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Load an image from a file path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, YomitoriError> {
        let img = image::open(path.as_ref()).map_err(|err| YomitoriError::ImageRead {
            path: path.as_ref().to_path_buf(),
            reason: err.to_string(),
        })?;
        info!(
            width = img.width(),
            height = img.height(),
            "Image loaded"
        );
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    /// Consume the processor and return the underlying `DynamicImage`.
    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Transformations (consume self, return new Self) -----------------------

    /// Convert the image to single-channel 8-bit luma.
    #[instrument(skip(self))]
    pub fn grayscale(self) -> Self {
        debug!("Converting to grayscale");
        let luma = match self.image {
            DynamicImage::ImageLuma8(gray) => gray,
            other => other.to_luma8(),
        };
        Self {
            image: DynamicImage::ImageLuma8(luma),
        }
    }

    /// Upscale so that width × height reaches `target_pixel_area`, using
    /// linear interpolation. Images already at or above the target are
    /// returned untouched.
    #[instrument(skip(self))]
    pub fn upscale_to_area(self, target_pixel_area: f64) -> Self {
        let (width, height) = (self.image.width(), self.image.height());
        let area = width as u64 * height as u64;
        if area == 0 {
            return self;
        }

        let Some(factor) = upscale_factor(width, height, target_pixel_area) else {
            debug!(area, target_pixel_area, "Image meets target area, not resizing");
            return self;
        };

        self.scale_by(factor)
    }

    /// Resize both axes by `factor` with linear interpolation.
    pub fn scale_by(self, factor: ScalingFactor) -> Self {
        let (from_w, from_h) = (self.image.width(), self.image.height());
        let (new_w, new_h) = factor.apply(from_w, from_h);
        info!(
            from_w,
            from_h,
            new_w,
            new_h,
            factor = factor.value(),
            "Upscaling image"
        );
        let resized = self.image.resize_exact(new_w, new_h, FilterType::Triangle);
        Self { image: resized }
    }

    /// Global binarization with a threshold chosen by Otsu's method.
    ///
    /// Pixels above the threshold become white (255), all others black (0).
    #[instrument(skip(self))]
    pub fn binarize_otsu(self) -> Self {
        let mut gray: GrayImage = match self.image {
            DynamicImage::ImageLuma8(gray) => gray,
            other => other.to_luma8(),
        };
        let threshold = otsu_level(&gray);
        debug!(threshold, "Otsu threshold computed");

        for pixel in gray.pixels_mut() {
            pixel.0[0] = if pixel.0[0] > threshold { 255 } else { 0 };
        }

        Self {
            image: DynamicImage::ImageLuma8(gray),
        }
    }

    // -- Output ---------------------------------------------------------------

    /// Encode the current image as PNG and wrap it for the recognition engine.
    pub fn encode_png(self) -> Result<EncodedImage, YomitoriError> {
        let bytes = encode_to_format(&self.image, ImageFormat::Png)?;
        debug!(png_bytes = bytes.len(), "Encoded PNG");
        Ok(EncodedImage::new(bytes, self.image.width(), self.image.height()))
    }
}

/// Encode a `DynamicImage` into the specified format, returning the raw bytes.
pub(crate) fn encode_to_format(
    image: &DynamicImage,
    format: ImageFormat,
) -> Result<Vec<u8>, YomitoriError> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    image
        .write_to(&mut cursor, format)
        .map_err(|err| YomitoriError::Encoding(format!("{format:?} encoding failed: {err}")))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Luma, Rgb, RgbImage};

    fn two_tone(width: u32, height: u32) -> DynamicImage {
        let img = RgbImage::from_fn(width, height, |x, _| {
            if x < width / 2 {
                Rgb([20, 30, 40])
            } else {
                Rgb([220, 210, 200])
            }
        });
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn grayscale_yields_luma8() {
        let image = ImageProcessor::from_dynamic(two_tone(8, 4))
            .grayscale()
            .into_dynamic();
        assert!(matches!(image, DynamicImage::ImageLuma8(_)));
    }

    #[test]
    fn small_image_is_upscaled_to_target() {
        let image = ImageProcessor::from_dynamic(two_tone(40, 25))
            .upscale_to_area(4_000.0)
            .into_dynamic();
        assert_eq!(image.dimensions(), (80, 50));
    }

    #[test]
    fn large_image_is_not_resized() {
        for target in [10_000.0, 50.0] {
            let image = ImageProcessor::from_dynamic(two_tone(100, 100))
                .upscale_to_area(target)
                .into_dynamic();
            assert_eq!(image.dimensions(), (100, 100), "target {target}");
        }
    }

    #[test]
    fn otsu_output_has_two_levels() {
        let gradient = GrayImage::from_fn(64, 16, |x, y| Luma([((x * 4 + y) % 256) as u8]));
        let processor =
            ImageProcessor::from_dynamic(DynamicImage::ImageLuma8(gradient)).binarize_otsu();
        let gray = processor.into_dynamic().to_luma8();
        let mut seen = [false; 256];
        for p in gray.pixels() {
            seen[p.0[0] as usize] = true;
        }
        let levels: Vec<usize> = (0..256).filter(|&v| seen[v]).collect();
        assert_eq!(levels, vec![0, 255]);
    }

    #[test]
    fn two_tone_binarizes_to_black_and_white_halves() {
        let processor = ImageProcessor::from_dynamic(two_tone(10, 2))
            .grayscale()
            .binarize_otsu();
        let gray = processor.into_dynamic().to_luma8();
        assert_eq!(gray.get_pixel(0, 0).0[0], 0);
        assert_eq!(gray.get_pixel(9, 1).0[0], 255);
    }

    #[test]
    fn encode_png_round_trips_dimensions() {
        let encoded = ImageProcessor::from_dynamic(two_tone(12, 7))
            .grayscale()
            .encode_png()
            .expect("encode");
        assert_eq!((encoded.width(), encoded.height()), (12, 7));
        let decoded = image::load_from_memory(encoded.as_bytes()).expect("decode");
        assert_eq!((decoded.width(), decoded.height()), (12, 7));
    }

    #[test]
    fn open_missing_file_is_image_read_error() {
        let result = ImageProcessor::open("/nonexistent/yomitori/scan.png");
        assert!(matches!(result, Err(YomitoriError::ImageRead { .. })));
    }

    #[test]
    fn undecodable_file_is_image_read_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("scan.png");
        std::fs::write(&path, b"definitely not an image").expect("write");
        let result = ImageProcessor::open(&path);
        assert!(matches!(result, Err(YomitoriError::ImageRead { .. })));
    }
}
