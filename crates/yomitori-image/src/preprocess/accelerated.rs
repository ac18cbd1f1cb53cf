// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Data-parallel preprocessing on a dedicated rayon pool.
//
// Each step runs as a row-parallel kernel: luma conversion, a separable
// linear (triangle) resize that mirrors `image::imageops::resize`, a
// map-reduce histogram, and the threshold map. Only compiled in with the
// `accelerated` feature; otherwise construction reports
// `AccelerationUnavailable`.
//
// yomitori-ocr's dev-dependencies turn the feature on, so a workspace test
// run also builds the equivalence tests below.

use image::{DynamicImage, GrayImage};
use yomitori_core::ProcessingMode;
use yomitori_core::error::{Result, YomitoriError};

use super::Preprocessor;

/// Preprocessing strategy backed by data-parallel kernels.
pub struct AcceleratedPreprocessor {
    #[cfg(feature = "accelerated")]
    pool: rayon::ThreadPool,
}

impl AcceleratedPreprocessor {
    /// Build the worker pool.
    ///
    /// # Errors
    ///
    /// [`YomitoriError::AccelerationUnavailable`] when the crate was built
    /// without the `accelerated` feature or the pool cannot be started.
    #[cfg(feature = "accelerated")]
    pub fn new() -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .thread_name(|i| format!("yomitori-prep-{i}"))
            .build()
            .map_err(|err| {
                YomitoriError::AccelerationUnavailable(format!(
                    "failed to start worker pool: {err}"
                ))
            })?;
        tracing::debug!(threads = pool.current_num_threads(), "Accelerated pool ready");
        Ok(Self { pool })
    }

    #[cfg(not(feature = "accelerated"))]
    pub fn new() -> Result<Self> {
        Err(YomitoriError::AccelerationUnavailable(
            "built without the `accelerated` feature".into(),
        ))
    }
}

impl Preprocessor for AcceleratedPreprocessor {
    fn mode(&self) -> ProcessingMode {
        ProcessingMode::Accelerated
    }

    #[cfg(feature = "accelerated")]
    #[tracing::instrument(
        skip(self, image),
        fields(width = image.width(), height = image.height())
    )]
    fn binarize(&self, image: DynamicImage, target_pixel_area: f64) -> Result<GrayImage> {
        use crate::scaling::upscale_factor;

        yomitori_core::config::validate_target_pixel_area(target_pixel_area)?;
        tracing::info!(
            threads = self.pool.current_num_threads(),
            "Running accelerated preprocessing"
        );

        Ok(self.pool.install(|| {
            let gray = kernels::grayscale(image);
            let (width, height) = gray.dimensions();
            let scaled = match upscale_factor(width, height, target_pixel_area) {
                Some(factor) if width > 0 && height > 0 => {
                    let (new_w, new_h) = factor.apply(width, height);
                    tracing::info!(
                        from_w = width,
                        from_h = height,
                        new_w,
                        new_h,
                        factor = factor.value(),
                        "Upscaling image"
                    );
                    kernels::resize_linear(&gray, new_w, new_h)
                }
                _ => gray,
            };
            kernels::binarize_otsu(scaled)
        }))
    }

    #[cfg(not(feature = "accelerated"))]
    fn binarize(&self, _image: DynamicImage, _target_pixel_area: f64) -> Result<GrayImage> {
        Err(YomitoriError::AccelerationUnavailable(
            "built without the `accelerated` feature".into(),
        ))
    }
}

#[cfg(feature = "accelerated")]
mod kernels {
    use image::{DynamicImage, GrayImage};
    use rayon::prelude::*;
    use tracing::debug;

    use crate::preprocess::otsu;

    // ITU-R BT.709 weights in fixed point, matching `image`'s luma conversion.
    const LUMA_R: u32 = 2126;
    const LUMA_G: u32 = 7152;
    const LUMA_B: u32 = 722;
    const LUMA_DIV: u32 = 10_000;

    fn luma(r: u8, g: u8, b: u8) -> u8 {
        ((LUMA_R * r as u32 + LUMA_G * g as u32 + LUMA_B * b as u32) / LUMA_DIV) as u8
    }

    /// Row-parallel conversion to 8-bit luma. Alpha is ignored.
    pub(super) fn grayscale(image: DynamicImage) -> GrayImage {
        match image {
            DynamicImage::ImageLuma8(gray) => gray,
            DynamicImage::ImageLumaA8(buf) => {
                let (w, h) = buf.dimensions();
                from_interleaved(w, h, buf.as_raw(), 2)
            }
            DynamicImage::ImageRgb8(buf) => {
                let (w, h) = buf.dimensions();
                from_interleaved(w, h, buf.as_raw(), 3)
            }
            DynamicImage::ImageRgba8(buf) => {
                let (w, h) = buf.dimensions();
                from_interleaved(w, h, buf.as_raw(), 4)
            }
            // 16-bit and float inputs are rare for scans; narrow them first.
            other => {
                let rgb = other.to_rgb8();
                let (w, h) = rgb.dimensions();
                from_interleaved(w, h, rgb.as_raw(), 3)
            }
        }
    }

    fn from_interleaved(width: u32, height: u32, src: &[u8], channels: usize) -> GrayImage {
        let mut out = GrayImage::new(width, height);
        if width == 0 || height == 0 {
            return out;
        }
        let w = width as usize;
        let dst: &mut [u8] = &mut out;
        dst.par_chunks_mut(w)
            .zip(src.par_chunks(w * channels))
            .for_each(|(out_row, in_row)| {
                for (o, px) in out_row.iter_mut().zip(in_row.chunks_exact(channels)) {
                    *o = if channels < 3 {
                        px[0]
                    } else {
                        luma(px[0], px[1], px[2])
                    };
                }
            });
        out
    }

    /// Contributions of source samples to one output sample.
    struct Taps {
        start: usize,
        weights: Vec<f32>,
    }

    fn triangle(x: f32) -> f32 {
        let x = x.abs();
        if x < 1.0 { 1.0 - x } else { 0.0 }
    }

    /// Normalized triangle-filter taps along one axis, using the same
    /// half-pixel-centre sampling as `image::imageops::resize`.
    fn axis_taps(src_len: u32, dst_len: u32) -> Vec<Taps> {
        let ratio = src_len as f32 / dst_len as f32;
        let sratio = if ratio < 1.0 { 1.0 } else { ratio };
        let support = sratio;
        let last = src_len as i64 - 1;

        (0..dst_len)
            .map(|out| {
                let centre = (out as f32 + 0.5) * ratio;
                let left = ((centre - support).floor() as i64).clamp(0, last) as u32;
                let right = ((centre + support).ceil() as i64)
                    .clamp(left as i64 + 1, src_len as i64) as u32;
                let centre = centre - 0.5;

                let mut weights: Vec<f32> = (left..right)
                    .map(|i| triangle((i as f32 - centre) / sratio))
                    .collect();
                let sum: f32 = weights.iter().sum();
                if sum > 0.0 {
                    for w in &mut weights {
                        *w /= sum;
                    }
                }
                Taps {
                    start: left as usize,
                    weights,
                }
            })
            .collect()
    }

    /// Separable linear resize: vertical pass into an f32 buffer, then a
    /// horizontal pass with rounding, both parallel over output rows.
    pub(super) fn resize_linear(src: &GrayImage, new_w: u32, new_h: u32) -> GrayImage {
        let (src_w, src_h) = src.dimensions();
        let sw = src_w as usize;
        let raw = src.as_raw();

        let v_taps = axis_taps(src_h, new_h);
        let mut tmp = vec![0f32; sw * new_h as usize];
        tmp.par_chunks_mut(sw)
            .zip(v_taps.par_iter())
            .for_each(|(row, taps)| {
                for (k, &w) in taps.weights.iter().enumerate() {
                    let y = taps.start + k;
                    let src_row = &raw[y * sw..(y + 1) * sw];
                    for (t, &s) in row.iter_mut().zip(src_row) {
                        *t += w * s as f32;
                    }
                }
            });

        let h_taps = axis_taps(src_w, new_w);
        let mut out = GrayImage::new(new_w, new_h);
        let dst: &mut [u8] = &mut out;
        dst.par_chunks_mut(new_w as usize)
            .zip(tmp.par_chunks(sw))
            .for_each(|(out_row, tmp_row)| {
                for (o, taps) in out_row.iter_mut().zip(&h_taps) {
                    let value: f32 = taps
                        .weights
                        .iter()
                        .enumerate()
                        .map(|(k, &w)| w * tmp_row[taps.start + k])
                        .sum();
                    *o = value.round().clamp(0.0, 255.0) as u8;
                }
            });
        out
    }

    /// Map-reduce histogram, Otsu threshold, parallel threshold map.
    pub(super) fn binarize_otsu(mut gray: GrayImage) -> GrayImage {
        let width = (gray.width() as usize).max(1);
        let bins = gray
            .as_raw()
            .par_chunks(width)
            .fold(
                || [0u64; 256],
                |mut bins, row| {
                    otsu::accumulate(&mut bins, row);
                    bins
                },
            )
            .reduce(|| [0u64; 256], otsu::merge);

        let threshold = otsu::threshold_from_histogram(&bins);
        debug!(threshold, "Otsu threshold computed");

        let dst: &mut [u8] = &mut gray;
        dst.par_iter_mut()
            .for_each(|v| *v = if *v > threshold { 255 } else { 0 });
        gray
    }
}

#[cfg(all(test, feature = "accelerated"))]
mod tests {
    use super::*;
    use crate::preprocess::StandardPreprocessor;
    use crate::preprocess::tests::synthetic_page;
    use image::{Luma, Rgba, RgbaImage};

    fn differing_pixels(a: &GrayImage, b: &GrayImage) -> usize {
        a.pixels().zip(b.pixels()).filter(|(x, y)| x != y).count()
    }

    #[test]
    fn grayscale_matches_image_crate() {
        let rgba = RgbaImage::from_fn(33, 17, |x, y| {
            Rgba([(x * 7) as u8, (y * 11) as u8, ((x + y) * 5) as u8, 200])
        });
        let image = DynamicImage::ImageRgba8(rgba);
        let expected = image.to_luma8();
        let actual = kernels::grayscale(image);
        for (e, a) in expected.pixels().zip(actual.pixels()) {
            assert!((e.0[0] as i16 - a.0[0] as i16).abs() <= 1, "{e:?} vs {a:?}");
        }
    }

    #[test]
    fn resize_tracks_image_crate_triangle_filter() {
        let gray = GrayImage::from_fn(23, 19, |x, y| Luma([((x * 13 + y * 29) % 256) as u8]));
        let expected =
            image::imageops::resize(&gray, 61, 50, image::imageops::FilterType::Triangle);
        let actual = kernels::resize_linear(&gray, 61, 50);
        assert_eq!(actual.dimensions(), expected.dimensions());
        for (e, a) in expected.pixels().zip(actual.pixels()) {
            assert!((e.0[0] as i16 - a.0[0] as i16).abs() <= 2, "{e:?} vs {a:?}");
        }
    }

    #[test]
    fn equivalent_to_standard_strategy() {
        let accelerated = AcceleratedPreprocessor::new().expect("pool");
        let cases = [(60u32, 40u32, 9_600.0f64), (97, 53, 200_000.0), (120, 80, 500.0)];
        for &(w, h, target) in &cases {
            let page = synthetic_page(w, h);
            let a = accelerated.binarize(page.clone(), target).expect("accelerated");
            let s = StandardPreprocessor.binarize(page, target).expect("standard");

            assert_eq!(a.dimensions(), s.dimensions());
            assert!(a.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
            let total = (a.width() * a.height()) as usize;
            let diff = differing_pixels(&a, &s);
            assert!(diff * 100 <= total, "{diff} of {total} pixels differ");
        }
    }

    #[test]
    fn oversized_target_is_rejected_before_resizing() {
        let accelerated = AcceleratedPreprocessor::new().expect("pool");
        let result = accelerated.binarize(synthetic_page(2, 2), 1e19);
        assert!(matches!(result, Err(YomitoriError::InvalidConfig(_))));
    }

    #[test]
    fn encoded_output_decodes_to_same_size() {
        let accelerated = AcceleratedPreprocessor::new().expect("pool");
        let encoded = accelerated
            .preprocess_image(synthetic_page(40, 30), 4_800.0)
            .expect("preprocess");
        assert_eq!((encoded.width(), encoded.height()), (80, 60));
    }
}
