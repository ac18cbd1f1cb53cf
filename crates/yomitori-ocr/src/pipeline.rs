// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Extraction pipeline: validate languages → preprocess → recognise →
// normalise.
//
// Steps run strictly in sequence and every failure is terminal for the call;
// nothing is retried. The only recovery is the optional accelerated → standard
// preprocessing fallback, controlled by `OcrConfig::fallback_to_standard`.

use std::path::Path;

use tracing::{info, instrument, warn};
use yomitori_core::error::{Result, YomitoriError};
use yomitori_core::{EncodedImage, OcrConfig, ProcessingMode};
use yomitori_image::{Preprocessor, preprocessor_for};
use yomitori_text::normalize;

use crate::engine::RecognitionEngine;
use crate::languages::LanguageAvailability;

/// Builds the preprocessing strategy for a mode.
pub type PreprocessorFactory =
    Box<dyn Fn(ProcessingMode) -> Result<Box<dyn Preprocessor>> + Send + Sync>;

/// Sequences the extraction stages over injected collaborators.
///
/// Holds no per-request state, so one pipeline can serve concurrent
/// extractions with different configs.
pub struct Pipeline<L, E> {
    languages: L,
    engine: E,
    preprocessors: PreprocessorFactory,
}

impl<L, E> Pipeline<L, E>
where
    L: LanguageAvailability,
    E: RecognitionEngine,
{
    /// Create a pipeline using the built-in preprocessing strategies.
    pub fn new(languages: L, engine: E) -> Self {
        Self {
            languages,
            engine,
            preprocessors: Box::new(preprocessor_for),
        }
    }

    /// Replace how preprocessing strategies are built.
    pub fn with_preprocessor_factory(mut self, factory: PreprocessorFactory) -> Self {
        self.preprocessors = factory;
        self
    }

    /// Extract normalised text from the image at `image_path`.
    ///
    /// # Errors
    ///
    /// - [`YomitoriError::InvalidConfig`] for an unusable config.
    /// - [`YomitoriError::LanguageNotAvailable`] for the first requested
    ///   language that is not installed; no image work happens in that case.
    /// - Preprocessing and recognition errors, unchanged.
    #[instrument(skip_all, fields(
        path = %image_path.as_ref().display(),
        languages = %config.language_spec(),
        mode = %config.mode,
        engine = self.engine.name()
    ))]
    pub fn extract_text(
        &self,
        image_path: impl AsRef<Path>,
        config: &OcrConfig,
    ) -> Result<String> {
        config.validate()?;
        self.check_languages(config)?;

        let encoded = self.preprocess(image_path.as_ref(), config)?;

        info!(
            width = encoded.width(),
            height = encoded.height(),
            "Running recognition"
        );
        let raw = self.engine.recognize(&encoded, &config.languages)?;

        Ok(normalize(&raw))
    }

    fn check_languages(&self, config: &OcrConfig) -> Result<()> {
        for code in &config.languages {
            if !self.languages.exists(&config.language_data_dir, code)? {
                return Err(YomitoriError::LanguageNotAvailable {
                    code: code.clone(),
                    dir: config.language_data_dir.clone(),
                });
            }
        }
        Ok(())
    }

    fn preprocess(&self, image_path: &Path, config: &OcrConfig) -> Result<EncodedImage> {
        let preprocessor = match (self.preprocessors)(config.mode) {
            Ok(preprocessor) => preprocessor,
            Err(YomitoriError::AccelerationUnavailable(reason))
                if config.fallback_to_standard && config.mode != ProcessingMode::Standard =>
            {
                warn!(%reason, "Accelerated preprocessing unavailable, using standard");
                (self.preprocessors)(ProcessingMode::Standard)?
            }
            Err(err) => return Err(err),
        };

        let retry_on_standard =
            config.fallback_to_standard && preprocessor.mode() != ProcessingMode::Standard;
        match preprocessor.preprocess(image_path, config.target_pixel_area) {
            Err(YomitoriError::AccelerationUnavailable(reason)) if retry_on_standard => {
                warn!(%reason, "Accelerated preprocessing failed to start, using standard");
                (self.preprocessors)(ProcessingMode::Standard)?
                    .preprocess(image_path, config.target_pixel_area)
            }
            other => other,
        }
    }
}

/// Extract text with the default collaborators: the Tesseract data directory
/// from `config` and the Tesseract engine.
#[cfg(feature = "tesseract")]
pub fn extract_text(image_path: impl AsRef<Path>, config: &OcrConfig) -> Result<String> {
    use crate::languages::TessdataDirectory;
    use crate::tesseract::TesseractEngine;

    Pipeline::new(TessdataDirectory, TesseractEngine::new(&config.language_data_dir))
        .extract_text(image_path, config)
}
