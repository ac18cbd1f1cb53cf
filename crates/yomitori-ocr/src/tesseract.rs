// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tesseract recognition backend via `leptess`.
//
// # Feature Gate
//
// This module is only available when the `tesseract` feature is enabled:
//
// ```toml
// yomitori-ocr = { path = "crates/yomitori-ocr", features = ["tesseract"] }
// ```
//
// Building it requires the Tesseract and Leptonica development libraries
// (`libtesseract-dev`, `libleptonica-dev` on Debian/Ubuntu). Language models
// are read from the configured language-data directory, not from
// `TESSDATA_PREFIX`.

use std::path::PathBuf;

use leptess::LepTess;
use tracing::{debug, info, instrument};
use yomitori_core::EncodedImage;
use yomitori_core::error::{Result, YomitoriError};

use crate::engine::RecognitionEngine;

/// Tesseract-backed [`RecognitionEngine`].
///
/// A fresh `LepTess` handle is created for every call: the handle is neither
/// `Send` nor `Sync`, and initialisation with the requested language set is
/// cheap next to recognition itself.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    language_data_dir: PathBuf,
}

impl TesseractEngine {
    /// Create an engine that loads models from `language_data_dir`.
    pub fn new(language_data_dir: impl Into<PathBuf>) -> Self {
        Self {
            language_data_dir: language_data_dir.into(),
        }
    }
}

impl RecognitionEngine for TesseractEngine {
    fn name(&self) -> &str {
        "tesseract"
    }

    #[instrument(skip_all, fields(
        width = image.width(),
        height = image.height(),
        languages = %languages.join("+")
    ))]
    fn recognize(&self, image: &EncodedImage, languages: &[String]) -> Result<String> {
        let spec = languages.join("+");
        let data_path = self.language_data_dir.to_str().ok_or_else(|| {
            YomitoriError::Recognition(format!(
                "language data path {} is not valid UTF-8",
                self.language_data_dir.display()
            ))
        })?;

        info!("Initialising Tesseract");
        let mut tess = LepTess::new(Some(data_path), &spec).map_err(|err| {
            YomitoriError::Recognition(format!(
                "failed to initialise Tesseract with '{spec}' from {}: {err}",
                self.language_data_dir.display()
            ))
        })?;

        tess.set_image_from_mem(image.as_bytes()).map_err(|err| {
            YomitoriError::Recognition(format!("Tesseract could not load the image: {err}"))
        })?;

        let text = tess.get_utf8_text().map_err(|err| {
            YomitoriError::Recognition(format!("Tesseract returned invalid UTF-8: {err}"))
        })?;

        debug!(
            line_count = text.lines().count(),
            char_count = text.chars().count(),
            "Tesseract recognition complete"
        );
        Ok(text)
    }
}
