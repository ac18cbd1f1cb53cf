// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Request-scoped extraction configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, YomitoriError};
use crate::types::ProcessingMode;

/// Conventional Tesseract language-data location on Linux distributions.
pub const DEFAULT_LANGUAGE_DATA_DIR: &str = "/usr/share/tessdata";

/// Minimum pixel area the preprocessor upsamples small images to.
pub const DEFAULT_TARGET_PIXEL_AREA: f64 = 500_000.0;

/// Largest accepted target pixel area (100 megapixels). An 8-bit page this
/// size is already 100 MB before the f32 resize buffer.
pub const MAX_TARGET_PIXEL_AREA: f64 = 100_000_000.0;

/// Check that `target_pixel_area` is a finite value in
/// `(0, MAX_TARGET_PIXEL_AREA]`.
pub fn validate_target_pixel_area(target_pixel_area: f64) -> Result<()> {
    if !target_pixel_area.is_finite() || target_pixel_area <= 0.0 {
        return Err(YomitoriError::InvalidConfig(format!(
            "target pixel area must be a positive number, got {target_pixel_area}"
        )));
    }
    if target_pixel_area > MAX_TARGET_PIXEL_AREA {
        return Err(YomitoriError::InvalidConfig(format!(
            "target pixel area {target_pixel_area} exceeds the maximum of {MAX_TARGET_PIXEL_AREA}"
        )));
    }
    Ok(())
}

/// Settings for a single text extraction.
///
/// A value is built once (defaults, config file, CLI flags) and then passed by
/// reference into the pipeline; nothing in the pipeline mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Directory holding one `<code>.traineddata` file per language.
    pub language_data_dir: PathBuf,
    /// Images smaller than this (width × height) are upscaled to reach it.
    pub target_pixel_area: f64,
    /// Language codes passed to the engine, e.g. `["jpn", "eng"]`.
    pub languages: Vec<String>,
    /// Preprocessing strategy.
    pub mode: ProcessingMode,
    /// Retry preprocessing on the standard path when the accelerated one is
    /// unavailable.
    pub fallback_to_standard: bool,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language_data_dir: PathBuf::from(DEFAULT_LANGUAGE_DATA_DIR),
            target_pixel_area: DEFAULT_TARGET_PIXEL_AREA,
            languages: vec!["jpn".into(), "eng".into()],
            mode: ProcessingMode::Standard,
            fallback_to_standard: true,
        }
    }
}

impl OcrConfig {
    /// Split a `+`-joined language list (`"jpn+eng"`) into codes, dropping
    /// empty segments.
    pub fn parse_languages(list: &str) -> Vec<String> {
        list.split('+')
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(str::to_owned)
            .collect()
    }

    /// The language list in Tesseract's `+`-joined form.
    pub fn language_spec(&self) -> String {
        self.languages.join("+")
    }

    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        validate_target_pixel_area(self.target_pixel_area)?;
        if self.languages.is_empty() {
            return Err(YomitoriError::InvalidConfig(
                "at least one language must be requested".into(),
            ));
        }
        if let Some(code) = self.languages.iter().find(|code| code.trim().is_empty()) {
            return Err(YomitoriError::InvalidConfig(format!(
                "empty language code in {:?}",
                code
            )));
        }
        Ok(())
    }

    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
