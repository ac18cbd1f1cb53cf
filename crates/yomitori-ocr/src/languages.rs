// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Installed-language discovery.
//
// Tesseract keeps one model per language in a data directory
// (`/usr/share/tessdata` on most distributions): `jpn.traineddata`,
// `eng.traineddata`, `jpn_vert.traineddata`, ... The file stem is the language
// code passed to the engine.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::{debug, instrument};
use yomitori_core::error::Result;

/// Extension of Tesseract language model files.
pub const TRAINED_DATA_EXTENSION: &str = "traineddata";

/// Answers which recognition languages are installed.
pub trait LanguageAvailability: Send + Sync {
    /// All language codes installed in `language_data_dir`.
    fn list_available(&self, language_data_dir: &Path) -> Result<BTreeSet<String>>;

    /// Whether `code` is installed in `language_data_dir`.
    fn exists(&self, language_data_dir: &Path, code: &str) -> Result<bool> {
        Ok(self.list_available(language_data_dir)?.contains(code))
    }
}

/// Scans a Tesseract data directory for `*.traineddata` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct TessdataDirectory;

impl LanguageAvailability for TessdataDirectory {
    #[instrument(skip(self), fields(dir = %language_data_dir.display()))]
    fn list_available(&self, language_data_dir: &Path) -> Result<BTreeSet<String>> {
        let mut languages = BTreeSet::new();

        for entry in std::fs::read_dir(language_data_dir)? {
            let path = entry?.path();
            // `is_file` follows symlinks.
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some(TRAINED_DATA_EXTENSION) {
                continue;
            }
            if let Some(code) = path.file_stem().and_then(|stem| stem.to_str()) {
                languages.insert(code.to_owned());
            }
        }

        debug!(count = languages.len(), "Installed languages listed");
        Ok(languages)
    }
}
