// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Recognition engine seam.

use yomitori_core::EncodedImage;
use yomitori_core::error::{Result, YomitoriError};

/// Turns a preprocessed image into raw text.
///
/// Implementations must be usable from several extractions at once, either
/// by creating engine state per call or by synchronising internally.
pub trait RecognitionEngine: Send + Sync {
    /// Short engine identifier for logs (e.g. "tesseract").
    fn name(&self) -> &str;

    /// Recognise text in `image` using the given language codes.
    ///
    /// Engine-specific failures are reported as
    /// [`YomitoriError::Recognition`].
    fn recognize(&self, image: &EncodedImage, languages: &[String]) -> Result<String>;
}

/// Engine used when the binary was built without any recognition backend.
///
/// Every call fails with a `Recognition` error explaining how to rebuild.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableEngine;

impl RecognitionEngine for UnavailableEngine {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn recognize(&self, _image: &EncodedImage, _languages: &[String]) -> Result<String> {
        tracing::warn!("RecognitionEngine::recognize called on unavailable engine");
        Err(YomitoriError::Recognition(
            "no recognition backend compiled in; rebuild with the `tesseract` feature".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_engine_always_fails() {
        let image = EncodedImage::new(Vec::new(), 1, 1);
        let result = UnavailableEngine.recognize(&image, &["eng".to_string()]);
        assert!(matches!(result, Err(YomitoriError::Recognition(_))));
    }
}
