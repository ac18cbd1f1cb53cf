// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Yomitori.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all Yomitori operations.
///
/// Every stage fails fast: one of these reaches the caller and no partial text
/// is returned alongside it.
#[derive(Debug, Error)]
pub enum YomitoriError {
    // -- Image errors --
    #[error("failed to read image {}: {reason}", path.display())]
    ImageRead { path: PathBuf, reason: String },

    #[error("failed to encode preprocessed image: {0}")]
    Encoding(String),

    #[error("accelerated preprocessing unavailable: {0}")]
    AccelerationUnavailable(String),

    // -- Language / engine errors --
    #[error("language '{code}' is not installed in {}", dir.display())]
    LanguageNotAvailable { code: String, dir: PathBuf },

    #[error("recognition engine failed: {0}")]
    Recognition(String),

    // -- Configuration --
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // -- Storage --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, YomitoriError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_error_names_code_and_dir() {
        let err = YomitoriError::LanguageNotAvailable {
            code: "kor".into(),
            dir: PathBuf::from("/usr/share/tessdata"),
        };
        let msg = err.to_string();
        assert!(msg.contains("'kor'"), "{msg}");
        assert!(msg.contains("/usr/share/tessdata"), "{msg}");
    }

    #[test]
    fn image_error_names_path() {
        let err = YomitoriError::ImageRead {
            path: PathBuf::from("scan.png"),
            reason: "No such file or directory".into(),
        };
        assert_eq!(
            err.to_string(),
            "failed to read image scan.png: No such file or directory"
        );
    }
}
