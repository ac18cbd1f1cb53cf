// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types shared between the preprocessing, recognition, and CLI
// crates.

use serde::{Deserialize, Serialize};

/// Execution strategy for image preprocessing.
///
/// Both strategies honour the same contract; the mode only decides where the
/// grayscale, resize, and binarize steps run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingMode {
    /// Single-threaded path using the `image` crate's built-in operations.
    #[default]
    Standard,
    /// Data-parallel kernels; requires the `accelerated` build feature.
    Accelerated,
}

impl std::fmt::Display for ProcessingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Standard => f.write_str("standard"),
            Self::Accelerated => f.write_str("accelerated"),
        }
    }
}

impl std::str::FromStr for ProcessingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "accelerated" => Ok(Self::Accelerated),
            other => Err(format!(
                "unknown processing mode '{other}' (expected 'standard' or 'accelerated')"
            )),
        }
    }
}

/// A binarized image serialized as PNG, ready for the recognition engine.
///
/// Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    bytes: Vec<u8>,
    width: u32,
    height: u32,
}

impl EncodedImage {
    pub fn new(bytes: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            bytes,
            width,
            height,
        }
    }

    /// The encoded PNG bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

}
