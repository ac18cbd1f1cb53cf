// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// yomitori-ocr: Text extraction orchestration for Yomitori.
//
// Checks the requested languages against the installed models, preprocesses
// the image, hands it to a recognition engine, and normalizes the output.
// The Tesseract engine is behind the `tesseract` feature; without it the
// pipeline still builds against any `RecognitionEngine`.

pub mod engine;
pub mod languages;
pub mod pipeline;

#[cfg(feature = "tesseract")]
pub mod tesseract;

pub use engine::{RecognitionEngine, UnavailableEngine};
pub use languages::{LanguageAvailability, TRAINED_DATA_EXTENSION, TessdataDirectory};
pub use pipeline::{Pipeline, PreprocessorFactory};

#[cfg(feature = "tesseract")]
pub use pipeline::extract_text;
#[cfg(feature = "tesseract")]
pub use tesseract::TesseractEngine;
