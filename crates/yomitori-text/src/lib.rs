// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// yomitori-text: Post-processing for OCR output.
//
// Recognition engines reading mixed Japanese/Chinese and Latin text insert
// spaces between kana and ideographs. This crate removes that spacing line by
// line, in parallel, without reordering lines.

pub mod cjk;
pub mod normalize;

pub use cjk::{contains_cjk, is_cjk};
pub use normalize::{TextLine, normalize, normalize_line, split_lines};
