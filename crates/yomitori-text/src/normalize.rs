// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Line-parallel normalization of raw OCR output.
//
// Lines are split with their terminators, each line gets its own pre-sized
// output slot, and the rayon pool fills the slots in any order. The slots are
// concatenated by index after the parallel iterator joins, so completion order
// never leaks into the result.

use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::cjk::{collapse_cjk_spacing, contains_cjk, trim_line};

/// One line of recognizer output together with its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextLine<'a> {
    /// Zero-based position in the input text.
    pub index: usize,
    /// Line content including its trailing line break, if any.
    pub content: &'a str,
}

/// Split `raw` into indexed lines, keeping each line's `\n`.
pub fn split_lines(raw: &str) -> Vec<TextLine<'_>> {
    raw.split_inclusive('\n')
        .enumerate()
        .map(|(index, content)| TextLine { index, content })
        .collect()
}

/// Normalize a single line: CJK lines lose whitespace around CJK characters,
/// other lines are only trimmed.
pub fn normalize_line(line: &str) -> String {
    if contains_cjk(line) {
        collapse_cjk_spacing(line)
    } else {
        trim_line(line)
    }
}

/// Clean OCR output line by line, in parallel, preserving line order.
///
/// Never fails; empty input gives empty output. Applying it twice gives the
/// same result as applying it once.
#[instrument(skip_all, fields(raw_len = raw.len()))]
pub fn normalize(raw: &str) -> String {
    normalize_with(raw, |_| {})
}

/// [`normalize`] with a hook invoked inside each worker before its line is
/// processed.
pub(crate) fn normalize_with<F>(raw: &str, before_line: F) -> String
where
    F: Fn(&TextLine<'_>) + Sync,
{
    let lines = split_lines(raw);
    let mut slots = vec![String::new(); lines.len()];

    slots
        .par_iter_mut()
        .zip(lines.par_iter())
        .for_each(|(slot, line)| {
            before_line(line);
            *slot = normalize_line(line.content);
        });

    debug!(lines = lines.len(), "Normalized OCR text");

    slots.concat()
}
