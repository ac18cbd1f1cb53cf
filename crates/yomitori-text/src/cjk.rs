// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// CJK character classification and per-line spacing repair.

/// Whether `c` is in the Hiragana or Katakana script, or is a Unified
/// Ideograph (Unicode 15.0).
///
/// Script membership is exact: the prolonged sound mark `ー`, the middle dot
/// `・` and the voicing marks `゛゜` are Common, not Katakana. Of the
/// compatibility block F900–FAFF only the twelve unified ideographs count.
pub fn is_cjk(c: char) -> bool {
    matches!(
        c,
        // Hiragana
        '\u{3041}'..='\u{3096}'
            | '\u{309D}'..='\u{309F}'
            | '\u{1B001}'..='\u{1B11F}'
            | '\u{1B132}'
            | '\u{1B150}'..='\u{1B152}'
            | '\u{1F200}'
            // Katakana, including phonetic extensions, circled and squared
            // forms, halfwidth forms and the kana supplements
            | '\u{30A1}'..='\u{30FA}'
            | '\u{30FD}'..='\u{30FF}'
            | '\u{31F0}'..='\u{31FF}'
            | '\u{32D0}'..='\u{32FE}'
            | '\u{3300}'..='\u{3357}'
            | '\u{FF66}'..='\u{FF6F}'
            | '\u{FF71}'..='\u{FF9D}'
            | '\u{1AFF0}'..='\u{1AFF3}'
            | '\u{1AFF5}'..='\u{1AFFB}'
            | '\u{1AFFD}'..='\u{1AFFE}'
            | '\u{1B000}'
            | '\u{1B120}'..='\u{1B122}'
            | '\u{1B155}'
            | '\u{1B164}'..='\u{1B167}'
            // Unified ideographs: Extension A, the main block, the unified
            // code points of the compatibility block, Extensions B–H
            | '\u{3400}'..='\u{4DBF}'
            | '\u{4E00}'..='\u{9FFF}'
            | '\u{FA0E}'..='\u{FA0F}'
            | '\u{FA11}'
            | '\u{FA13}'..='\u{FA14}'
            | '\u{FA1F}'
            | '\u{FA21}'
            | '\u{FA23}'..='\u{FA24}'
            | '\u{FA27}'..='\u{FA29}'
            | '\u{20000}'..='\u{2A6DF}'
            | '\u{2A700}'..='\u{2B739}'
            | '\u{2B740}'..='\u{2B81D}'
            | '\u{2B820}'..='\u{2CEA1}'
            | '\u{2CEB0}'..='\u{2EBE0}'
            | '\u{30000}'..='\u{3134A}'
            | '\u{31350}'..='\u{323AF}'
    )
}

/// Whether `line` contains at least one CJK character.
pub fn contains_cjk(line: &str) -> bool {
    line.chars().any(is_cjk)
}

/// Split a line into its body and its trailing line break (`"\r\n"`, `"\n"`,
/// or empty).
fn split_terminator(line: &str) -> (&str, &str) {
    if let Some(body) = line.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = line.strip_suffix('\n') {
        (body, "\n")
    } else {
        (line, "")
    }
}

/// Trim surrounding whitespace, keeping internal spacing and the line break.
pub fn trim_line(line: &str) -> String {
    let (body, terminator) = split_terminator(line);
    let mut out = String::with_capacity(line.len());
    out.push_str(body.trim());
    out.push_str(terminator);
    out
}

/// Drop every whitespace run that touches a CJK character on either side,
/// then trim the line. The line break is kept.
///
/// `" 日本 語 \n"` becomes `"日本語\n"`; `"JR 東京 station"` becomes
/// `"JR東京station"`; spacing between two non-CJK words is left alone.
pub fn collapse_cjk_spacing(line: &str) -> String {
    let (body, terminator) = split_terminator(line);
    let mut out = String::with_capacity(line.len());

    let mut chars = body.char_indices().peekable();
    let mut prev: Option<char> = None;
    while let Some((start, c)) = chars.next() {
        if !c.is_whitespace() {
            out.push(c);
            prev = Some(c);
            continue;
        }

        let mut end = start + c.len_utf8();
        while let Some(&(i, next)) = chars.peek() {
            if !next.is_whitespace() {
                break;
            }
            end = i + next.len_utf8();
            chars.next();
        }

        let touches_cjk =
            prev.is_some_and(is_cjk) || chars.peek().is_some_and(|&(_, next)| is_cjk(next));
        if !touches_cjk {
            out.push_str(&body[start..end]);
        }
    }

    let mut trimmed = String::with_capacity(out.len() + terminator.len());
    trimmed.push_str(out.trim());
    trimmed.push_str(terminator);
    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_kana_and_ideographs() {
        for c in ['ひ', 'ら', 'ゝ', 'カ', 'ナ', 'ヽ', 'ｶ', 'ㇰ', '㋐', '㌀', '日', '語', '㐀', '𠀋'] {
            assert!(is_cjk(c), "{c} should be CJK");
        }
        for c in ['a', 'Z', '1', ' ', '。', '、', 'é', '한'] {
            assert!(!is_cjk(c), "{c} should not be CJK");
        }
    }

    #[test]
    fn common_script_marks_are_not_kana() {
        for c in ['ー', '・', '゛', '゜', '゠', 'ｰ', 'ﾞ', 'ﾟ'] {
            assert!(!is_cjk(c), "{c:?} should not be CJK");
        }
    }

    #[test]
    fn kana_supplements_are_kana() {
        for c in ['\u{1B000}', '\u{1B001}', '\u{1B11F}', '\u{1B150}', '\u{1B164}'] {
            assert!(is_cjk(c), "{c:?} should be CJK");
        }
    }

    #[test]
    fn only_unified_compatibility_ideographs_count() {
        for c in ['\u{FA0E}', '\u{FA11}', '\u{FA1F}', '\u{FA29}'] {
            assert!(is_cjk(c), "{c:?} should be CJK");
        }
        for c in ['\u{F900}', '\u{FA10}', '\u{FA12}', '\u{FA2A}', '\u{FAD9}'] {
            assert!(!is_cjk(c), "{c:?} should not be CJK");
        }
    }

    #[test]
    fn spaces_around_prolonged_mark_follow_neighbours() {
        // `ー` is not CJK itself; the run before it touches `カ`.
        assert_eq!(collapse_cjk_spacing("カ ー ド"), "カード");
        assert_eq!(collapse_cjk_spacing("a ー b"), "a ー b");
    }

    #[test]
    fn collapses_spacing_around_cjk() {
        assert_eq!(collapse_cjk_spacing(" 日本 語 \n"), "日本語\n");
        assert_eq!(collapse_cjk_spacing("JR 東京 station"), "JR東京station");
        assert_eq!(collapse_cjk_spacing("こ\t\u{3000}ん に ち は"), "こんにちは");
    }

    #[test]
    fn keeps_latin_spacing_on_cjk_lines() {
        assert_eq!(
            collapse_cjk_spacing("  hello   world 日本\n"),
            "hello   world日本\n"
        );
    }

    #[test]
    fn keeps_crlf_terminator() {
        assert_eq!(collapse_cjk_spacing("日 本 \r\n"), "日本\r\n");
        assert_eq!(trim_line("  abc  \r\n"), "abc\r\n");
    }

    #[test]
    fn trim_line_preserves_internal_spacing() {
        assert_eq!(trim_line("hello   world\n"), "hello   world\n");
        assert_eq!(trim_line("   \n"), "\n");
        assert_eq!(trim_line("no newline  "), "no newline");
    }
}
