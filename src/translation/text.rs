//! # Text Pre- and Post-processing
//!
//! Normalises text before it is sent to providers and tidies the winning
//! translation before it is returned.
//!
//! ## Punctuation conventions:
//! - **Arabic**: `،` `؛` `؟` `!`
//! - **Latin** (everything else): `,` `.` `;` `?` `!`
//!
//! A mark never has whitespace before it and has exactly one space after it,
//! unless it ends the text, is followed by another mark, or sits tight
//! between two digits (`3.14`). Both passes are idempotent.

use crate::translation::languages;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ZERO_WIDTH: Regex = Regex::new(r"[\x{200B}-\x{200D}\x{FEFF}]").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

const ARABIC_MARKS: &[char] = &['،', '؛', '؟', '!'];
const LATIN_MARKS: &[char] = &[',', '.', ';', '?', '!'];

/// Which punctuation set to normalise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PunctuationConvention {
    Arabic,
    Latin,
}

impl PunctuationConvention {
    pub fn for_language(code: &str) -> Self {
        if languages::is_arabic(code) {
            PunctuationConvention::Arabic
        } else {
            PunctuationConvention::Latin
        }
    }

    fn marks(&self) -> &'static [char] {
        match self {
            PunctuationConvention::Arabic => ARABIC_MARKS,
            PunctuationConvention::Latin => LATIN_MARKS,
        }
    }
}

/// Prepare caller text for the providers.
///
/// Trims, strips zero-width characters, normalises punctuation spacing for
/// `convention` and collapses whitespace runs into single spaces.
pub fn preprocess(text: &str, convention: PunctuationConvention) -> String {
    let stripped = strip_zero_width(text.trim());
    let spaced = normalize_punctuation_spacing(&stripped, convention.marks());
    collapse_whitespace(&spaced)
}

/// Tidy the winning translation for `target_lang`.
///
/// Arabic targets get Arabic comma, semicolon and question mark; targets
/// with a cased script (Latin, Cyrillic) get a capitalised first letter.
pub fn postprocess(text: &str, target_lang: &str) -> String {
    let mut result = text.trim().to_string();

    if languages::is_arabic(target_lang) {
        result = to_arabic_punctuation(&result);
    }

    if languages::has_cased_script(target_lang) {
        result = capitalize_first(&result);
    }

    collapse_whitespace(&result)
}

pub fn strip_zero_width(text: &str) -> String {
    ZERO_WIDTH.replace_all(text, "").into_owned()
}

pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

pub fn to_arabic_punctuation(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            ',' => '،',
            ';' => '؛',
            '?' => '؟',
            other => other,
        })
        .collect()
}

pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn normalize_punctuation_spacing(text: &str, marks: &[char]) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 8);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            let end = skip_whitespace(&chars, i);
            // whitespace in front of a mark is dropped
            if end < chars.len() && marks.contains(&chars[end]) {
                i = end;
                continue;
            }
            out.push(' ');
            i = end;
            continue;
        }

        if marks.contains(&c) {
            let prev_is_digit = out.chars().last().map_or(false, |p| p.is_ascii_digit());
            out.push(c);

            let end = skip_whitespace(&chars, i + 1);
            let had_space = end > i + 1;
            if let Some(&next) = chars.get(end) {
                let tight = marks.contains(&next)
                    || (!had_space && prev_is_digit && next.is_ascii_digit());
                if !tight {
                    out.push(' ');
                }
            }
            i = end;
            continue;
        }

        out.push(c);
        i += 1;
    }

    out
}

fn skip_whitespace(chars: &[char], mut i: usize) -> usize {
    while i < chars.len() && chars[i].is_whitespace() {
        i += 1;
    }
    i
}
