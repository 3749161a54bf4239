//! # Language Detection
//!
//! Offline heuristic detector. Pure and deterministic: the same text always
//! yields the same language, no network involved.
//!
//! ## Scoring:
//! - **Script ratio**: share of characters in a script block × 100
//!   (Arabic, Han, Kana, Hangul, Cyrillic, Devanagari)
//! - **Stop words**: ×5 per Arabic hit, ×3 per hit for Latin-script languages
//! - **Latin letters**: ratio × 10 for English, × 8 for other Latin languages
//!
//! The highest score wins; when it stays below [`MIN_DETECTION_SCORE`] the
//! configured fallback language is returned.

use serde::Serialize;
use unicode_segmentation::UnicodeSegmentation;

/// Below this best score the text is considered undetectable.
pub const MIN_DETECTION_SCORE: f64 = 5.0;

const ARABIC_WORD_WEIGHT: f64 = 5.0;
const LATIN_WORD_WEIGHT: f64 = 3.0;
const ENGLISH_LATIN_WEIGHT: f64 = 10.0;
const OTHER_LATIN_WEIGHT: f64 = 8.0;

/// Candidate languages; order breaks ties.
const CANDIDATES: [&str; 11] = ["ar", "en", "zh", "ja", "ko", "fr", "de", "es", "it", "ru", "hi"];

const ARABIC_WORDS: &[&str] = &[
    "في", "من", "إلى", "على", "هذا", "هذه", "التي", "الذي", "كان", "كانت", "يكون", "تكون", "مع",
    "عند", "بعد", "قبل", "أن", "إن", "لا", "نعم",
];

const ENGLISH_WORDS: &[&str] = &[
    "the", "and", "is", "in", "to", "of", "a", "that", "it", "with", "for", "as", "was", "on",
    "are", "you", "this", "be", "at", "have", "hello", "world", "time", "good", "can", "will",
    "would", "could", "should",
];

const FRENCH_WORDS: &[&str] = &[
    "le", "de", "et", "un", "à", "être", "avoir", "que", "pour", "dans", "ce", "son", "une", "sur",
    "avec", "ne", "se", "pas", "tout", "plus", "bonjour", "merci", "oui", "non",
];

const GERMAN_WORDS: &[&str] = &[
    "der", "die", "das", "und", "ist", "nicht", "ich", "du", "wir", "mit", "auf", "für", "ein",
    "eine", "zu", "von", "hallo", "danke", "ja", "nein",
];

const SPANISH_WORDS: &[&str] = &[
    "el", "la", "los", "las", "y", "es", "que", "en", "un", "una", "por", "con", "para", "no",
    "hola", "gracias", "sí", "muy", "como", "pero",
];

const ITALIAN_WORDS: &[&str] = &[
    "il", "lo", "gli", "della", "e", "è", "che", "di", "un", "una", "per", "con", "non", "sono",
    "ciao", "grazie", "buongiorno", "molto", "questo", "anche",
];

/// Score of one candidate language.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageScore {
    pub language: &'static str,
    pub score: f64,
}

/// Detect the language of `text`, or return `fallback` when unsure.
pub fn detect_language(text: &str, fallback: &str) -> String {
    let scores = detect_language_scores(text);

    let mut best: Option<&LanguageScore> = None;
    for candidate in &scores {
        if best.map_or(true, |b| candidate.score > b.score) {
            best = Some(candidate);
        }
    }

    match best {
        Some(b) if b.score >= MIN_DETECTION_SCORE => b.language.to_string(),
        _ => fallback.to_string(),
    }
}

/// Full score table, in candidate order. Empty text scores zero everywhere.
pub fn detect_language_scores(text: &str) -> Vec<LanguageScore> {
    let mut scores: Vec<LanguageScore> = CANDIDATES
        .iter()
        .map(|&language| LanguageScore { language, score: 0.0 })
        .collect();

    let text = text.trim();
    let length = text.chars().count();
    if length == 0 {
        return scores;
    }

    let mut add = |language: &str, amount: f64| {
        if let Some(entry) = scores.iter_mut().find(|s| s.language == language) {
            entry.score += amount;
        }
    };

    let ratio = |count: usize| count as f64 / length as f64;

    let script_counts = ScriptCounts::of(text);
    add("ar", ratio(script_counts.arabic) * 100.0);
    add("zh", ratio(script_counts.han) * 100.0);
    add("ja", ratio(script_counts.kana) * 100.0);
    add("ko", ratio(script_counts.hangul) * 100.0);
    add("ru", ratio(script_counts.cyrillic) * 100.0);
    add("hi", ratio(script_counts.devanagari) * 100.0);

    let words: Vec<String> = text.unicode_words().map(|w| w.to_lowercase()).collect();
    let hits = |list: &[&str]| words.iter().filter(|w| list.contains(&w.as_str())).count() as f64;

    add("ar", hits(ARABIC_WORDS) * ARABIC_WORD_WEIGHT);
    add("en", hits(ENGLISH_WORDS) * LATIN_WORD_WEIGHT);
    add("fr", hits(FRENCH_WORDS) * LATIN_WORD_WEIGHT);
    add("de", hits(GERMAN_WORDS) * LATIN_WORD_WEIGHT);
    add("es", hits(SPANISH_WORDS) * LATIN_WORD_WEIGHT);
    add("it", hits(ITALIAN_WORDS) * LATIN_WORD_WEIGHT);

    if script_counts.latin > 0 {
        let latin_ratio = ratio(script_counts.latin);
        add("en", latin_ratio * ENGLISH_LATIN_WEIGHT);
        for language in ["fr", "de", "es", "it"] {
            add(language, latin_ratio * OTHER_LATIN_WEIGHT);
        }
    }

    scores
}

#[derive(Debug, Default)]
struct ScriptCounts {
    arabic: usize,
    han: usize,
    kana: usize,
    hangul: usize,
    cyrillic: usize,
    devanagari: usize,
    latin: usize,
}

impl ScriptCounts {
    fn of(text: &str) -> Self {
        let mut counts = ScriptCounts::default();
        for c in text.chars() {
            match c {
                '\u{0600}'..='\u{06FF}'
                | '\u{0750}'..='\u{077F}'
                | '\u{08A0}'..='\u{08FF}'
                | '\u{FB50}'..='\u{FDFF}'
                | '\u{FE70}'..='\u{FEFF}' => counts.arabic += 1,
                '\u{4E00}'..='\u{9FFF}' => counts.han += 1,
                '\u{3040}'..='\u{30FF}' => counts.kana += 1,
                '\u{AC00}'..='\u{D7AF}' => counts.hangul += 1,
                '\u{0400}'..='\u{04FF}' => counts.cyrillic += 1,
                '\u{0900}'..='\u{097F}' => counts.devanagari += 1,
                'a'..='z' | 'A'..='Z' => counts.latin += 1,
                _ => {}
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_arabic() {
        assert_eq!(detect_language("مرحبا بالعالم", "en"), "ar");
    }

    #[test]
    fn detects_english() {
        assert_eq!(detect_language("Hello world", "ar"), "en");
    }

    #[test]
    fn empty_text_uses_fallback() {
        assert_eq!(detect_language("", "fr"), "fr");
        assert_eq!(detect_language("   ", "de"), "de");
    }

    #[test]
    fn low_scores_use_fallback() {
        assert_eq!(detect_language("123 456 !!!", "es"), "es");
    }

    #[test]
    fn detects_cjk_scripts() {
        assert_eq!(detect_language("你好世界", "en"), "zh");
        assert_eq!(detect_language("こんにちは世界", "en"), "ja");
        assert_eq!(detect_language("안녕하세요", "en"), "ko");
        assert_eq!(detect_language("Привет мир", "en"), "ru");
    }

    #[test]
    fn stop_words_separate_latin_languages() {
        assert_eq!(detect_language("bonjour et merci pour tout", "en"), "fr");
        assert_eq!(detect_language("hola, gracias por todo y muy bien", "en"), "es");
        assert_eq!(detect_language("the cat is on the mat", "fr"), "en");
    }

    #[test]
    fn detection_is_deterministic() {
        let text = "Das ist nicht gut, aber danke";
        let first = detect_language_scores(text);
        for _ in 0..5 {
            assert_eq!(detect_language_scores(text), first);
        }
        assert_eq!(detect_language(text, "en"), "de");
    }
}
