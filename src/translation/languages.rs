//! Supported language catalogue.
//!
//! Codes, native names and writing scripts of every language the front-end
//! offers. The script drives post-processing (capitalisation only makes
//! sense for cased scripts, Arabic punctuation only for Arabic).

use serde::Serialize;

/// Writing system of a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Script {
    Latin,
    Arabic,
    Cyrillic,
    Han,
    Japanese,
    Hangul,
    Devanagari,
}

impl Script {
    /// Scripts with upper/lower case letters.
    pub fn is_cased(&self) -> bool {
        matches!(self, Script::Latin | Script::Cyrillic)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SupportedLanguage {
    pub code: &'static str,
    pub native_name: &'static str,
    pub script: Script,
}

const fn lang(code: &'static str, native_name: &'static str, script: Script) -> SupportedLanguage {
    SupportedLanguage { code, native_name, script }
}

pub static SUPPORTED_LANGUAGES: &[SupportedLanguage] = &[
    lang("ar", "العربية", Script::Arabic),
    lang("en", "English", Script::Latin),
    lang("es", "Español", Script::Latin),
    lang("fr", "Français", Script::Latin),
    lang("de", "Deutsch", Script::Latin),
    lang("it", "Italiano", Script::Latin),
    lang("pt", "Português", Script::Latin),
    lang("ru", "Русский", Script::Cyrillic),
    lang("ja", "日本語", Script::Japanese),
    lang("ko", "한국어", Script::Hangul),
    lang("zh", "中文", Script::Han),
    lang("hi", "हिन्दी", Script::Devanagari),
    lang("tr", "Türkçe", Script::Latin),
    lang("nl", "Nederlands", Script::Latin),
    lang("pl", "Polski", Script::Latin),
    lang("sv", "Svenska", Script::Latin),
    lang("da", "Dansk", Script::Latin),
    lang("no", "Norsk", Script::Latin),
    lang("fi", "Suomi", Script::Latin),
    lang("cs", "Čeština", Script::Latin),
    lang("sk", "Slovenčina", Script::Latin),
    lang("hu", "Magyar", Script::Latin),
    lang("ro", "Română", Script::Latin),
    lang("bg", "Български", Script::Cyrillic),
    lang("hr", "Hrvatski", Script::Latin),
    lang("sr", "Српски", Script::Cyrillic),
    lang("sl", "Slovenščina", Script::Latin),
    lang("et", "Eesti", Script::Latin),
    lang("lv", "Latviešu", Script::Latin),
    lang("lt", "Lietuvių", Script::Latin),
    lang("mt", "Malti", Script::Latin),
    lang("ga", "Gaeilge", Script::Latin),
    lang("cy", "Cymraeg", Script::Latin),
    lang("eu", "Euskera", Script::Latin),
    lang("ca", "Català", Script::Latin),
    lang("gl", "Galego", Script::Latin),
    lang("is", "Íslenska", Script::Latin),
    lang("mk", "Македонски", Script::Cyrillic),
    lang("sq", "Shqip", Script::Latin),
    lang("bs", "Bosanski", Script::Latin),
    lang("me", "Crnogorski", Script::Latin),
];

/// Strip a region subtag: `"en-US"` and `"pt_BR"` become `"en"` and `"pt"`.
pub fn base_code(code: &str) -> String {
    code.trim()
        .split(|c| c == '-' || c == '_')
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

/// Look up a language by code (region subtags ignored).
pub fn find(code: &str) -> Option<&'static SupportedLanguage> {
    let base = base_code(code);
    SUPPORTED_LANGUAGES.iter().find(|l| l.code == base)
}

pub fn is_supported(code: &str) -> bool {
    find(code).is_some()
}

pub fn script_of(code: &str) -> Option<Script> {
    find(code).map(|l| l.script)
}

pub fn is_arabic(code: &str) -> bool {
    script_of(code) == Some(Script::Arabic)
}

/// Whether the language is written in a script with upper and lower case.
pub fn has_cased_script(code: &str) -> bool {
    script_of(code).map_or(false, |script| script.is_cased())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_subtags_are_ignored() {
        assert_eq!(base_code("en-US"), "en");
        assert_eq!(base_code("PT_br"), "pt");
        assert_eq!(script_of("fr-CA"), Some(Script::Latin));
    }

    #[test]
    fn scripts_are_classified() {
        assert!(is_arabic("ar"));
        assert_eq!(script_of("ja"), Some(Script::Japanese));
        assert_eq!(script_of("ru"), Some(Script::Cyrillic));
        assert_eq!(script_of("xx"), None);
    }

    #[test]
    fn cased_scripts() {
        assert!(has_cased_script("de"));
        assert!(has_cased_script("bg"));
        assert!(!has_cased_script("ar"));
        assert!(!has_cased_script("zh"));
        assert!(!has_cased_script("xx"));
    }

    #[test]
    fn catalogue_codes_are_unique() {
        let mut codes: Vec<_> = SUPPORTED_LANGUAGES.iter().map(|l| l.code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), SUPPORTED_LANGUAGES.len());
    }
}
