//! # Translation Types
//!
//! Value types that flow through the aggregator: the incoming request, the
//! per-provider answer and the final aggregated translation.
//!
//! ## Lifecycle:
//! - **TranslationRequest**: built once per `translate` call, after validation
//! - **ProviderResult**: produced by one provider call, dropped after scoring
//! - **AggregatedTranslation**: handed back to the caller, never stored here

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Source language value meaning "let the provider work it out".
pub const AUTO_LANGUAGE: &str = "auto";

/// Identifier of a concrete translation provider.
///
/// ## Serialization:
/// Serialized in lowercase (`"mymemory"`, `"googlefree"`, ...) so the same
/// names work in `config.toml`, environment variables and JSON bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// MyMemory public translation memory
    MyMemory,
    /// Lingva, an open-source Google Translate front-end
    Lingva,
    /// LibreTranslate, open-source Argos based engine
    LibreTranslate,
    /// The keyless `translate_a/single` Google endpoint
    GoogleFree,
}

impl ProviderKind {
    /// Every known provider, in the default registry order.
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::MyMemory,
        ProviderKind::Lingva,
        ProviderKind::LibreTranslate,
        ProviderKind::GoogleFree,
    ];

    /// Stable identifier used in configuration and API payloads.
    pub fn id(&self) -> &'static str {
        match self {
            ProviderKind::MyMemory => "mymemory",
            ProviderKind::Lingva => "lingva",
            ProviderKind::LibreTranslate => "libretranslate",
            ProviderKind::GoogleFree => "googlefree",
        }
    }

    /// Human-readable name for logs and diagnostics.
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::MyMemory => "MyMemory",
            ProviderKind::Lingva => "Lingva",
            ProviderKind::LibreTranslate => "LibreTranslate",
            ProviderKind::GoogleFree => "Google (free)",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ProviderKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.id() == wanted)
            .ok_or_else(|| format!("unknown provider '{}'", s))
    }
}

/// A validated translation request as sent to every provider.
///
/// ## Invariants:
/// - `text` is already preprocessed and non-empty
/// - `source_lang` is a language code or [`AUTO_LANGUAGE`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationRequest {
    pub text: String,
    pub source_lang: String,
    pub target_lang: String,
}

impl TranslationRequest {
    pub fn new(text: impl Into<String>, source_lang: impl Into<String>, target_lang: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source_lang: source_lang.into(),
            target_lang: target_lang.into(),
        }
    }

    /// Whether the source language should be detected by the provider.
    pub fn is_auto_source(&self) -> bool {
        self.source_lang.eq_ignore_ascii_case(AUTO_LANGUAGE)
    }
}

/// What a single provider answered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderResult {
    /// Translated text as returned by the provider (trimmed)
    pub text: String,

    /// Provider-reported confidence in [0, 1], when it reports one
    pub confidence: Option<f64>,

    /// Which provider produced this result
    pub source_provider: ProviderKind,

    /// Source language the provider detected, if any
    pub detected_source_lang: Option<String>,
}

impl ProviderResult {
    pub fn new(source_provider: ProviderKind, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            confidence: None,
            source_provider,
            detected_source_lang: None,
        }
    }

    /// Clamped to [0, 1]; NaN is treated as no confidence at all.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = (!confidence.is_nan()).then(|| confidence.clamp(0.0, 1.0));
        self
    }

    pub fn with_detected_source(mut self, lang: Option<String>) -> Self {
        self.detected_source_lang = lang.filter(|l| !l.trim().is_empty());
        self
    }
}

/// The winning translation returned to the caller.
///
/// `confidence` holds the aggregator score, which can exceed 1.0 once the
/// length and trust bonuses are added.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedTranslation {
    pub text: String,
    pub provider: ProviderKind,
    pub confidence: f64,
    pub source_lang: String,
    pub target_lang: String,
    pub detected_source_lang: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_kind_parses_ids_case_insensitively() {
        assert_eq!("GoogleFree".parse::<ProviderKind>(), Ok(ProviderKind::GoogleFree));
        assert_eq!(" lingva ".parse::<ProviderKind>(), Ok(ProviderKind::Lingva));
        assert!("deepl".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn provider_kind_serializes_to_its_id() {
        let json = serde_json::to_string(&ProviderKind::LibreTranslate).unwrap();
        assert_eq!(json, "\"libretranslate\"");
        let kind: ProviderKind = serde_json::from_str("\"mymemory\"").unwrap();
        assert_eq!(kind, ProviderKind::MyMemory);
    }

    #[test]
    fn provider_result_clamps_confidence_and_drops_blank_detection() {
        let result = ProviderResult::new(ProviderKind::MyMemory, "Hola")
            .with_confidence(1.7)
            .with_detected_source(Some("  ".to_string()));
        assert_eq!(result.confidence, Some(1.0));
        assert_eq!(result.detected_source_lang, None);

        let result = ProviderResult::new(ProviderKind::Lingva, "Hola").with_confidence(f64::NAN);
        assert_eq!(result.confidence, None);
    }

    #[test]
    fn auto_source_detection() {
        assert!(TranslationRequest::new("hi", "AUTO", "fr").is_auto_source());
        assert!(!TranslationRequest::new("hi", "en", "fr").is_auto_source());
    }
}
