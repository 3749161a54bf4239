//! # Translation Scoring
//!
//! Pure quality heuristic used to rank provider answers.
//!
//! ## Score of one result:
//! - **base**: provider confidence, or `default_confidence` when omitted
//!   (built-in providers fill in their own default, see
//!   [`ProviderConfidence`](crate::translation::ProviderConfidence))
//! - **length bonus**: translated/source character ratio within bounds
//! - **trust bonus**: static bonus for the premium and community providers
//! - **pass-through penalty**: translation identical to the source text
//!
//! The weights were tuned by hand against live providers and are kept in
//! configuration so they can be re-tuned without a rebuild.

use crate::translation::types::{ProviderKind, ProviderResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Base score for providers that report no confidence
    pub default_confidence: f64,

    /// Bonus when the length ratio is within [min_length_ratio, max_length_ratio]
    pub length_ratio_bonus: f64,
    pub min_length_ratio: f64,
    pub max_length_ratio: f64,

    /// Most trusted provider and its bonus
    pub premium_provider: ProviderKind,
    pub premium_bonus: f64,

    /// Community-backed provider and its bonus
    pub community_provider: ProviderKind,
    pub community_bonus: f64,

    /// Subtracted when the translation equals the source verbatim
    pub passthrough_penalty: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            default_confidence: 0.5,
            length_ratio_bonus: 0.2,
            min_length_ratio: 0.5,
            max_length_ratio: 2.0,
            premium_provider: ProviderKind::GoogleFree,
            premium_bonus: 0.1,
            community_provider: ProviderKind::MyMemory,
            community_bonus: 0.05,
            passthrough_penalty: 0.3,
        }
    }
}

impl ScoringWeights {
    pub fn validate(&self) -> Result<(), String> {
        let numbers = [
            ("default_confidence", self.default_confidence),
            ("length_ratio_bonus", self.length_ratio_bonus),
            ("min_length_ratio", self.min_length_ratio),
            ("max_length_ratio", self.max_length_ratio),
            ("premium_bonus", self.premium_bonus),
            ("community_bonus", self.community_bonus),
            ("passthrough_penalty", self.passthrough_penalty),
        ];
        if let Some((name, _)) = numbers.iter().find(|(_, value)| !value.is_finite()) {
            return Err(format!("{} must be a finite number", name));
        }

        if !(0.0..=1.0).contains(&self.default_confidence) {
            return Err("default_confidence must be within [0, 1]".to_string());
        }
        if self.min_length_ratio <= 0.0 || self.min_length_ratio > self.max_length_ratio {
            return Err("length ratio bounds must satisfy 0 < min <= max".to_string());
        }
        Ok(())
    }
}

/// A provider answer together with its registry position.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Index in registry order; lower wins ties
    pub priority: usize,
    pub result: ProviderResult,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredTranslation {
    pub priority: usize,
    pub score: f64,
    pub result: ProviderResult,
}

/// Score a single provider result against the (preprocessed) source text.
pub fn score_translation(result: &ProviderResult, source_text: &str, weights: &ScoringWeights) -> f64 {
    let mut score = result.confidence.unwrap_or(weights.default_confidence);

    let translated = result.text.trim();
    let source = source_text.trim();

    let source_len = source.chars().count();
    if source_len > 0 {
        let ratio = translated.chars().count() as f64 / source_len as f64;
        if ratio >= weights.min_length_ratio && ratio <= weights.max_length_ratio {
            score += weights.length_ratio_bonus;
        }
    }

    if result.source_provider == weights.premium_provider {
        score += weights.premium_bonus;
    } else if result.source_provider == weights.community_provider {
        score += weights.community_bonus;
    }

    if translated == source {
        score -= weights.passthrough_penalty;
    }

    score
}

/// Pick the best candidate: highest score, ties to the lowest priority.
///
/// Candidates with blank text are ignored. Returns `None` when nothing is left.
pub fn select_best_translation(
    candidates: &[Candidate],
    source_text: &str,
    weights: &ScoringWeights,
) -> Option<ScoredTranslation> {
    let mut best: Option<ScoredTranslation> = None;

    for candidate in candidates.iter().filter(|c| !c.result.text.trim().is_empty()) {
        let score = score_translation(&candidate.result, source_text, weights);
        let better = match &best {
            None => true,
            Some(current) => {
                score > current.score
                    || (score == current.score && candidate.priority < current.priority)
            }
        };

        if better {
            best = Some(ScoredTranslation {
                priority: candidate.priority,
                score,
                result: candidate.result.clone(),
            });
        }
    }

    best
}
