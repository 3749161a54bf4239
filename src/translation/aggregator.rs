//! # Translation Aggregator
//!
//! Resolves one translation request into a single best-effort translation by
//! asking every registered provider at once and keeping the best answer.
//!
//! ## Flow of `translate`:
//! 1. **Validate**: trimmed text must be non-empty and within `max_text_length`
//! 2. **Preprocess**: zero-width characters, punctuation spacing, whitespace
//! 3. **Settle-all fan-out**: every provider runs concurrently under its own
//!    timeout; a failure or timeout never cancels a sibling
//! 4. **Score and select**: see [`crate::translation::scoring`]
//! 5. **Fallback**: only when no provider produced usable text, one legacy
//!    provider is tried serially
//! 6. **Post-process** the winner and advance the round-robin cursor
//!
//! ## Errors:
//! - `InvalidInput` before any network call
//! - `AllProvidersFailed` with every provider error attached

use crate::translation::detect;
use crate::translation::error::{ProviderError, TranslationError};
use crate::translation::providers::Provider;
use crate::translation::registry::ProviderRegistry;
use crate::translation::scoring::{
    score_translation, select_best_translation, Candidate, ScoredTranslation, ScoringWeights,
};
use crate::translation::text::{self, PunctuationConvention};
use crate::translation::types::{
    AggregatedTranslation, ProviderKind, ProviderResult, TranslationRequest, AUTO_LANGUAGE,
};
use futures_util::future::join_all;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Tuning knobs of the aggregator.
#[derive(Debug, Clone)]
pub struct AggregatorOptions {
    /// Budget for each individual provider call
    pub timeout_per_provider: Duration,

    /// Maximum accepted text length, in characters
    pub max_text_length: usize,

    /// Returned by language detection when the text is inconclusive
    pub fallback_language: String,

    pub weights: ScoringWeights,
}

impl Default for AggregatorOptions {
    fn default() -> Self {
        Self {
            timeout_per_provider: Duration::from_millis(9000),
            max_text_length: 5000,
            fallback_language: "en".to_string(),
            weights: ScoringWeights::default(),
        }
    }
}

/// Multi-provider translator with settle-all fan-out and a serial fallback.
pub struct Aggregator {
    registry: ProviderRegistry,
    fallback: Option<Arc<dyn Provider>>,
    options: AggregatorOptions,
}

impl Aggregator {
    pub fn new(
        registry: ProviderRegistry,
        fallback: Option<Arc<dyn Provider>>,
        options: AggregatorOptions,
    ) -> Self {
        Self {
            registry,
            fallback,
            options,
        }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn fallback_provider(&self) -> Option<ProviderKind> {
        self.fallback.as_ref().map(|p| p.kind())
    }

    pub fn options(&self) -> &AggregatorOptions {
        &self.options
    }

    /// Offline language detection using the configured fallback language.
    pub fn detect_language(&self, text: &str) -> String {
        detect::detect_language(text, &self.options.fallback_language)
    }

    /// Translate `text` from `source_lang` (a code or `"auto"`) to `target_lang`.
    pub async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<AggregatedTranslation, TranslationError> {
        let request = self.prepare_request(text, source_lang, target_lang)?;

        info!(
            source_lang = %request.source_lang,
            target_lang = %request.target_lang,
            chars = request.text.chars().count(),
            providers = self.registry.len(),
            first = ?self.registry.current_provider(),
            "Dispatching translation"
        );

        let outcomes = self.dispatch_all(&request).await;
        self.registry.advance();

        let mut candidates = Vec::new();
        let mut errors = Vec::new();
        for (priority, outcome) in outcomes {
            match outcome {
                Ok(result) => candidates.push(Candidate { priority, result }),
                Err(err) => errors.push(err),
            }
        }

        let best = match select_best_translation(&candidates, &request.text, &self.options.weights) {
            Some(best) => best,
            None => self.run_fallback(&request, errors).await?,
        };

        self.registry.record_win(best.result.source_provider).await;

        info!(
            provider = %best.result.source_provider,
            score = best.score,
            candidates = candidates.len(),
            "Translation selected"
        );

        Ok(self.finish(best, &request))
    }

    /// Validate and preprocess caller input.
    fn prepare_request(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<TranslationRequest, TranslationError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(TranslationError::InvalidInput("text is empty".to_string()));
        }

        let length = trimmed.chars().count();
        if length > self.options.max_text_length {
            return Err(TranslationError::InvalidInput(format!(
                "text is {} characters long, the maximum is {}",
                length, self.options.max_text_length
            )));
        }

        let target_lang = target_lang.trim().to_lowercase();
        if target_lang.is_empty() || target_lang == AUTO_LANGUAGE {
            return Err(TranslationError::InvalidInput(
                "a concrete target language is required".to_string(),
            ));
        }

        let source_lang = match source_lang.trim() {
            "" => AUTO_LANGUAGE.to_string(),
            code => code.to_lowercase(),
        };

        let convention = if source_lang == AUTO_LANGUAGE {
            PunctuationConvention::for_language(&self.detect_language(trimmed))
        } else {
            PunctuationConvention::for_language(&source_lang)
        };

        let prepared = text::preprocess(trimmed, convention);
        if prepared.is_empty() {
            return Err(TranslationError::InvalidInput(
                "text is empty after normalisation".to_string(),
            ));
        }

        Ok(TranslationRequest::new(prepared, source_lang, target_lang))
    }

    /// Run every provider concurrently and wait for all of them to settle.
    ///
    /// Outcomes come back in registry order, whatever the dispatch rotation.
    async fn dispatch_all(
        &self,
        request: &TranslationRequest,
    ) -> Vec<(usize, Result<ProviderResult, ProviderError>)> {
        let providers = self.registry.providers();
        let calls = self.registry.dispatch_order().into_iter().map(|index| {
            let provider = Arc::clone(&providers[index]);
            async move { (index, self.settle(provider.as_ref(), request).await) }
        });

        let mut outcomes = join_all(calls).await;
        outcomes.sort_by_key(|(index, _)| *index);
        outcomes
    }

    /// One provider call under its own timeout; never panics, never cancels others.
    async fn settle(
        &self,
        provider: &dyn Provider,
        request: &TranslationRequest,
    ) -> Result<ProviderResult, ProviderError> {
        let kind = provider.kind();
        let started = Instant::now();

        let outcome = match tokio::time::timeout(self.options.timeout_per_provider, provider.translate(request)).await {
            Ok(Ok(result)) if result.text.trim().is_empty() => {
                Err(ProviderError::EmptyTranslation { provider: kind })
            }
            Ok(Ok(mut result)) => {
                result.source_provider = kind;
                Ok(result)
            }
            Ok(Err(err)) => Err(err),
            Err(_) => Err(ProviderError::Timeout {
                provider: kind,
                timeout_ms: self.options.timeout_per_provider.as_millis() as u64,
            }),
        };

        let latency_ms = started.elapsed().as_millis() as u64;
        self.registry.record_outcome(kind, latency_ms, outcome.is_ok()).await;

        match &outcome {
            Ok(result) => debug!(
                provider = %kind,
                latency_ms,
                confidence = ?result.confidence,
                "Provider answered"
            ),
            Err(err) => warn!(provider = %kind, latency_ms, error = %err, "Provider failed"),
        }

        outcome
    }

    async fn run_fallback(
        &self,
        request: &TranslationRequest,
        mut errors: Vec<ProviderError>,
    ) -> Result<ScoredTranslation, TranslationError> {
        let Some(fallback) = self.fallback.as_ref() else {
            return Err(TranslationError::AllProvidersFailed { errors });
        };

        warn!(
            failed = errors.len(),
            fallback = %fallback.kind(),
            "All providers failed, trying fallback"
        );

        match self.settle(fallback.as_ref(), request).await {
            Ok(result) => {
                let score = score_translation(&result, &request.text, &self.options.weights);
                Ok(ScoredTranslation {
                    priority: self.registry.len(),
                    score,
                    result,
                })
            }
            Err(err) => {
                errors.push(err);
                Err(TranslationError::AllProvidersFailed { errors })
            }
        }
    }

    fn finish(&self, best: ScoredTranslation, request: &TranslationRequest) -> AggregatedTranslation {
        AggregatedTranslation {
            text: text::postprocess(&best.result.text, &request.target_lang),
            provider: best.result.source_provider,
            confidence: best.score,
            source_lang: request.source_lang.clone(),
            target_lang: request.target_lang.clone(),
            detected_source_lang: best.result.detected_source_lang,
        }
    }
}
