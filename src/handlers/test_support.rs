//! Fake providers and app wiring for handler tests.

use crate::config::AppConfig;
use crate::state::AppState;
use crate::translation::{
    Aggregator, Provider, ProviderError, ProviderKind, ProviderRegistry, ProviderResult,
    TranslationRequest,
};
use async_trait::async_trait;
use std::sync::Arc;

/// Answers every request with the same text, or the same HTTP status failure.
pub(crate) struct StaticProvider {
    kind: ProviderKind,
    reply: Result<&'static str, u16>,
    confidence: Option<f64>,
}

impl StaticProvider {
    pub(crate) fn ok(kind: ProviderKind, text: &'static str, confidence: Option<f64>) -> Self {
        Self { kind, reply: Ok(text), confidence }
    }

    pub(crate) fn failing(kind: ProviderKind, status: u16) -> Self {
        Self { kind, reply: Err(status), confidence: None }
    }
}

#[async_trait]
impl Provider for StaticProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    async fn translate(&self, _request: &TranslationRequest) -> Result<ProviderResult, ProviderError> {
        match self.reply {
            Ok(text) => {
                let mut result = ProviderResult::new(self.kind, text);
                result.confidence = self.confidence;
                Ok(result)
            }
            Err(status) => Err(ProviderError::Status { provider: self.kind, status }),
        }
    }
}

/// State around an aggregator made of `providers`, no fallback.
pub(crate) fn state_with(providers: Vec<StaticProvider>) -> AppState {
    let providers: Vec<Arc<dyn Provider>> = providers
        .into_iter()
        .map(|p| Arc::new(p) as Arc<dyn Provider>)
        .collect();

    let config = AppConfig::default();
    let aggregator = Aggregator::new(ProviderRegistry::new(providers), None, config.aggregator_options());
    AppState::with_aggregator(config, aggregator)
}
