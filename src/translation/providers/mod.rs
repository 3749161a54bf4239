//! # Translation Providers
//!
//! Every free translation service implements the [`Provider`] capability.
//! The aggregator only ever sees `Arc<dyn Provider>`, so adding a service
//! means adding one module and one arm in [`build_provider`].
//!
//! ## HTTP contract shared by all providers:
//! - any non-2xx status is a [`ProviderError::Status`]
//! - a body that is not JSON, or lacks the translated text, is
//!   [`ProviderError::Malformed`]
//! - a blank translation is [`ProviderError::EmptyTranslation`]
//! - a missing confidence is filled in from [`ProviderConfidence`]
//!
//! Timeouts are applied by the aggregator, per call.

pub mod google;
pub mod libretranslate;
pub mod lingva;
pub mod mymemory;

use crate::translation::error::ProviderError;
use crate::translation::types::{ProviderKind, ProviderResult, TranslationRequest};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

pub use google::GoogleFreeProvider;
pub use libretranslate::LibreTranslateProvider;
pub use lingva::LingvaProvider;
pub use mymemory::MyMemoryProvider;

/// A translation service the aggregator can query.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Which service this is
    fn kind(&self) -> ProviderKind;

    fn name(&self) -> &'static str {
        self.kind().display_name()
    }

    /// Translate one request. Must not panic on bad payloads.
    async fn translate(&self, request: &TranslationRequest) -> Result<ProviderResult, ProviderError>;
}

/// Base URLs of the public provider instances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderEndpoints {
    pub mymemory: String,
    pub lingva: String,
    pub libretranslate: String,
    pub googlefree: String,
}

impl Default for ProviderEndpoints {
    fn default() -> Self {
        Self {
            mymemory: "https://api.mymemory.translated.net".to_string(),
            lingva: "https://lingva.ml".to_string(),
            libretranslate: "https://libretranslate.de".to_string(),
            googlefree: "https://translate.googleapis.com".to_string(),
        }
    }
}

impl ProviderEndpoints {
    pub fn base_url(&self, kind: ProviderKind) -> &str {
        match kind {
            ProviderKind::MyMemory => &self.mymemory,
            ProviderKind::Lingva => &self.lingva,
            ProviderKind::LibreTranslate => &self.libretranslate,
            ProviderKind::GoogleFree => &self.googlefree,
        }
    }
}

/// Confidence assumed for each provider when its API reports none.
///
/// Only MyMemory reports a quality figure at all, and it reports `0` for
/// fuzzy matches, which is treated the same as no figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfidence {
    pub mymemory: f64,
    pub lingva: f64,
    pub libretranslate: f64,
    pub googlefree: f64,
}

impl Default for ProviderConfidence {
    fn default() -> Self {
        Self {
            mymemory: 0.7,
            lingva: 0.8,
            libretranslate: 0.85,
            googlefree: 0.9,
        }
    }
}

impl ProviderConfidence {
    pub fn for_kind(&self, kind: ProviderKind) -> f64 {
        match kind {
            ProviderKind::MyMemory => self.mymemory,
            ProviderKind::Lingva => self.lingva,
            ProviderKind::LibreTranslate => self.libretranslate,
            ProviderKind::GoogleFree => self.googlefree,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        for kind in ProviderKind::ALL {
            let value = self.for_kind(kind);
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(format!("default confidence of {} must be within [0, 1]", kind));
            }
        }
        Ok(())
    }
}

/// Shared HTTP client for all providers.
pub fn build_http_client(user_agent: &str) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder().user_agent(user_agent).build()
}

/// Construct the concrete provider for `kind`.
pub fn build_provider(
    kind: ProviderKind,
    client: &reqwest::Client,
    endpoints: &ProviderEndpoints,
    confidence: &ProviderConfidence,
    contact_email: Option<&str>,
) -> Arc<dyn Provider> {
    let base_url = endpoints.base_url(kind).trim_end_matches('/').to_string();
    let default_confidence = confidence.for_kind(kind);
    match kind {
        ProviderKind::MyMemory => Arc::new(MyMemoryProvider::new(
            client.clone(),
            base_url,
            default_confidence,
            contact_email.map(str::to_string),
        )),
        ProviderKind::Lingva => Arc::new(LingvaProvider::new(client.clone(), base_url, default_confidence)),
        ProviderKind::LibreTranslate => Arc::new(LibreTranslateProvider::new(
            client.clone(),
            base_url,
            default_confidence,
        )),
        ProviderKind::GoogleFree => Arc::new(GoogleFreeProvider::new(client.clone(), base_url, default_confidence)),
    }
}

/// Send a request and decode a JSON body, mapping failures to [`ProviderError`].
pub(crate) async fn send_json(
    provider: ProviderKind,
    request: reqwest::RequestBuilder,
) -> Result<Value, ProviderError> {
    let response = request
        .send()
        .await
        .map_err(|e| ProviderError::transport(provider, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ProviderError::Status {
            provider,
            status: status.as_u16(),
        });
    }

    response
        .json::<Value>()
        .await
        .map_err(|e| ProviderError::malformed(provider, e.to_string()))
}

/// Turn raw translated text into a result, rejecting blanks.
pub(crate) fn non_empty_result(provider: ProviderKind, text: &str) -> Result<ProviderResult, ProviderError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ProviderError::EmptyTranslation { provider });
    }
    Ok(ProviderResult::new(provider, trimmed))
}
