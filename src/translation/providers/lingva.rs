//! Lingva, a scraper-free Google Translate front-end
//! (`GET /api/v1/{source}/{target}/{text}`).

use super::{non_empty_result, send_json, Provider};
use crate::translation::error::ProviderError;
use crate::translation::types::{ProviderKind, ProviderResult, TranslationRequest};
use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;

pub struct LingvaProvider {
    client: reqwest::Client,
    base_url: String,
    default_confidence: f64,
}

impl LingvaProvider {
    pub fn new(client: reqwest::Client, base_url: String, default_confidence: f64) -> Self {
        Self {
            client,
            base_url,
            default_confidence,
        }
    }

    /// Text goes into the path, so every segment is percent-encoded.
    fn request_url(&self, request: &TranslationRequest) -> Result<Url, ProviderError> {
        let provider = ProviderKind::Lingva;
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ProviderError::malformed(provider, format!("bad base url: {}", e)))?;

        url.path_segments_mut()
            .map_err(|_| ProviderError::malformed(provider, "base url cannot carry a path"))?
            .pop_if_empty()
            .extend(&[
                "api",
                "v1",
                request.source_lang.as_str(),
                request.target_lang.as_str(),
                request.text.as_str(),
            ]);

        Ok(url)
    }
}

#[async_trait]
impl Provider for LingvaProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Lingva
    }

    async fn translate(&self, request: &TranslationRequest) -> Result<ProviderResult, ProviderError> {
        let url = self.request_url(request)?;
        let http = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json");

        let body = send_json(self.kind(), http).await?;
        parse_response(&body, self.default_confidence)
    }
}

fn parse_response(body: &Value, default_confidence: f64) -> Result<ProviderResult, ProviderError> {
    let provider = ProviderKind::Lingva;
    let text = body
        .get("translation")
        .and_then(Value::as_str)
        .ok_or_else(|| ProviderError::malformed(provider, "no translation found"))?;

    let detected = body
        .pointer("/info/detectedSource")
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(non_empty_result(provider, text)?
        .with_confidence(default_confidence)
        .with_detected_source(detected))
}
