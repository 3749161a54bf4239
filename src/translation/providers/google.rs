//! Keyless Google endpoint used by browser extensions
//! (`GET /translate_a/single?client=gtx&dt=t`).
//!
//! The body is a positional array: `[[["seg", "orig", ..], ..], null, "src", ..]`.

use super::{non_empty_result, send_json, Provider};
use crate::translation::error::ProviderError;
use crate::translation::types::{ProviderKind, ProviderResult, TranslationRequest};
use async_trait::async_trait;
use serde_json::Value;

/// The endpoint rejects unknown agents more often than browser ones.
const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko)";

pub struct GoogleFreeProvider {
    client: reqwest::Client,
    base_url: String,
    default_confidence: f64,
}

impl GoogleFreeProvider {
    pub fn new(client: reqwest::Client, base_url: String, default_confidence: f64) -> Self {
        Self {
            client,
            base_url,
            default_confidence,
        }
    }
}

#[async_trait]
impl Provider for GoogleFreeProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::GoogleFree
    }

    async fn translate(&self, request: &TranslationRequest) -> Result<ProviderResult, ProviderError> {
        let http = self
            .client
            .get(format!("{}/translate_a/single", self.base_url))
            .header(reqwest::header::USER_AGENT, BROWSER_USER_AGENT)
            .query(&[
                ("client", "gtx"),
                ("sl", request.source_lang.as_str()),
                ("tl", request.target_lang.as_str()),
                ("dt", "t"),
                ("q", request.text.as_str()),
            ]);

        let body = send_json(self.kind(), http).await?;
        parse_response(&body, self.default_confidence)
    }
}

fn parse_response(body: &Value, default_confidence: f64) -> Result<ProviderResult, ProviderError> {
    let provider = ProviderKind::GoogleFree;
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| ProviderError::malformed(provider, "no translation found"))?;

    let text: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();

    let detected = body.get(2).and_then(Value::as_str).map(str::to_string);

    Ok(non_empty_result(provider, &text)?
        .with_confidence(default_confidence)
        .with_detected_source(detected))
}
