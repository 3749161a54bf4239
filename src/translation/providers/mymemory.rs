//! MyMemory translation memory (`GET /get?q=..&langpair=src|tgt`).
//!
//! The only provider that reports a quality figure: `responseData.match`.
//! A missing or zero match falls back to the configured default.

use super::{non_empty_result, send_json, Provider};
use crate::translation::error::ProviderError;
use crate::translation::types::{ProviderKind, ProviderResult, TranslationRequest};
use async_trait::async_trait;
use serde_json::Value;

pub struct MyMemoryProvider {
    client: reqwest::Client,
    base_url: String,
    default_confidence: f64,
    /// Sent as `de=`; MyMemory grants a larger daily quota to identified callers
    contact_email: Option<String>,
}

impl MyMemoryProvider {
    pub fn new(
        client: reqwest::Client,
        base_url: String,
        default_confidence: f64,
        contact_email: Option<String>,
    ) -> Self {
        Self {
            client,
            base_url,
            default_confidence,
            contact_email,
        }
    }
}

#[async_trait]
impl Provider for MyMemoryProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::MyMemory
    }

    async fn translate(&self, request: &TranslationRequest) -> Result<ProviderResult, ProviderError> {
        let lang_pair = format!("{}|{}", request.source_lang, request.target_lang);
        let mut query = vec![("q", request.text.as_str()), ("langpair", lang_pair.as_str())];
        if let Some(email) = self.contact_email.as_deref() {
            query.push(("de", email));
        }

        let http = self
            .client
            .get(format!("{}/get", self.base_url))
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&query);

        let body = send_json(self.kind(), http).await?;
        parse_response(&body, request, self.default_confidence)
    }
}

fn parse_response(
    body: &Value,
    request: &TranslationRequest,
    default_confidence: f64,
) -> Result<ProviderResult, ProviderError> {
    let provider = ProviderKind::MyMemory;

    // responseStatus shows up both as 200 and "200"
    let status = body.get("responseStatus").and_then(|s| {
        s.as_u64().or_else(|| s.as_str().and_then(|v| v.trim().parse().ok()))
    });
    if status != Some(200) {
        let detail = body
            .get("responseDetails")
            .and_then(Value::as_str)
            .unwrap_or("unknown error");
        return Err(ProviderError::malformed(
            provider,
            format!("responseStatus {:?}: {}", status, detail),
        ));
    }

    let data = body
        .get("responseData")
        .ok_or_else(|| ProviderError::malformed(provider, "missing responseData"))?;
    let text = data
        .get("translatedText")
        .and_then(Value::as_str)
        .ok_or_else(|| ProviderError::malformed(provider, "missing translatedText"))?;

    let confidence = data
        .get("match")
        .and_then(Value::as_f64)
        .filter(|m| *m > 0.0)
        .unwrap_or(default_confidence);

    let mut result = non_empty_result(provider, text)?.with_confidence(confidence);
    if !request.is_auto_source() {
        result = result.with_detected_source(Some(request.source_lang.clone()));
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request() -> TranslationRequest {
        TranslationRequest::new("Hello", "en", "fr")
    }

    #[test]
    fn parses_translation_and_match() {
        let body = json!({
            "responseStatus": 200,
            "responseData": { "translatedText": " Bonjour ", "match": 0.85 }
        });

        let result = parse_response(&body, &request(), 0.7).unwrap();
        assert_eq!(result.text, "Bonjour");
        assert_eq!(result.confidence, Some(0.85));
        assert_eq!(result.source_provider, ProviderKind::MyMemory);
    }

    #[test]
    fn accepts_string_status() {
        let body = json!({
            "responseStatus": "200",
            "responseData": { "translatedText": "Bonjour" }
        });
        let result = parse_response(&body, &request(), 0.7).unwrap();
        assert_eq!(result.confidence, Some(0.7));
    }

    #[test]
    fn zero_match_uses_default_confidence() {
        let body = json!({
            "responseStatus": 200,
            "responseData": { "translatedText": "Bonjour", "match": 0 }
        });
        let result = parse_response(&body, &request(), 0.7).unwrap();
        assert_eq!(result.confidence, Some(0.7));
    }

    #[test]
    fn error_status_is_malformed() {
        let body = json!({
            "responseStatus": 403,
            "responseDetails": "INVALID LANGUAGE PAIR",
            "responseData": { "translatedText": "INVALID LANGUAGE PAIR" }
        });
        let err = parse_response(&body, &request(), 0.7).unwrap_err();
        assert!(matches!(err, ProviderError::Malformed { .. }));
        assert!(err.to_string().contains("INVALID LANGUAGE PAIR"));
    }

    #[test]
    fn missing_text_is_malformed() {
        let body = json!({ "responseStatus": 200, "responseData": {} });
        assert!(matches!(
            parse_response(&body, &request(), 0.7),
            Err(ProviderError::Malformed { .. })
        ));
    }
}
