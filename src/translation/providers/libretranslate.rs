//! LibreTranslate (`POST /translate` with a JSON body).

use super::{non_empty_result, send_json, Provider};
use crate::translation::error::ProviderError;
use crate::translation::types::{ProviderKind, ProviderResult, TranslationRequest};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

pub struct LibreTranslateProvider {
    client: reqwest::Client,
    base_url: String,
    default_confidence: f64,
}

#[derive(Debug, Serialize)]
struct LibreTranslateBody<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'static str,
}

impl LibreTranslateProvider {
    pub fn new(client: reqwest::Client, base_url: String, default_confidence: f64) -> Self {
        Self {
            client,
            base_url,
            default_confidence,
        }
    }
}

#[async_trait]
impl Provider for LibreTranslateProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::LibreTranslate
    }

    async fn translate(&self, request: &TranslationRequest) -> Result<ProviderResult, ProviderError> {
        let body = LibreTranslateBody {
            q: &request.text,
            source: &request.source_lang,
            target: &request.target_lang,
            format: "text",
        };

        let http = self
            .client
            .post(format!("{}/translate", self.base_url))
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&body);

        let response = send_json(self.kind(), http).await?;
        parse_response(&response, self.default_confidence)
    }
}

fn parse_response(body: &Value, default_confidence: f64) -> Result<ProviderResult, ProviderError> {
    let provider = ProviderKind::LibreTranslate;
    let text = body
        .get("translatedText")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            let reason = body.get("error").and_then(Value::as_str).unwrap_or("no translation found");
            ProviderError::malformed(provider, reason)
        })?;

    // newer servers send {"language", "confidence"}, older ones a bare code
    let detected = body.get("detectedLanguage").and_then(|d| match d {
        Value::String(code) => Some(code.clone()),
        Value::Object(obj) => obj.get("language").and_then(Value::as_str).map(str::to_string),
        _ => None,
    });

    Ok(non_empty_result(provider, text)?
        .with_confidence(default_confidence)
        .with_detected_source(detected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_object_detected_language() {
        let body = json!({
            "translatedText": "Ciao",
            "detectedLanguage": { "language": "en", "confidence": 92 }
        });
        let result = parse_response(&body, 0.85).unwrap();
        assert_eq!(result.text, "Ciao");
        assert_eq!(result.detected_source_lang.as_deref(), Some("en"));
        // detection confidence is not a translation confidence
        assert_eq!(result.confidence, Some(0.85));
    }

    #[test]
    fn parses_string_detected_language() {
        let body = json!({ "translatedText": "Ciao", "detectedLanguage": "en" });
        assert_eq!(parse_response(&body, 0.85).unwrap().detected_source_lang.as_deref(), Some("en"));
    }

    #[test]
    fn error_body_carries_server_reason() {
        let body = json!({ "error": "Visit https://portal.libretranslate.com to get an API key" });
        let err = parse_response(&body, 0.85).unwrap_err();
        assert!(err.to_string().contains("API key"));
    }

    #[test]
    fn serializes_request_body() {
        let body = LibreTranslateBody { q: "hi", source: "auto", target: "de", format: "text" };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({ "q": "hi", "source": "auto", "target": "de", "format": "text" })
        );
    }
}
