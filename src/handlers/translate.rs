//! # Translation Handlers
//!
//! - `POST /api/v1/translate`: aggregated translation
//! - `POST /api/v1/detect`: offline language detection
//! - `GET /api/v1/languages`: supported language catalogue

use crate::middleware::RequestId;
use crate::translation::languages::{self, SUPPORTED_LANGUAGES};
use crate::translation::{detect_language_scores, TranslationError, AUTO_LANGUAGE};
use crate::{error::AppError, state::AppState};
use actix_web::{web, HttpMessage, HttpRequest, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use std::time::Instant;
use tracing::{info, warn};

/// Request body of `POST /translate`.
#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    pub text: String,

    /// Language code or `"auto"` (the default)
    #[serde(default = "auto_source")]
    pub source_lang: String,

    pub target_lang: String,
}

fn auto_source() -> String {
    AUTO_LANGUAGE.to_string()
}

#[derive(Debug, Deserialize)]
pub struct DetectRequest {
    pub text: String,
}

fn request_id(req: &HttpRequest) -> String {
    req.extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_default()
}

/// Translate text through every configured provider and return the best answer.
///
/// ## Endpoint: `POST /api/v1/translate`
///
/// ## Request:
/// ```json
/// { "text": "Hello, how are you?", "source_lang": "en", "target_lang": "ar" }
/// ```
///
/// ## Response:
/// ```json
/// {
///   "text": "مرحبا، كيف حالك؟",
///   "provider": "googlefree",
///   "confidence": 1.3,
///   "source_lang": "en",
///   "target_lang": "ar",
///   "detected_source_lang": "en"
/// }
/// ```
///
/// ## Errors:
/// - 400 `validation_error`: empty text, text too long, missing target language
/// - 502 `upstream_failure`: every provider failed, `details` lists each failure
pub async fn translate(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<TranslateRequest>,
) -> Result<HttpResponse, AppError> {
    let request_id = request_id(&req);
    let body = body.into_inner();
    let aggregator = state.aggregator();
    let started = Instant::now();

    match aggregator
        .translate(&body.text, &body.source_lang, &body.target_lang)
        .await
    {
        Ok(translation) => {
            state.record_translation(true);
            info!(
                request_id = %request_id,
                provider = %translation.provider,
                confidence = translation.confidence,
                duration_ms = started.elapsed().as_millis() as u64,
                "Translation served"
            );
            Ok(HttpResponse::Ok().json(translation))
        }
        Err(err) => {
            if let TranslationError::AllProvidersFailed { errors } = &err {
                state.record_translation(false);
                warn!(
                    request_id = %request_id,
                    failures = errors.len(),
                    duration_ms = started.elapsed().as_millis() as u64,
                    "Translation failed on every provider"
                );
            }
            Err(err.into())
        }
    }
}

/// Detect the language of a text without calling any provider.
///
/// ## Endpoint: `POST /api/v1/detect`
///
/// ## Response:
/// ```json
/// {
///   "language": "ar",
///   "name": "العربية",
///   "scores": [{ "language": "ar", "score": 105.0 }]
/// }
/// ```
/// `scores` only lists candidates with a positive score, best first. When no
/// candidate is convincing, `language` is the configured fallback language.
pub async fn detect(
    state: web::Data<AppState>,
    body: web::Json<DetectRequest>,
) -> Result<HttpResponse, AppError> {
    let aggregator = state.aggregator();
    let language = aggregator.detect_language(&body.text);

    let mut scores: Vec<_> = detect_language_scores(&body.text)
        .into_iter()
        .filter(|s| s.score > 0.0)
        .collect();
    scores.sort_by(|a, b| b.score.total_cmp(&a.score));

    Ok(HttpResponse::Ok().json(json!({
        "name": languages::find(&language).map(|l| l.native_name),
        "language": language,
        "scores": scores
    })))
}

/// `GET /api/v1/languages`
///
/// `auto` is listed apart: it is only valid as a source language.
pub async fn list_languages() -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(json!({
        "count": SUPPORTED_LANGUAGES.len(),
        "languages": SUPPORTED_LANGUAGES,
        "auto": { "code": AUTO_LANGUAGE, "native_name": "Auto-detect", "source_only": true }
    })))
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_support::{state_with, StaticProvider};
    use crate::handlers::{configure_routes, json_config};
    use crate::middleware::RequestLogging;
    use crate::translation::ProviderKind;
    use actix_web::{http::StatusCode, test, web, App};
    use serde_json::{json, Value};

    macro_rules! app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state))
                    .app_data(json_config())
                    .wrap(RequestLogging)
                    .configure(configure_routes),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn translate_returns_best_candidate() {
        let state = state_with(vec![
            StaticProvider::ok(ProviderKind::Lingva, "Hello", Some(0.9)),
            StaticProvider::ok(ProviderKind::LibreTranslate, "Bonjour", Some(0.4)),
        ]);
        let app = app!(state.clone());

        let req = test::TestRequest::post()
            .uri("/api/v1/translate")
            .set_json(json!({ "text": "Bonjour", "source_lang": "fr", "target_lang": "en" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["text"], "Hello");
        assert_eq!(body["provider"], "lingva");
        assert!((body["confidence"].as_f64().unwrap() - 1.1).abs() < 1e-9);
        assert_eq!(state.get_metrics_snapshot().translations_served, 1);
    }

    #[actix_web::test]
    async fn source_language_defaults_to_auto() {
        let app = app!(state_with(vec![StaticProvider::ok(ProviderKind::Lingva, "hola", None)]));

        let req = test::TestRequest::post()
            .uri("/api/v1/translate")
            .set_json(json!({ "text": "hello", "target_lang": "es" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["source_lang"], "auto");
        assert_eq!(body["text"], "Hola");
    }

    #[actix_web::test]
    async fn empty_text_is_a_validation_error() {
        let app = app!(state_with(vec![StaticProvider::ok(ProviderKind::Lingva, "x", None)]));

        let req = test::TestRequest::post()
            .uri("/api/v1/translate")
            .set_json(json!({ "text": "   ", "target_lang": "fr" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["type"], "validation_error");
    }

    #[actix_web::test]
    async fn total_failure_is_bad_gateway_with_details() {
        let state = state_with(vec![
            StaticProvider::failing(ProviderKind::Lingva, 503),
            StaticProvider::failing(ProviderKind::GoogleFree, 429),
        ]);
        let app = app!(state.clone());

        let req = test::TestRequest::post()
            .uri("/api/v1/translate")
            .set_json(json!({ "text": "hello", "source_lang": "en", "target_lang": "fr" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["type"], "upstream_failure");
        assert_eq!(
            body["error"]["details"],
            json!(["lingva: HTTP status 503", "googlefree: HTTP status 429"])
        );
        assert_eq!(state.get_metrics_snapshot().translation_failures, 1);
    }

    #[actix_web::test]
    async fn malformed_body_uses_error_shape() {
        let app = app!(state_with(Vec::new()));

        let req = test::TestRequest::post()
            .uri("/api/v1/translate")
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"text\": ")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["type"], "bad_request");
    }

    #[actix_web::test]
    async fn detect_reports_language_and_scores() {
        let app = app!(state_with(Vec::new()));

        let req = test::TestRequest::post()
            .uri("/api/v1/detect")
            .set_json(json!({ "text": "مرحبا بالعالم" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["language"], "ar");
        assert_eq!(body["name"], "العربية");
        assert_eq!(body["scores"][0]["language"], "ar");

        let req = test::TestRequest::post()
            .uri("/api/v1/detect")
            .set_json(json!({ "text": "" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["language"], "en");
        assert_eq!(body["scores"], json!([]));
    }

    #[actix_web::test]
    async fn languages_lists_catalogue() {
        let app = app!(state_with(Vec::new()));

        let req = test::TestRequest::get().uri("/api/v1/languages").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        let languages = body["languages"].as_array().unwrap();
        assert_eq!(body["count"].as_u64().unwrap() as usize, languages.len());
        assert!(languages.iter().any(|l| l["code"] == "ar" && l["script"] == "arabic"));
    }

    #[actix_web::test]
    async fn unknown_route_is_not_found_json() {
        let app = app!(state_with(Vec::new()));

        let req = test::TestRequest::get().uri("/api/v1/nope").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["type"], "not_found");
    }
}
