//! Provider registry status.

use crate::translation::ProviderKind;
use crate::{error::AppError, state::AppState};
use actix_web::{web, HttpResponse};
use serde_json::json;

/// Registry order, round-robin cursor and per-provider statistics.
///
/// ## Endpoint: `GET /api/v1/providers`
///
/// ## Response:
/// ```json
/// {
///   "registry": {
///     "total_providers": 4,
///     "cursor": 1,
///     "current_provider": "lingva",
///     "providers": [{ "id": "mymemory", "name": "MyMemory", "priority": 0, ... }]
///   },
///   "fallback_provider": "mymemory",
///   "available": [{ "id": "mymemory", "name": "MyMemory" }, ...]
/// }
/// ```
pub async fn list_providers(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let aggregator = state.aggregator();
    let summary = aggregator.registry().summary().await;

    let available: Vec<_> = ProviderKind::ALL
        .iter()
        .map(|kind| json!({ "id": kind, "name": kind.display_name() }))
        .collect();

    Ok(HttpResponse::Ok().json(json!({
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "registry": summary,
        "fallback_provider": aggregator.fallback_provider(),
        "available": available
    })))
}

#[cfg(test)]
mod tests {
    use crate::handlers::configure_routes;
    use crate::handlers::test_support::{state_with, StaticProvider};
    use crate::translation::ProviderKind;
    use actix_web::{test, web, App};
    use serde_json::Value;

    #[actix_web::test]
    async fn reports_registry_order_cursor_and_wins() {
        let state = state_with(vec![
            StaticProvider::failing(ProviderKind::MyMemory, 500),
            StaticProvider::ok(ProviderKind::Lingva, "Hallo", Some(0.8)),
        ]);
        state.aggregator().translate("Hello", "en", "de").await.unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/v1/providers").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        let registry = &body["registry"];
        assert_eq!(registry["total_providers"], 2);
        assert_eq!(registry["cursor"], 1);
        assert_eq!(registry["current_provider"], "lingva");
        assert_eq!(registry["providers"][0]["id"], "mymemory");
        assert_eq!(registry["providers"][0]["metrics"]["failed_requests"], 1);
        assert_eq!(registry["providers"][1]["metrics"]["wins"], 1);
        assert_eq!(body["fallback_provider"], Value::Null);
        assert_eq!(body["available"].as_array().unwrap().len(), 4);
    }
}
