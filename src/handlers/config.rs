//! Runtime configuration endpoints.

use crate::{error::AppError, state::AppState};
use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::info;

/// `GET /api/v1/config`: the effective configuration.
pub async fn get_config(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let config = state.get_config();

    Ok(HttpResponse::Ok().json(json!({
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "config": config
    })))
}

/// Partial configuration update.
///
/// ## Endpoint: `PUT /api/v1/config`
///
/// ## Request (any subset of the configuration):
/// ```json
/// { "translation": { "providers": ["googlefree", "lingva"], "timeout_ms_per_provider": 4000 } }
/// ```
///
/// The merged configuration is validated and the aggregator rebuilt before
/// anything is replaced. Server host and port only take effect after a restart.
pub async fn update_config(
    state: web::Data<AppState>,
    body: web::Json<serde_json::Value>,
) -> Result<HttpResponse, AppError> {
    let json_str = serde_json::to_string(&body.into_inner())?;

    let (previous, updated) = state
        .apply_config_patch(&json_str)
        .map_err(AppError::ValidationError)?;

    let restart_required = previous.server != updated.server;
    info!(restart_required, "Configuration updated through the API");

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "message": "Configuration updated successfully",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "restart_required": restart_required,
        "updated_config": updated
    })))
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_support::state_with;
    use crate::handlers::{configure_routes, json_config};
    use crate::translation::ProviderKind;
    use actix_web::{http::StatusCode, test, web, App};
    use serde_json::{json, Value};

    #[actix_web::test]
    async fn get_returns_effective_config() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(Vec::new())))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/v1/config").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["config"]["translation"]["timeout_ms_per_provider"], 9000);
        assert_eq!(body["config"]["scoring"]["premium_provider"], "googlefree");
    }

    #[actix_web::test]
    async fn put_updates_config_and_rebuilds_aggregator() {
        let state = state_with(Vec::new());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .app_data(json_config())
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::put()
            .uri("/api/v1/config")
            .set_json(json!({ "translation": { "providers": ["googlefree", "lingva"] } }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["status"], "success");
        assert_eq!(body["restart_required"], false);
        assert_eq!(
            state.aggregator().registry().kinds(),
            vec![ProviderKind::GoogleFree, ProviderKind::Lingva]
        );
    }

    #[actix_web::test]
    async fn put_rejects_invalid_config() {
        let state = state_with(Vec::new());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .app_data(json_config())
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::put()
            .uri("/api/v1/config")
            .set_json(json!({ "server": { "port": 0 } }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(state.get_config().server.port, 8080);
    }
}
