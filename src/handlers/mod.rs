//! # HTTP Handlers
//!
//! ## Available Endpoints (under `/api/v1`):
//! - `POST /translate`, `POST /detect`, `GET /languages` (translate.rs)
//! - `GET /providers` (providers.rs)
//! - `GET /config`, `PUT /config` (config.rs)
//! - `GET /health`, `GET /metrics` (crate::health)

pub mod config;
pub mod providers;
pub mod translate;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::*;
pub use providers::*;
pub use translate::*;

use crate::error::AppError;
use crate::health;
use actix_web::{web, HttpRequest};

/// Route table shared by the server and the handler tests.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/translate", web::post().to(translate::translate))
            .route("/detect", web::post().to(translate::detect))
            .route("/languages", web::get().to(translate::list_languages))
            .route("/providers", web::get().to(providers::list_providers))
            .route("/config", web::get().to(config::get_config))
            .route("/config", web::put().to(config::update_config))
            .route("/health", web::get().to(health::health_check))
            .route("/metrics", web::get().to(health::detailed_metrics)),
    )
    .route("/health", web::get().to(health::health_check))
    .default_service(web::to(not_found));
}

/// Malformed JSON bodies get the same error shape as every other failure.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

async fn not_found(req: HttpRequest) -> Result<actix_web::HttpResponse, AppError> {
    Err(AppError::NotFound(format!("{} {}", req.method(), req.path())))
}
