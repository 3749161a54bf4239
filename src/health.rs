//! Health and metrics endpoints.

use crate::config::AppConfig;
use crate::state::{AppMetrics, AppState};
use actix_web::{web, HttpResponse};
use serde_json::json;

pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let metrics = state.get_metrics_snapshot();
    let config = state.get_config();
    let uptime_seconds = state.get_uptime_seconds();

    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime_seconds": uptime_seconds,
        "service": {
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "host": config.server.host,
            "port": config.server.port
        },
        "metrics": {
            "total_requests": metrics.request_count,
            "total_errors": metrics.error_count,
            "error_rate": metrics.error_rate(),
            "translations_served": metrics.translations_served,
            "translation_failures": metrics.translation_failures
        },
        "memory": get_memory_info(),
        "translation": {
            "providers": config.translation.providers,
            "fallback_provider": config.translation.fallback_provider,
            "timeout_ms_per_provider": config.translation.timeout_ms_per_provider,
            "max_text_length": config.translation.max_text_length
        },
        "system": get_system_status(&config, &metrics)
    }))
}

pub async fn detailed_metrics(state: web::Data<AppState>) -> HttpResponse {
    let metrics = state.get_metrics_snapshot();
    let uptime_seconds = state.get_uptime_seconds();
    let providers = state.aggregator().registry().summary().await;

    let mut endpoint_stats: Vec<_> = metrics
        .endpoint_metrics
        .iter()
        .map(|(endpoint, metric)| {
            json!({
                "endpoint": endpoint,
                "request_count": metric.request_count,
                "error_count": metric.error_count,
                "error_rate": metric.error_rate(),
                "average_duration_ms": metric.average_duration_ms(),
                "total_duration_ms": metric.total_duration_ms
            })
        })
        .collect();
    endpoint_stats.sort_by(|a, b| a["endpoint"].as_str().cmp(&b["endpoint"].as_str()));

    HttpResponse::Ok().json(json!({
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime_seconds": uptime_seconds,
        "overall": {
            "total_requests": metrics.request_count,
            "total_errors": metrics.error_count,
            "error_rate": metrics.error_rate(),
            "requests_per_second": if uptime_seconds > 0 {
                metrics.request_count as f64 / uptime_seconds as f64
            } else {
                0.0
            }
        },
        "translations": {
            "served": metrics.translations_served,
            "failed": metrics.translation_failures
        },
        "endpoints": endpoint_stats,
        "providers": providers.providers,
        "memory": get_memory_info()
    }))
}

fn get_memory_info() -> serde_json::Value {
    #[cfg(target_os = "linux")]
    {
        let pid = std::process::id();
        if let Ok(status) = std::fs::read_to_string(format!("/proc/{}/status", pid)) {
            let mut vm_rss = 0;
            let mut vm_size = 0;

            for line in status.lines() {
                let kb = || {
                    line.split_whitespace()
                        .nth(1)
                        .and_then(|kb| kb.parse::<u64>().ok())
                        .unwrap_or(0)
                };
                if line.starts_with("VmRSS:") {
                    vm_rss = kb() * 1024;
                } else if line.starts_with("VmSize:") {
                    vm_size = kb() * 1024;
                }
            }

            return json!({
                "resident_memory_bytes": vm_rss,
                "virtual_memory_bytes": vm_size,
                "available": true
            });
        }
    }

    json!({
        "resident_memory_bytes": 0,
        "virtual_memory_bytes": 0,
        "available": false,
        "note": "Memory info not available on this platform"
    })
}

/// Load status derived from how often translations fail outright.
fn get_system_status(config: &AppConfig, metrics: &AppMetrics) -> serde_json::Value {
    let attempts = metrics.translations_served + metrics.translation_failures;
    let failure_ratio = if attempts > 0 {
        metrics.translation_failures as f64 / attempts as f64
    } else {
        0.0
    };

    let status = if failure_ratio > 0.5 {
        "degraded"
    } else if failure_ratio > 0.1 {
        "unstable"
    } else {
        "normal"
    };

    let mut warnings = Vec::new();
    if failure_ratio > 0.1 {
        warnings.push("Providers are failing often - check connectivity or endpoints");
    }
    if config.translation.providers.len() < 2 {
        warnings.push("Fewer than two providers configured - no cross-checking between answers");
    }
    if config.translation.fallback_provider.is_none() {
        warnings.push("No fallback provider configured");
    }

    json!({
        "status": status,
        "translation_failure_percent": (failure_ratio * 100.0).round(),
        "configured_providers": config.translation.providers.len(),
        "warnings": warnings
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translation::ProviderKind;

    #[test]
    fn system_status_reflects_failure_ratio() {
        let config = AppConfig::default();
        let mut metrics = AppMetrics::default();
        assert_eq!(get_system_status(&config, &metrics)["status"], "normal");

        metrics.translations_served = 4;
        metrics.translation_failures = 6;
        let status = get_system_status(&config, &metrics);
        assert_eq!(status["status"], "degraded");
        assert_eq!(status["translation_failure_percent"], 60.0);
    }

    #[test]
    fn system_status_warns_about_thin_setups() {
        let mut config = AppConfig::default();
        config.translation.providers = vec![ProviderKind::Lingva];
        config.translation.fallback_provider = None;

        let status = get_system_status(&config, &AppMetrics::default());
        assert_eq!(status["warnings"].as_array().unwrap().len(), 2);
    }
}
