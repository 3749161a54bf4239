//! # Application State Management
//!
//! Shared state accessed by every HTTP request handler at the same time.
//!
//! ## Arc<RwLock<T>> Pattern
//! - **Arc**: every worker thread holds a reference to the same data
//! - **RwLock**: many readers or one writer at a time
//!
//! ## What lives here:
//! - the current configuration
//! - the current [`Aggregator`], rebuilt whenever the configuration changes
//! - request and translation counters for `/health` and `/metrics`
//!
//! The aggregator sits behind `RwLock<Arc<Aggregator>>`: a handler clones the
//! inner `Arc` and releases the lock straight away, so a configuration update
//! never waits for in-flight translations and those translations finish on
//! the aggregator they started with.

use crate::config::AppConfig;
use crate::translation::{build_http_client, build_provider, Aggregator, ProviderRegistry};
use anyhow::Result;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    /// Application configuration (can be updated at runtime)
    pub config: Arc<RwLock<AppConfig>>,

    /// Aggregator built from `config`
    pub aggregator: Arc<RwLock<Arc<Aggregator>>>,

    /// Request counters, updated by middleware and handlers
    pub metrics: Arc<RwLock<AppMetrics>>,

    /// When the server started
    pub start_time: Instant,
}

/// Counters collected across all HTTP requests.
#[derive(Debug, Default, Clone)]
pub struct AppMetrics {
    /// Total number of HTTP requests processed since server start
    pub request_count: u64,

    /// Requests that ended with a 4xx or 5xx status
    pub error_count: u64,

    /// Translations returned to callers
    pub translations_served: u64,

    /// Translations where every provider failed
    pub translation_failures: u64,

    /// Key: `"METHOD /path"`
    pub endpoint_metrics: HashMap<String, EndpointMetric>,
}

#[derive(Debug, Default, Clone)]
pub struct EndpointMetric {
    pub request_count: u64,

    /// Cumulative processing time (milliseconds)
    pub total_duration_ms: u64,

    pub error_count: u64,
}

/// Build an aggregator with real HTTP providers from `config`.
///
/// One `reqwest::Client` is shared by every provider so connections are pooled.
pub fn build_aggregator(config: &AppConfig) -> Result<Aggregator> {
    let translation = &config.translation;
    let client = build_http_client(&translation.user_agent)?;
    let contact_email = translation.contact_email.as_deref();
    let build = |kind| {
        build_provider(
            kind,
            &client,
            &config.endpoints,
            &translation.provider_confidence,
            contact_email,
        )
    };

    let providers = translation.providers.iter().map(|&kind| build(kind)).collect();
    let fallback = translation.fallback_provider.map(build);

    Ok(Aggregator::new(
        ProviderRegistry::new(providers),
        fallback,
        config.aggregator_options(),
    ))
}

// Poisoned locks are recovered: the guarded data stays valid after a panic.
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

impl AppState {
    /// Create the state and the aggregator described by `config`.
    pub fn new(config: AppConfig) -> Result<Self> {
        let aggregator = build_aggregator(&config)?;
        Ok(Self::with_aggregator(config, aggregator))
    }

    /// Create the state around an already built aggregator (tests use fakes).
    pub fn with_aggregator(config: AppConfig, aggregator: Aggregator) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            aggregator: Arc::new(RwLock::new(Arc::new(aggregator))),
            metrics: Arc::new(RwLock::new(AppMetrics::default())),
            start_time: Instant::now(),
        }
    }

    /// Copy of the current configuration.
    pub fn get_config(&self) -> AppConfig {
        read(&self.config).clone()
    }

    /// The aggregator to use for one request.
    pub fn aggregator(&self) -> Arc<Aggregator> {
        Arc::clone(&read(&self.aggregator))
    }

    /// Validate `new_config`, rebuild the aggregator from it, then swap both.
    ///
    /// Nothing changes when validation or the rebuild fails. Provider
    /// statistics and the round-robin cursor start over with the new aggregator.
    pub fn update_config(&self, new_config: AppConfig) -> Result<(), String> {
        let mut config = write(&self.config);
        self.install(&mut config, new_config)
    }

    /// Merge a partial JSON update into the current configuration and install it.
    ///
    /// The config write lock is held from the read to the swap, so concurrent
    /// updates apply one after the other. Returns the previous and the new
    /// configuration.
    pub fn apply_config_patch(&self, patch: &str) -> Result<(AppConfig, AppConfig), String> {
        let mut config = write(&self.config);
        let previous = config.clone();

        let mut updated = previous.clone();
        updated.update_from_json(patch).map_err(|e| e.to_string())?;
        self.install(&mut config, updated.clone())?;

        Ok((previous, updated))
    }

    fn install(&self, config: &mut AppConfig, new_config: AppConfig) -> Result<(), String> {
        new_config.validate().map_err(|e| e.to_string())?;
        let aggregator = build_aggregator(&new_config).map_err(|e| e.to_string())?;

        *write(&self.aggregator) = Arc::new(aggregator);
        *config = new_config;

        info!(
            providers = ?config.translation.providers,
            fallback = ?config.translation.fallback_provider,
            "Configuration updated, aggregator rebuilt"
        );
        Ok(())
    }

    pub fn increment_request_count(&self) {
        write(&self.metrics).request_count += 1;
    }

    pub fn increment_error_count(&self) {
        write(&self.metrics).error_count += 1;
    }

    /// Count one `/translate` outcome.
    pub fn record_translation(&self, success: bool) {
        let mut metrics = write(&self.metrics);
        if success {
            metrics.translations_served += 1;
        } else {
            metrics.translation_failures += 1;
        }
    }

    pub fn record_endpoint_request(&self, endpoint: &str, duration_ms: u64, is_error: bool) {
        let mut metrics = write(&self.metrics);
        let endpoint_metric = metrics.endpoint_metrics.entry(endpoint.to_string()).or_default();

        endpoint_metric.request_count += 1;
        endpoint_metric.total_duration_ms += duration_ms;
        if is_error {
            endpoint_metric.error_count += 1;
        }
    }

    /// Consistent copy of the counters; the lock is released before serialization.
    pub fn get_metrics_snapshot(&self) -> AppMetrics {
        read(&self.metrics).clone()
    }

    pub fn get_uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

impl AppMetrics {
    pub fn error_rate(&self) -> f64 {
        if self.request_count > 0 {
            self.error_count as f64 / self.request_count as f64
        } else {
            0.0
        }
    }
}

impl EndpointMetric {
    pub fn average_duration_ms(&self) -> f64 {
        if self.request_count > 0 {
            self.total_duration_ms as f64 / self.request_count as f64
        } else {
            0.0
        }
    }

    /// Fraction of failed requests, 0.0 to 1.0.
    pub fn error_rate(&self) -> f64 {
        if self.request_count > 0 {
            self.error_count as f64 / self.request_count as f64
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translation::ProviderKind;

    #[test]
    fn builds_aggregator_from_config() {
        let mut config = AppConfig::default();
        config.translation.providers = vec![ProviderKind::GoogleFree, ProviderKind::Lingva];

        let state = AppState::new(config).unwrap();
        let aggregator = state.aggregator();
        assert_eq!(
            aggregator.registry().kinds(),
            vec![ProviderKind::GoogleFree, ProviderKind::Lingva]
        );
        assert_eq!(aggregator.fallback_provider(), Some(ProviderKind::MyMemory));
    }

    #[test]
    fn config_update_swaps_aggregator() {
        let state = AppState::new(AppConfig::default()).unwrap();
        let before = state.aggregator();

        let mut updated = state.get_config();
        updated.translation.providers = vec![ProviderKind::LibreTranslate];
        updated.translation.fallback_provider = None;
        state.update_config(updated).unwrap();

        let after = state.aggregator();
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(after.registry().kinds(), vec![ProviderKind::LibreTranslate]);
        assert_eq!(after.fallback_provider(), None);
        // the old aggregator is still usable by requests that hold it
        assert_eq!(before.registry().len(), ProviderKind::ALL.len());
    }

    #[test]
    fn invalid_update_is_rejected() {
        let state = AppState::new(AppConfig::default()).unwrap();
        let before = state.aggregator();

        let mut bad = state.get_config();
        bad.translation.timeout_ms_per_provider = 0;
        assert!(state.update_config(bad).is_err());

        assert!(Arc::ptr_eq(&before, &state.aggregator()));
        assert_eq!(state.get_config(), AppConfig::default());
    }

    #[test]
    fn concurrent_patches_are_all_applied() {
        let state = AppState::new(AppConfig::default()).unwrap();

        std::thread::scope(|scope| {
            for patch in [
                r#"{"translation": {"timeout_ms_per_provider": 4000}}"#,
                r#"{"translation": {"max_text_length": 1200}}"#,
                r#"{"scoring": {"premium_bonus": 0.15}}"#,
            ] {
                let state = &state;
                scope.spawn(move || state.apply_config_patch(patch).unwrap());
            }
        });

        let config = state.get_config();
        assert_eq!(config.translation.timeout_ms_per_provider, 4000);
        assert_eq!(config.translation.max_text_length, 1200);
        assert_eq!(config.scoring.premium_bonus, 0.15);
        assert_eq!(
            state.aggregator().options().timeout_per_provider,
            std::time::Duration::from_millis(4000)
        );
    }

    #[test]
    fn rejected_patch_changes_nothing() {
        let state = AppState::new(AppConfig::default()).unwrap();
        let before = state.aggregator();

        let err = state
            .apply_config_patch(r#"{"translation": {"provider_confidence": {"lingva": 2.0}}}"#)
            .unwrap_err();
        assert!(err.contains("lingva"));
        assert!(Arc::ptr_eq(&before, &state.aggregator()));
        assert_eq!(state.get_config(), AppConfig::default());
    }

    #[test]
    fn endpoint_metrics_accumulate() {
        let state = AppState::new(AppConfig::default()).unwrap();
        state.increment_request_count();
        state.increment_request_count();
        state.increment_error_count();
        state.record_endpoint_request("POST /api/v1/translate", 100, false);
        state.record_endpoint_request("POST /api/v1/translate", 300, true);
        state.record_translation(true);
        state.record_translation(false);

        let snapshot = state.get_metrics_snapshot();
        assert_eq!(snapshot.request_count, 2);
        assert!((snapshot.error_rate() - 0.5).abs() < 1e-9);
        assert_eq!(snapshot.translations_served, 1);
        assert_eq!(snapshot.translation_failures, 1);

        let metric = &snapshot.endpoint_metrics["POST /api/v1/translate"];
        assert!((metric.average_duration_ms() - 200.0).abs() < 1e-9);
        assert!((metric.error_rate() - 0.5).abs() < 1e-9);
    }
}
