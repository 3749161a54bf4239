//! # Configuration Management
//!
//! Loads application configuration from several sources, in priority order:
//! 1. Environment variables (`APP_` prefix, `__` between nested keys)
//! 2. Configuration file (`config.toml`, optional)
//! 3. Default values (the `Default` impl below)
//!
//! ## Sections:
//! - **server**: bind address
//! - **translation**: provider list and order, fallback, timeouts, limits
//! - **scoring**: weights of the winner-selection heuristic
//! - **endpoints**: base URLs of the provider instances
//!
//! ## Environment Variable Examples:
//! - `APP_SERVER__PORT=3000`
//! - `APP_TRANSLATION__PROVIDERS=googlefree,lingva` (ordered, comma-separated)
//! - `APP_TRANSLATION__TIMEOUT_MS_PER_PROVIDER=5000`
//! - `APP_SCORING__PREMIUM_BONUS=0.15`
//! - `APP_TRANSLATION__PROVIDER_CONFIDENCE__LINGVA=0.75`
//! - `APP_ENDPOINTS__LINGVA=https://lingva.example`
//! - `HOST` / `PORT`: plain overrides for deployment platforms
//!
//! Nested keys use `__` because field names themselves contain `_`.

use crate::translation::languages;
use crate::translation::{AggregatorOptions, ProviderConfidence, ProviderEndpoints, ProviderKind, ScoringWeights};
use anyhow::Result;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::env;
use std::time::Duration;

/// Main application configuration.
///
/// ## Rust Concepts:
/// - **#[derive(Serialize, Deserialize)]**: the same struct is read from TOML
///   and environment variables, and written back as JSON by `GET /config`
/// - **Clone**: handlers take a copy so no lock is held during a request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub translation: TranslationConfig,
    pub scoring: ScoringWeights,
    pub endpoints: ProviderEndpoints,
}

/// Server-specific configuration settings.
///
/// ## Common values:
/// - `host = "127.0.0.1"`: localhost only (development)
/// - `host = "0.0.0.0"`: every interface (containers, production)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Translation aggregator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationConfig {
    /// Providers queried on every request, in registry order.
    /// Order breaks score ties: earlier wins.
    pub providers: Vec<ProviderKind>,

    /// Tried serially, only after every provider above failed
    pub fallback_provider: Option<ProviderKind>,

    pub timeout_ms_per_provider: u64,

    /// Characters, counted after trimming
    pub max_text_length: usize,

    /// Returned by language detection when no language is clear enough
    pub fallback_language: String,

    pub user_agent: String,

    /// Sent to MyMemory (`de=`), which raises its anonymous daily quota
    pub contact_email: Option<String>,

    /// Confidence each provider is credited with when its API reports none
    pub provider_confidence: ProviderConfidence,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            translation: TranslationConfig {
                providers: ProviderKind::ALL.to_vec(),
                fallback_provider: Some(ProviderKind::MyMemory),
                timeout_ms_per_provider: 9000,
                max_text_length: 5000,
                fallback_language: "en".to_string(),
                user_agent: format!("voice-translate-backend/{}", env!("CARGO_PKG_VERSION")),
                contact_email: None,
                provider_confidence: ProviderConfidence::default(),
            },
            scoring: ScoringWeights::default(),
            endpoints: ProviderEndpoints::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, `config.toml` and the environment.
    ///
    /// ## Rust Concepts:
    /// - **Builder pattern**: each `add_source` layers over the previous one
    /// - **?**: any source that fails to parse aborts startup with its error
    pub fn load() -> Result<Self> {
        let mut settings = config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?)
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("translation.providers")
                    .try_parsing(true),
            );

        if let Ok(host) = env::var("HOST") {
            settings = settings.set_override("server.host", host)?;
        }

        if let Ok(port) = env::var("PORT") {
            settings = settings.set_override("server.port", port)?;
        }

        let config = settings.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Validate that the configuration values make sense.
    ///
    /// ## What this checks:
    /// - server port is not 0
    /// - at least one provider or a fallback, and no provider listed twice
    /// - timeout and text length limit are positive
    /// - the fallback language is in the supported catalogue
    /// - every endpoint is an absolute URL
    /// - default provider confidences are within [0, 1]
    /// - scoring weights are finite and consistent
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(anyhow::anyhow!("Server port cannot be 0"));
        }

        let translation = &self.translation;
        if translation.providers.is_empty() && translation.fallback_provider.is_none() {
            return Err(anyhow::anyhow!("At least one provider or a fallback provider is required"));
        }

        let mut seen = HashSet::new();
        for kind in &translation.providers {
            if !seen.insert(kind) {
                return Err(anyhow::anyhow!("Provider '{}' is listed more than once", kind));
            }
        }

        if translation.timeout_ms_per_provider == 0 {
            return Err(anyhow::anyhow!("Provider timeout must be greater than 0"));
        }

        if translation.max_text_length == 0 {
            return Err(anyhow::anyhow!("Max text length must be greater than 0"));
        }

        if !languages::is_supported(&translation.fallback_language) {
            return Err(anyhow::anyhow!(
                "Fallback language '{}' is not supported",
                translation.fallback_language
            ));
        }

        if translation.user_agent.trim().is_empty() {
            return Err(anyhow::anyhow!("User agent cannot be empty"));
        }

        for kind in ProviderKind::ALL {
            let url = self.endpoints.base_url(kind);
            Url::parse(url).map_err(|e| anyhow::anyhow!("Invalid endpoint for {}: '{}' ({})", kind, url, e))?;
        }

        translation
            .provider_confidence
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid provider confidence: {}", e))?;

        self.scoring
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid scoring weights: {}", e))?;

        Ok(())
    }

    /// Apply a partial JSON update, e.g. `{"translation": {"timeout_ms_per_provider": 4000}}`.
    ///
    /// The patch is merged into the current values and the result is
    /// validated before anything is replaced, so a rejected update leaves
    /// `self` untouched.
    pub fn update_from_json(&mut self, json_str: &str) -> Result<()> {
        let patch: Value = serde_json::from_str(json_str)?;
        if !patch.is_object() {
            return Err(anyhow::anyhow!("Configuration update must be a JSON object"));
        }

        let mut merged = serde_json::to_value(&*self)?;
        merge_json(&mut merged, patch);

        let updated: AppConfig = serde_json::from_value(merged)?;
        updated.validate()?;

        *self = updated;
        Ok(())
    }

    /// Aggregator tuning derived from this configuration.
    pub fn aggregator_options(&self) -> AggregatorOptions {
        AggregatorOptions {
            timeout_per_provider: Duration::from_millis(self.translation.timeout_ms_per_provider),
            max_text_length: self.translation.max_text_length,
            fallback_language: self.translation.fallback_language.clone(),
            weights: self.scoring.clone(),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Recursive object merge; anything that is not an object replaces the target.
fn merge_json(target: &mut Value, patch: Value) {
    match (target, patch) {
        (Value::Object(target), Value::Object(patch)) => {
            for (key, value) in patch {
                match target.get_mut(&key) {
                    Some(existing) => merge_json(existing, value),
                    None => {
                        target.insert(key, value);
                    }
                }
            }
        }
        (target, patch) => *target = patch,
    }
}
