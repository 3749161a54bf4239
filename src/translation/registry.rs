//! # Provider Registry
//!
//! Holds the ordered list of translation providers, the round-robin cursor
//! and per-provider usage statistics.
//!
//! ## Key Features:
//! - **Registry order**: the configured provider order, used to break score ties
//! - **Round-robin cursor**: rotates dispatch and log order between calls,
//!   never affects which translation wins
//! - **Usage statistics**: requests, failures, wins and latency per provider
//!
//! ## Thread Safety:
//! The cursor is an `AtomicUsize` advanced only through [`ProviderRegistry::advance`].
//! Statistics sit behind a `tokio::sync::RwLock`: many readers (status
//! endpoint) or one writer (a finished provider call).

use crate::translation::providers::Provider;
use crate::translation::types::ProviderKind;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Usage statistics for one provider.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProviderMetrics {
    /// Calls dispatched to this provider (fallback calls included)
    pub total_requests: u64,

    /// Calls that errored, timed out or came back empty
    pub failed_requests: u64,

    /// Aggregations this provider won
    pub wins: u64,

    /// Sum of call latencies (milliseconds)
    pub total_latency_ms: u64,
}

impl ProviderMetrics {
    pub fn success_rate(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            (self.total_requests - self.failed_requests) as f64 / self.total_requests as f64
        }
    }

    pub fn average_latency_ms(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.total_latency_ms as f64 / self.total_requests as f64
        }
    }

    /// Record one finished call.
    pub fn update(&mut self, latency_ms: u64, success: bool) {
        self.total_requests += 1;
        self.total_latency_ms += latency_ms;
        if !success {
            self.failed_requests += 1;
        }
    }
}

/// Ordered provider list with a round-robin cursor.
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn Provider>>,
    cursor: AtomicUsize,
    metrics: RwLock<HashMap<ProviderKind, ProviderMetrics>>,
}

impl ProviderRegistry {
    pub fn new(providers: Vec<Arc<dyn Provider>>) -> Self {
        Self {
            providers,
            cursor: AtomicUsize::new(0),
            metrics: RwLock::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Providers in registry order.
    pub fn providers(&self) -> &[Arc<dyn Provider>] {
        &self.providers
    }

    pub fn kinds(&self) -> Vec<ProviderKind> {
        self.providers.iter().map(|p| p.kind()).collect()
    }

    /// Current cursor position, always `< len()` (0 when empty).
    pub fn cursor(&self) -> usize {
        self.cursor.load(Ordering::SeqCst)
    }

    /// Provider the cursor points at; dispatched and logged first next call.
    pub fn current_provider(&self) -> Option<ProviderKind> {
        self.providers.get(self.cursor()).map(|p| p.kind())
    }

    /// Move the cursor one position forward, wrapping. Returns the new position.
    pub fn advance(&self) -> usize {
        let len = self.providers.len();
        if len == 0 {
            return 0;
        }
        let previous = self
            .cursor
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |c| Some((c + 1) % len))
            .unwrap_or_default();
        (previous + 1) % len
    }

    /// Registry indices starting at the cursor: `[c, c+1, .., 0, .., c-1]`.
    pub fn dispatch_order(&self) -> Vec<usize> {
        let len = self.providers.len();
        let start = self.cursor();
        (0..len).map(|offset| (start + offset) % len).collect()
    }

    pub async fn record_outcome(&self, kind: ProviderKind, latency_ms: u64, success: bool) {
        let mut metrics = self.metrics.write().await;
        metrics.entry(kind).or_default().update(latency_ms, success);
    }

    pub async fn record_win(&self, kind: ProviderKind) {
        let mut metrics = self.metrics.write().await;
        metrics.entry(kind).or_default().wins += 1;
    }

    pub async fn metrics_for(&self, kind: ProviderKind) -> ProviderMetrics {
        let metrics = self.metrics.read().await;
        metrics.get(&kind).cloned().unwrap_or_default()
    }

    /// Snapshot for the status endpoint, providers in registry order.
    pub async fn summary(&self) -> RegistrySummary {
        let metrics = self.metrics.read().await;
        let providers = self
            .providers
            .iter()
            .enumerate()
            .map(|(priority, provider)| {
                let kind = provider.kind();
                let stats = metrics.get(&kind).cloned().unwrap_or_default();
                ProviderStatus {
                    id: kind,
                    name: provider.name(),
                    priority,
                    success_rate: stats.success_rate(),
                    average_latency_ms: stats.average_latency_ms(),
                    metrics: stats,
                }
            })
            .collect();

        RegistrySummary {
            total_providers: self.providers.len(),
            cursor: self.cursor(),
            current_provider: self.current_provider(),
            providers,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProviderStatus {
    pub id: ProviderKind,
    pub name: &'static str,
    pub priority: usize,
    pub success_rate: f64,
    pub average_latency_ms: f64,
    pub metrics: ProviderMetrics,
}

/// Summary of the registry state.
#[derive(Debug, Serialize)]
pub struct RegistrySummary {
    pub total_providers: usize,
    pub cursor: usize,
    pub current_provider: Option<ProviderKind>,
    pub providers: Vec<ProviderStatus>,
}
