//! # Translation Core
//!
//! Everything needed to turn one piece of text into a single best-effort
//! translation using several free providers at once.
//!
//! ## Module Organization:
//! - **types**: requests, per-provider results and the aggregated answer
//! - **error**: provider and aggregation errors
//! - **languages**: supported language catalogue and script lookups
//! - **text**: pre- and post-processing passes
//! - **detect**: offline, heuristic language detection
//! - **scoring**: candidate scoring and winner selection
//! - **providers**: the `Provider` capability and its HTTP implementations
//! - **registry**: ordered provider list, round-robin cursor, usage metrics
//! - **aggregator**: settle-all fan-out, selection and fallback

pub mod aggregator;
pub mod detect;
pub mod error;
pub mod languages;
pub mod providers;
pub mod registry;
pub mod scoring;
pub mod text;
pub mod types;

pub use aggregator::{Aggregator, AggregatorOptions};
pub use detect::{detect_language, detect_language_scores, LanguageScore};
pub use error::{ProviderError, TranslationError};
pub use providers::{build_http_client, build_provider, Provider, ProviderConfidence, ProviderEndpoints};
pub use registry::{ProviderMetrics, ProviderRegistry, RegistrySummary};
pub use scoring::{select_best_translation, Candidate, ScoredTranslation, ScoringWeights};
pub use text::{postprocess, preprocess, PunctuationConvention};
pub use types::{AggregatedTranslation, ProviderKind, ProviderResult, TranslationRequest, AUTO_LANGUAGE};
