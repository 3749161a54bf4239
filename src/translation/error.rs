//! # Translation Errors
//!
//! Error taxonomy of the translation core.
//!
//! ## Propagation:
//! - **ProviderError**: one provider failed; logged and recorded, never
//!   aborts sibling providers
//! - **TranslationError::InvalidInput**: the caller must fix the text; never retried
//! - **TranslationError::AllProvidersFailed**: nothing usable came back, not
//!   even from the fallback; carries every underlying provider error

use crate::translation::types::ProviderKind;
use thiserror::Error;

/// Failure of a single provider call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// Provider answered with a non-2xx HTTP status
    #[error("{provider}: HTTP status {status}")]
    Status { provider: ProviderKind, status: u16 },

    /// Provider did not answer within its time budget
    #[error("{provider}: timed out after {timeout_ms} ms")]
    Timeout { provider: ProviderKind, timeout_ms: u64 },

    /// Connection, TLS or other transport problem
    #[error("{provider}: transport error: {message}")]
    Transport { provider: ProviderKind, message: String },

    /// Body could not be decoded or lacks the translated text
    #[error("{provider}: malformed response: {message}")]
    Malformed { provider: ProviderKind, message: String },

    /// Provider answered but the translation was blank
    #[error("{provider}: empty translation")]
    EmptyTranslation { provider: ProviderKind },
}

impl ProviderError {
    pub(crate) fn transport(provider: ProviderKind, err: reqwest::Error) -> Self {
        ProviderError::Transport {
            provider,
            message: err.to_string(),
        }
    }

    pub(crate) fn malformed(provider: ProviderKind, message: impl Into<String>) -> Self {
        ProviderError::Malformed {
            provider,
            message: message.into(),
        }
    }
}

/// Errors surfaced by the translation aggregator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranslationError {
    /// Empty text or text above the configured maximum length
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Every provider, including the fallback, failed
    #[error("all translation providers failed ({} errors)", errors.len())]
    AllProvidersFailed { errors: Vec<ProviderError> },
}

impl TranslationError {
    /// Human-readable messages of the underlying provider errors.
    pub fn provider_messages(&self) -> Vec<String> {
        match self {
            TranslationError::AllProvidersFailed { errors } => {
                errors.iter().map(|e| e.to_string()).collect()
            }
            TranslationError::InvalidInput(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_providers_failed_lists_every_message() {
        let err = TranslationError::AllProvidersFailed {
            errors: vec![
                ProviderError::Status { provider: ProviderKind::Lingva, status: 503 },
                ProviderError::Timeout { provider: ProviderKind::GoogleFree, timeout_ms: 9000 },
            ],
        };

        assert_eq!(err.to_string(), "all translation providers failed (2 errors)");
        assert_eq!(
            err.provider_messages(),
            vec![
                "lingva: HTTP status 503".to_string(),
                "googlefree: timed out after 9000 ms".to_string(),
            ]
        );
    }

    #[test]
    fn invalid_input_has_no_provider_messages() {
        let err = TranslationError::InvalidInput("text is empty".into());
        assert!(err.provider_messages().is_empty());
    }
}
