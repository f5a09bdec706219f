//! Provider error types.
//!
//! These error types represent failures when talking to an external model.
//! Defined in `mockview-core` so the evaluator and question generators can
//! downcast and log a precise cause before falling back to local logic.
//! Providers report through `anyhow`, so `warn_fallback` digs the typed
//! cause back out of the chain.

use thiserror::Error;

/// Errors that can occur when interacting with an LLM provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The API returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Authentication failed (invalid API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The requested model was not found.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The provider answered, but not in the shape we asked for.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl ProviderError {
    /// Returns `true` if this error is permanent and retrying is pointless.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            ProviderError::AuthenticationFailed(_)
                | ProviderError::ModelNotFound(_)
                | ProviderError::MalformedResponse(_)
        )
    }

    /// Returns the retry-after delay in milliseconds, if applicable.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            ProviderError::RateLimited { retry_after_ms } => Some(*retry_after_ms),
            _ => None,
        }
    }
}

/// The [`ProviderError`] behind `err`, if there is one.
pub fn provider_cause(err: &anyhow::Error) -> Option<&ProviderError> {
    err.chain().find_map(|e| e.downcast_ref::<ProviderError>())
}

/// Log a failed model call that local logic is about to replace.
pub(crate) fn warn_fallback(provider: &str, fallback: &str, err: &anyhow::Error) {
    match provider_cause(err) {
        Some(cause) => tracing::warn!(
            provider,
            permanent = cause.is_permanent(),
            retry_after_ms = ?cause.retry_after_ms(),
            "model call failed, {fallback}: {err:#}"
        ),
        None => tracing::warn!(provider, "model call failed, {fallback}: {err:#}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn cause_survives_context() {
        let err = Err::<(), _>(ProviderError::RateLimited { retry_after_ms: 800 })
            .context("model returned unusable scoring JSON")
            .unwrap_err();
        let cause = provider_cause(&err).unwrap();
        assert_eq!(cause.retry_after_ms(), Some(800));
        assert!(!cause.is_permanent());

        assert!(provider_cause(&anyhow::anyhow!("plain failure")).is_none());
    }

    #[test]
    fn permanent_errors() {
        assert!(ProviderError::AuthenticationFailed("bad key".into()).is_permanent());
        assert!(ProviderError::ModelNotFound("gpt-9".into()).is_permanent());
        assert!(ProviderError::MalformedResponse("no json".into()).is_permanent());
        assert!(!ProviderError::Timeout(20).is_permanent());
        assert!(!ProviderError::RateLimited { retry_after_ms: 5 }.is_permanent());
    }

    #[test]
    fn retry_after_only_for_rate_limits() {
        assert_eq!(
            ProviderError::RateLimited {
                retry_after_ms: 1500
            }
            .retry_after_ms(),
            Some(1500)
        );
        assert_eq!(
            ProviderError::NetworkError("reset".into()).retry_after_ms(),
            None
        );
    }

    #[test]
    fn display_messages() {
        let err = ProviderError::ApiError {
            status: 503,
            message: "overloaded".into(),
        };
        assert_eq!(err.to_string(), "API error (HTTP 503): overloaded");
    }
}
