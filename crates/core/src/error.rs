//! Error types for the price gateway
//!
//! The taxonomy is deliberately small. Provider failures are recovered at the
//! point of use and only ever degrade that provider's contribution to a pass;
//! `NotFound` is the single user-visible failure the aggregation core can
//! produce. Everything else is an internal fault that the HTTP boundary maps
//! to a distinct status code.

/// Common error type for all price gateway crates
#[derive(Debug, thiserror::Error)]
pub enum PriceGatewayError {
    /// A named upstream provider failed to answer (network, timeout, bad
    /// payload). Never propagated out of a list/detail pass.
    #[error("provider {provider} failed: {message}")]
    Provider { provider: String, message: String },

    /// No aggregated item matches the requested title.
    #[error("movie '{0}' not found in any provider")]
    NotFound(String),

    #[error("configuration error: {message}")]
    Configuration {
        message: String,
        key: Option<String>,
    },

    #[error("internal error: {0}")]
    Internal(String),
}

impl PriceGatewayError {
    /// Build a provider-scoped error from any displayable cause
    pub fn provider(provider: impl Into<String>, message: impl ToString) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.to_string(),
        }
    }

    /// Build a configuration error tied to an environment key
    pub fn config(message: impl Into<String>, key: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            key: Some(key.into()),
        }
    }

    /// Whether a retry of the failed operation could plausibly succeed.
    ///
    /// Only provider-scoped failures are transient; configuration and
    /// internal errors are deterministic and retrying them is wasted work.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Provider { .. })
    }
}
