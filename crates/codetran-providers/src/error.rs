//! Provider-related error types.

use codetran_errors::Classifiable;
use thiserror::Error;

/// Errors that can occur during provider operations.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// API key not configured for a provider that requires one.
    #[error("API key not configured for {provider}")]
    ApiKeyNotConfigured {
        /// Provider name.
        provider: String,
    },

    /// API request failed.
    #[error("API request failed: {0}")]
    ApiRequestFailed(String),

    /// Rate limit exceeded.
    #[error("rate limit exceeded, retry after {retry_after_secs} seconds")]
    RateLimitExceeded {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// Invalid response from the provider's API.
    #[error("invalid API response: {0}")]
    InvalidResponse(String),

    /// The requested provider name is not registered.
    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    /// Every provider in a chain failed; carries each provider's failure.
    #[error("all providers failed: {0:?}")]
    AllProvidersFailed(Vec<(String, String)>),

    /// No healthy provider is available to service a request.
    #[error("no healthy provider available")]
    NoHealthyProvider,

    /// The circuit breaker or rate limiter rejected the call.
    #[error("resilience layer rejected call: {0}")]
    Resilience(#[from] codetran_resilience::ResilienceError),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

impl Classifiable for ProviderError {
    fn kind_name(&self) -> &'static str {
        match self {
            Self::ApiKeyNotConfigured { .. } => "ApiKeyNotConfigured",
            Self::ApiRequestFailed(_) => "ApiRequestFailed",
            Self::RateLimitExceeded { .. } => "RateLimitExceeded",
            Self::InvalidResponse(_) => "InvalidResponse",
            Self::UnknownProvider(_) => "UnknownProvider",
            Self::AllProvidersFailed(_) => "AllProvidersFailed",
            Self::NoHealthyProvider => "NoHealthyProvider",
            Self::Resilience(_) => "ResilienceBreaker",
            Self::Http(_) => "HttpError",
            Self::Config(_) => "Configuration",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codetran_errors::classify;

    #[test]
    fn rate_limit_classifies_via_shared_taxonomy() {
        let error = ProviderError::RateLimitExceeded { retry_after_secs: 30 };
        let (category, _) = classify(error.kind_name(), &error.to_string());
        assert_eq!(category, codetran_errors::ErrorCategory::RateLimit);
    }

    #[test]
    fn unknown_provider_classifies_as_provider_category() {
        let error = ProviderError::NoHealthyProvider;
        let (category, _) = classify(error.kind_name(), &error.to_string());
        assert_eq!(category, codetran_errors::ErrorCategory::Provider);
    }
}
