//! Crate-local error types, and the shared top-level error enum for the workspace.

use thiserror::Error;

use crate::classify::Classifiable;
use crate::record::ErrorCategory;

/// Errors that can occur while setting up logging/telemetry itself.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Logging configuration was invalid.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The global subscriber could not be installed.
    #[error("Initialization error: {0}")]
    InitError(String),

    /// A log-file sink could not be opened.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for telemetry/logging operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// The shared top-level error threaded through every public `Result` in the
/// workspace. Leaf variants correspond directly to [`ErrorCategory`] buckets;
/// lower crates convert their own error enums into this one via `#[from]` or
/// by classifying their message text through [`crate::classify`].
#[derive(Debug, Error)]
pub enum CodetranError {
    /// A configuration value failed schema validation or could not be loaded.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A network-level failure (timeout, connection refused, DNS).
    #[error("network error: {0}")]
    Network(String),

    /// Missing or rejected credentials.
    #[error("authentication error: {0}")]
    Authentication(String),

    /// Upstream rate limiting.
    #[error("rate limit exceeded: {0}")]
    RateLimit(String),

    /// Caller-supplied input failed validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// A single provider failed.
    #[error("provider error: {0}")]
    Provider(String),

    /// Every provider in a chain failed.
    #[error("all providers failed: {0}")]
    AllProvidersFailed(String),

    /// The circuit breaker rejected the call without invoking it.
    #[error("circuit breaker open for {provider}")]
    BreakerOpen {
        /// Name of the provider whose breaker is open.
        provider: String,
    },

    /// Language detection returned no confident match.
    #[error("language could not be detected")]
    LanguageUndetected,

    /// A language name was not in the supported set.
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// A system-level failure (I/O, memory, process).
    #[error("system error: {0}")]
    System(String),

    /// Did not match any more specific classification.
    #[error("unexpected error: {0}")]
    Unknown(String),
}

/// Result type used throughout the workspace's public APIs.
pub type CodetranResult<T> = Result<T, CodetranError>;

impl Classifiable for CodetranError {
    fn kind_name(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "Configuration",
            Self::Network(_) => "Network",
            Self::Authentication(_) => "Authentication",
            Self::RateLimit(_) => "RateLimit",
            Self::Validation(_) => "Validation",
            Self::Provider(_) => "Provider",
            Self::AllProvidersFailed(_) => "AllProvidersFailed",
            Self::BreakerOpen { .. } => "BreakerOpen",
            Self::LanguageUndetected => "LanguageUndetected",
            Self::UnsupportedLanguage(_) => "UnsupportedLanguage",
            Self::System(_) => "System",
            Self::Unknown(_) => "Unknown",
        }
    }
}

impl CodetranError {
    /// The taxonomy category this variant belongs to, independent of the
    /// rule-based classifier (used when the variant already encodes its own
    /// category unambiguously).
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::Network(_) => ErrorCategory::Network,
            Self::Authentication(_) => ErrorCategory::Authentication,
            Self::RateLimit(_) => ErrorCategory::RateLimit,
            Self::Validation(_) | Self::LanguageUndetected | Self::UnsupportedLanguage(_) => {
                ErrorCategory::UserInput
            },
            Self::Provider(_) | Self::AllProvidersFailed(_) | Self::BreakerOpen { .. } => {
                ErrorCategory::Provider
            },
            Self::System(_) => ErrorCategory::System,
            Self::Unknown(_) => ErrorCategory::Unknown,
        }
    }
}
