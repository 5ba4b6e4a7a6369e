//! The error taxonomy and the record shape used across the workspace.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Classification bucket for a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Malformed or missing configuration.
    Configuration,
    /// Network I/O or transport failure.
    Network,
    /// Missing or rejected credentials.
    Authentication,
    /// Upstream rate limiting.
    RateLimit,
    /// Caller-supplied input failed validation.
    Validation,
    /// A provider-specific failure not otherwise classified.
    Provider,
    /// A system-level failure (I/O, memory, process).
    System,
    /// A user-input failure surfaced at the façade boundary.
    UserInput,
    /// Did not match any classification rule.
    Unknown,
}

impl ErrorCategory {
    /// Default severity assigned to this category absent any other signal.
    #[must_use]
    pub fn default_severity(self) -> ErrorSeverity {
        match self {
            Self::RateLimit => ErrorSeverity::Low,
            Self::Network | Self::Validation | Self::UserInput => ErrorSeverity::Medium,
            Self::Authentication | Self::Configuration => ErrorSeverity::High,
            Self::System => ErrorSeverity::Critical,
            Self::Provider | Self::Unknown => ErrorSeverity::Medium,
        }
    }
}

/// How severe a fault is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorSeverity {
    /// Informational; no operator action expected.
    Low,
    /// Worth noting; typically transient.
    Medium,
    /// Needs attention; a capability is impaired.
    High,
    /// A capability is down or data integrity is at risk.
    Critical,
}

/// The trail of component/operation/identifiers a fault passed through.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Unique per-fault identifier threaded through logs and user reports.
    pub correlation_id: Uuid,
    /// When the fault was recorded.
    pub timestamp: DateTime<Utc>,
    /// Component that raised or observed the fault.
    pub component: String,
    /// Operation in progress when the fault occurred.
    pub operation: String,
    /// Caller-supplied user identifier, if any.
    pub user_id: Option<String>,
    /// Caller-supplied session identifier, if any.
    pub session_id: Option<String>,
    /// Caller-supplied request identifier, if any.
    pub request_id: Option<String>,
    /// Free-form structured metadata.
    pub metadata: HashMap<String, Value>,
}

impl ErrorContext {
    /// Start a new context for `component`/`operation` with a fresh correlation id.
    #[must_use]
    pub fn new(component: impl Into<String>, operation: impl Into<String>) -> Self {
        Self {
            correlation_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            component: component.into(),
            operation: operation.into(),
            user_id: None,
            session_id: None,
            request_id: None,
            metadata: HashMap::new(),
        }
    }

    /// Attach a metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// A fully classified, user-facing fault record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// The underlying error's type name (e.g. `"ConfigError::SchemaValidation"`).
    pub error_kind: String,
    /// The underlying error's display message.
    pub message: String,
    /// Classification bucket.
    pub category: ErrorCategory,
    /// Severity.
    pub severity: ErrorSeverity,
    /// Where and when the fault occurred.
    pub context: ErrorContext,
    /// Plain-language message safe to show an end user.
    pub user_message: String,
    /// Suggested remediations, appended to `user_message` when rendered.
    pub recovery_hints: Vec<String>,
}

impl ErrorRecord {
    /// Technical detail suitable only for structured logs, never end users.
    #[must_use]
    pub fn technical_detail(&self) -> String {
        format!("{}: {}", self.error_kind, self.message)
    }
}
