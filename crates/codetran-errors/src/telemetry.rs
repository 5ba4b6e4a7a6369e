//! Bounded telemetry ring buffer and the orchestrating [`ErrorHandler`].

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use tracing::{error, info, warn};

use crate::classify::classify;
use crate::formatter::UserMessageFormatter;
use crate::record::{ErrorCategory, ErrorContext, ErrorRecord, ErrorSeverity};

const DEFAULT_CAPACITY: usize = 1_000;

/// A bounded, lock-guarded ring buffer of the most recent [`ErrorRecord`]s.
pub struct ErrorTelemetry {
    capacity: usize,
    inner: Mutex<TelemetryInner>,
}

#[derive(Default)]
struct TelemetryInner {
    records: VecDeque<ErrorRecord>,
    error_counts: HashMap<String, u64>,
    category_counts: HashMap<ErrorCategory, u64>,
    severity_counts: HashMap<ErrorSeverity, u64>,
}

/// A point-in-time snapshot of telemetry counters.
#[derive(Debug, Clone, Default)]
pub struct ErrorStatistics {
    /// Total faults recorded since creation (not bounded by ring capacity).
    pub total_recorded: u64,
    /// Count of faults currently retained in the ring buffer.
    pub retained: usize,
    /// Counts keyed by `error_kind`.
    pub error_counts: HashMap<String, u64>,
    /// Counts keyed by category.
    pub category_counts: HashMap<ErrorCategory, u64>,
    /// Counts keyed by severity.
    pub severity_counts: HashMap<ErrorSeverity, u64>,
}

impl ErrorTelemetry {
    /// Create a ring buffer with the default capacity of 1,000.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a ring buffer with an explicit capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            inner: Mutex::new(TelemetryInner::default()),
        }
    }

    /// Append a record, evicting the oldest if at capacity. O(1).
    pub fn record(&self, record: ErrorRecord) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        *inner.error_counts.entry(record.error_kind.clone()).or_insert(0) += 1;
        *inner.category_counts.entry(record.category).or_insert(0) += 1;
        *inner.severity_counts.entry(record.severity).or_insert(0) += 1;
        if inner.records.len() >= self.capacity {
            inner.records.pop_front();
        }
        inner.records.push_back(record);
    }

    /// The `n` most recently recorded faults, newest last.
    #[must_use]
    pub fn recent(&self, n: usize) -> Vec<ErrorRecord> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.records.iter().rev().take(n).rev().cloned().collect()
    }

    /// A snapshot of running counters.
    #[must_use]
    pub fn statistics(&self) -> ErrorStatistics {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        ErrorStatistics {
            total_recorded: inner.error_counts.values().sum(),
            retained: inner.records.len(),
            error_counts: inner.error_counts.clone(),
            category_counts: inner.category_counts.clone(),
            severity_counts: inner.severity_counts.clone(),
        }
    }
}

impl Default for ErrorTelemetry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ErrorTelemetry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorTelemetry")
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

/// Hook invoked when a critical-severity fault is handled.
pub type CriticalHook = Box<dyn Fn(&ErrorRecord) + Send + Sync>;

/// Orchestrates classification, logging, and telemetry recording for a fault.
pub struct ErrorHandler {
    telemetry: ErrorTelemetry,
    on_critical: Option<CriticalHook>,
}

impl ErrorHandler {
    /// Create a handler with the default telemetry capacity and no critical hook.
    #[must_use]
    pub fn new() -> Self {
        Self {
            telemetry: ErrorTelemetry::new(),
            on_critical: None,
        }
    }

    /// Install a callback invoked whenever a critical fault is handled.
    #[must_use]
    pub fn with_critical_hook(mut self, hook: CriticalHook) -> Self {
        self.on_critical = Some(hook);
        self
    }

    /// Shared telemetry ring buffer.
    #[must_use]
    pub fn telemetry(&self) -> &ErrorTelemetry {
        &self.telemetry
    }

    /// Classify, format, log, and record a raw `(kind, message)` fault.
    ///
    /// Returns the fully populated [`ErrorRecord`] so the caller can propagate
    /// it (e.g. as an HTTP response body or CLI diagnostic).
    pub fn handle_error(
        &self,
        error_kind: &str,
        message: &str,
        context: ErrorContext,
        recovery_hints: Vec<String>,
    ) -> ErrorRecord {
        let (category, severity) = classify(error_kind, message);
        let user_message = UserMessageFormatter::format(category, &recovery_hints);

        let record = ErrorRecord {
            error_kind: error_kind.to_string(),
            message: message.to_string(),
            category,
            severity,
            context,
            user_message,
            recovery_hints,
        };

        self.log_structured(&record);
        self.telemetry.record(record.clone());

        if severity == ErrorSeverity::Critical {
            if let Some(hook) = &self.on_critical {
                hook(&record);
            }
        }

        record
    }

    fn log_structured(&self, record: &ErrorRecord) {
        let payload = serde_json::json!({
            "correlation_id": record.context.correlation_id.to_string(),
            "category": record.category,
            "severity": record.severity,
            "component": record.context.component,
            "operation": record.context.operation,
            "error_kind": record.error_kind,
            "message": record.message,
        });

        match record.severity {
            ErrorSeverity::Critical | ErrorSeverity::High => {
                error!(target: "codetran_errors", payload = %payload, "fault handled");
            },
            ErrorSeverity::Medium => {
                warn!(target: "codetran_errors", payload = %payload, "fault handled");
            },
            ErrorSeverity::Low => {
                info!(target: "codetran_errors", payload = %payload, "fault handled");
            },
        }
    }
}

impl Default for ErrorHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ErrorHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorHandler").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_buffer_evicts_oldest() {
        let telemetry = ErrorTelemetry::with_capacity(2);
        for i in 0..3 {
            telemetry.record(ErrorRecord {
                error_kind: format!("Kind{i}"),
                message: "m".to_string(),
                category: ErrorCategory::Unknown,
                severity: ErrorSeverity::Medium,
                context: ErrorContext::new("c", "op"),
                user_message: "u".to_string(),
                recovery_hints: vec![],
            });
        }
        let recent = telemetry.recent(10);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].error_kind, "Kind1");
        assert_eq!(recent[1].error_kind, "Kind2");
    }

    #[test]
    fn handler_classifies_and_records() {
        let handler = ErrorHandler::new();
        let record = handler.handle_error(
            "ApiRequestFailed",
            "HTTP 429: rate limit exceeded",
            ErrorContext::new("provider", "translate"),
            vec!["wait and retry".to_string()],
        );
        assert_eq!(record.category, ErrorCategory::RateLimit);
        assert_eq!(record.severity, ErrorSeverity::Low);
        assert_eq!(handler.telemetry().statistics().total_recorded, 1);
    }

    #[test]
    fn critical_hook_fires() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::sync::Arc;

        let fired = Arc::new(AtomicBool::new(false));
        let fired_clone = Arc::clone(&fired);
        let handler =
            ErrorHandler::new().with_critical_hook(Box::new(move |_record| {
                fired_clone.store(true, Ordering::SeqCst);
            }));
        handler.handle_error(
            "OSError",
            "disk full",
            ErrorContext::new("config", "save"),
            vec![],
        );
        assert!(fired.load(Ordering::SeqCst));
    }
}
