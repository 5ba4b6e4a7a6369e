//! Shared request/response and capability types for translation providers.

use std::collections::HashMap;

/// Options accompanying a translation request.
#[derive(Debug, Clone, Default)]
pub struct TranslationOptions {
    /// Preserve the original comments verbatim where possible.
    pub preserve_comments: bool,
    /// Target style hints (e.g. "pep8", "google-java-style").
    pub style: Option<String>,
    /// Per-request overrides of provider-level generation parameters.
    pub extra: HashMap<String, String>,
}

/// The outcome of a successful translation: the translated text plus the
/// provider's self-reported confidence in `[0.0, 1.0]`.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationOutcome {
    /// Translated source code.
    pub text: String,
    /// Confidence score.
    pub confidence: f64,
}

impl TranslationOutcome {
    /// Construct an outcome, clamping `confidence` into `[0.0, 1.0]`.
    #[must_use]
    pub fn new(text: impl Into<String>, confidence: f64) -> Self {
        Self {
            text: text.into(),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}

/// Provider health, as reported by its periodic probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderStatus {
    /// Responding normally.
    Healthy,
    /// Responding, but with degraded latency or partial failures.
    Degraded,
    /// Not responding or authentication/config is broken.
    Unhealthy,
    /// No probe has completed yet.
    Unknown,
}

/// What a provider declares it can do.
#[derive(Debug, Clone)]
pub struct ProviderCapabilities {
    /// Source/target language pairs the provider claims support for, as
    /// `"source->target"` strings; empty means "best-effort, any pair".
    pub supported_pairs: Vec<String>,
    /// Maximum input size in characters the provider accepts.
    pub max_input_chars: usize,
    /// Whether the provider can produce natural-language explanations in
    /// addition to translation.
    pub supports_explain: bool,
    /// Whether the provider requires network access.
    pub requires_network: bool,
}

/// Running performance counters for a single provider instance.
///
/// Grounded in the upstream `ProviderMetrics` dataclass: request counts plus
/// cumulative latency, from which `success_rate`/`average_latency` derive.
#[derive(Debug, Clone, Default)]
pub struct ProviderMetrics {
    /// Total calls attempted.
    pub total_requests: u64,
    /// Calls that returned successfully.
    pub successful_requests: u64,
    /// Calls that returned an error.
    pub failed_requests: u64,
    /// Sum of successful call latencies, in milliseconds.
    pub total_latency_ms: u64,
}

impl ProviderMetrics {
    /// Fraction of calls that succeeded; `1.0` with no history.
    #[must_use]
    pub fn success_rate(&self) -> f64 {
        if self.total_requests == 0 {
            return 1.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let rate = self.successful_requests as f64 / self.total_requests as f64;
        rate
    }

    /// Mean latency of successful calls, in milliseconds; `0.0` with no history.
    #[must_use]
    pub fn average_latency_ms(&self) -> f64 {
        if self.successful_requests == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let avg = self.total_latency_ms as f64 / self.successful_requests as f64;
        avg
    }

    pub(crate) fn record_success(&mut self, latency_ms: u64) {
        self.total_requests = self.total_requests.saturating_add(1);
        self.successful_requests = self.successful_requests.saturating_add(1);
        self.total_latency_ms = self.total_latency_ms.saturating_add(latency_ms);
    }

    pub(crate) fn record_failure(&mut self) {
        self.total_requests = self.total_requests.saturating_add(1);
        self.failed_requests = self.failed_requests.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_rate_defaults_to_one() {
        assert_eq!(ProviderMetrics::default().success_rate(), 1.0);
    }

    #[test]
    fn metrics_accumulate() {
        let mut metrics = ProviderMetrics::default();
        metrics.record_success(100);
        metrics.record_success(300);
        metrics.record_failure();
        assert_eq!(metrics.total_requests, 3);
        assert!((metrics.success_rate() - (2.0 / 3.0)).abs() < 1e-9);
        assert!((metrics.average_latency_ms() - 200.0).abs() < 1e-9);
    }
}
