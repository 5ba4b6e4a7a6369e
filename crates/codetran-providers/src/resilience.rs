//! Per-provider resilience wrapping: circuit breaker + rate limiter +
//! running metrics around every outbound call.
//!
//! Grounded in `BaseProvider.execute_with_resilience`: rate-limit first,
//! then run the call through the circuit breaker, then update metrics from
//! the outcome either way.

use std::sync::Mutex;
use std::time::Instant;

use codetran_resilience::{CircuitBreaker, CircuitCallError, RateLimiter};

use crate::error::{ProviderError, ProviderResult};
use crate::types::ProviderMetrics;

/// Bundles the resilience primitives and metrics a single provider instance
/// needs around every call.
pub struct ResilienceGuard {
    breaker: CircuitBreaker,
    limiter: RateLimiter,
    metrics: Mutex<ProviderMetrics>,
}

impl ResilienceGuard {
    /// Build a guard named `name` (used for breaker log correlation) with
    /// the given steady-state rate and burst size.
    #[must_use]
    pub fn new(name: impl Into<String>, rate_per_sec: f64, burst: f64) -> Self {
        Self {
            breaker: CircuitBreaker::new(name, codetran_resilience::CircuitBreakerConfig::default()),
            limiter: RateLimiter::new(rate_per_sec, burst),
            metrics: Mutex::new(ProviderMetrics::default()),
        }
    }

    /// Run `call` through the rate limiter and circuit breaker, recording
    /// latency and success/failure into the running metrics.
    ///
    /// # Errors
    /// Returns [`ProviderError::Resilience`] if the breaker is open, or
    /// propagates `call`'s own error otherwise.
    pub async fn execute<F, Fut, T>(&self, call: F) -> ProviderResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = ProviderResult<T>>,
    {
        self.limiter.acquire(1.0).await.map_err(ProviderError::Resilience)?;

        let start = Instant::now();
        let outcome = self.breaker.call(call).await;

        match outcome {
            Ok(value) => {
                #[allow(clippy::cast_possible_truncation)]
                let latency_ms = start.elapsed().as_millis() as u64;
                self.metrics.lock().unwrap_or_else(|e| e.into_inner()).record_success(latency_ms);
                Ok(value)
            },
            Err(CircuitCallError::Rejected(e)) => {
                self.metrics.lock().unwrap_or_else(|e| e.into_inner()).record_failure();
                Err(ProviderError::Resilience(e))
            },
            Err(CircuitCallError::Inner(e)) => {
                self.metrics.lock().unwrap_or_else(|e| e.into_inner()).record_failure();
                Err(e)
            },
        }
    }

    /// A snapshot of the running metrics.
    #[must_use]
    pub fn metrics(&self) -> ProviderMetrics {
        self.metrics.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn successful_calls_accumulate_metrics() {
        let guard = ResilienceGuard::new("test", 100.0, 10.0);
        let result: ProviderResult<u32> = guard.execute(|| async { Ok(7) }).await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(guard.metrics().successful_requests, 1);
    }

    #[tokio::test]
    async fn failed_calls_count_against_the_breaker() {
        let guard = ResilienceGuard::new("test", 100.0, 10.0);
        let result: ProviderResult<u32> =
            guard.execute(|| async { Err(ProviderError::ApiRequestFailed("boom".into())) }).await;
        assert!(result.is_err());
        assert_eq!(guard.metrics().failed_requests, 1);
    }
}
