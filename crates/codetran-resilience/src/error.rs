//! Errors raised by the resilience primitives.

use thiserror::Error;

/// Errors produced by [`crate::CircuitBreaker`], [`crate::RateLimiter`], and
/// [`crate::PriorityQueue`].
#[derive(Debug, Error)]
pub enum ResilienceError {
    /// The breaker is OPEN and rejected the call without invoking it.
    #[error("circuit breaker open, retry after {retry_after_secs}s")]
    BreakerOpen {
        /// Seconds remaining until the breaker allows a probe.
        retry_after_secs: u64,
    },

    /// The breaker admitted as many HALF_OPEN probes as allowed; this one was rejected.
    #[error("circuit breaker half-open probe limit reached")]
    HalfOpenLimitReached,

    /// Non-blocking `try_acquire` could not debit the requested tokens.
    #[error("rate limit exceeded: requested {requested} tokens, {available:.2} available")]
    InsufficientTokens {
        /// Tokens requested.
        requested: u64,
        /// Tokens available at the time of the attempt.
        available: f64,
    },

    /// `get` on the priority queue timed out with nothing enqueued.
    #[error("priority queue empty")]
    Empty,
}

/// Result type for resilience primitive operations.
pub type ResilienceResult<T> = Result<T, ResilienceError>;
