//! Circuit breaker: CLOSED / OPEN / HALF_OPEN state machine guarding a flaky call.

use std::future::Future;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::error::ResilienceError;

/// Current state of a [`CircuitBreaker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Calls are admitted normally.
    Closed,
    /// Calls are rejected until the recovery timeout elapses.
    Open,
    /// A bounded number of probe calls are admitted to test recovery.
    HalfOpen,
}

/// Tunable thresholds for a [`CircuitBreaker`].
#[derive(Debug, Clone, Copy)]
pub struct CircuitBreakerConfig {
    /// Consecutive CLOSED-state failures before tripping to OPEN.
    pub failure_threshold: u32,
    /// Time after tripping before a HALF_OPEN probe is admitted.
    pub recovery_timeout: Duration,
    /// Consecutive HALF_OPEN successes before closing.
    pub success_threshold: u32,
    /// Maximum concurrent probes admitted while HALF_OPEN.
    pub half_open_max_requests: u32,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            recovery_timeout: Duration::from_secs(60),
            success_threshold: 2,
            half_open_max_requests: 3,
        }
    }
}

#[derive(Debug)]
struct Inner {
    state: CircuitState,
    consecutive_failures: u32,
    consecutive_successes: u32,
    last_failure: Option<Instant>,
    half_open_admitted: u32,
}

impl Inner {
    fn new() -> Self {
        Self {
            state: CircuitState::Closed,
            consecutive_failures: 0,
            consecutive_successes: 0,
            last_failure: None,
            half_open_admitted: 0,
        }
    }
}

/// A stateful guard that short-circuits calls to a failing dependency after a
/// failure threshold, probes recovery after a cooldown, and re-closes after
/// consecutive successes. One instance guards one downstream dependency.
#[derive(Debug)]
pub struct CircuitBreaker {
    name: String,
    config: CircuitBreakerConfig,
    inner: Mutex<Inner>,
}

/// Outcome of attempting a call through a [`CircuitBreaker`].
#[derive(Debug)]
pub enum CircuitCallError<E> {
    /// The breaker rejected the call without invoking it.
    Rejected(ResilienceError),
    /// The call was admitted and the underlying operation failed.
    Inner(E),
}

impl CircuitBreaker {
    /// Create a breaker named `name` (used only for log correlation) with `config`.
    #[must_use]
    pub fn new(name: impl Into<String>, config: CircuitBreakerConfig) -> Self {
        Self {
            name: name.into(),
            config,
            inner: Mutex::new(Inner::new()),
        }
    }

    /// Current state, for inspection/metrics. Does not mutate state.
    #[must_use]
    pub fn state(&self) -> CircuitState {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).state
    }

    /// Decide whether a call may proceed right now, performing any
    /// OPEN-to-HALF_OPEN transition the recovery timeout allows.
    fn admit(&self) -> Result<(), ResilienceError> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        match inner.state {
            CircuitState::Closed => Ok(()),
            CircuitState::Open => {
                let elapsed = inner.last_failure.map_or(Duration::MAX, |t| t.elapsed());
                if elapsed >= self.config.recovery_timeout {
                    info!(breaker = %self.name, "transitioning OPEN -> HALF_OPEN");
                    inner.state = CircuitState::HalfOpen;
                    inner.half_open_admitted = 1;
                    inner.consecutive_successes = 0;
                    Ok(())
                } else {
                    let remaining = self.config.recovery_timeout.saturating_sub(elapsed);
                    Err(ResilienceError::BreakerOpen {
                        retry_after_secs: remaining.as_secs(),
                    })
                }
            },
            CircuitState::HalfOpen => {
                if inner.half_open_admitted < self.config.half_open_max_requests {
                    inner.half_open_admitted += 1;
                    Ok(())
                } else {
                    Err(ResilienceError::HalfOpenLimitReached)
                }
            },
        }
    }

    fn on_success(&self) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        match inner.state {
            CircuitState::Closed => {
                inner.consecutive_failures = 0;
            },
            CircuitState::HalfOpen => {
                inner.consecutive_successes += 1;
                if inner.consecutive_successes >= self.config.success_threshold {
                    info!(breaker = %self.name, "transitioning HALF_OPEN -> CLOSED");
                    inner.state = CircuitState::Closed;
                    inner.consecutive_failures = 0;
                    inner.consecutive_successes = 0;
                    inner.half_open_admitted = 0;
                }
            },
            CircuitState::Open => {},
        }
    }

    fn on_failure(&self) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.last_failure = Some(Instant::now());
        match inner.state {
            CircuitState::Closed => {
                inner.consecutive_failures += 1;
                if inner.consecutive_failures >= self.config.failure_threshold {
                    warn!(breaker = %self.name, "transitioning CLOSED -> OPEN");
                    inner.state = CircuitState::Open;
                }
            },
            CircuitState::HalfOpen => {
                warn!(breaker = %self.name, "transitioning HALF_OPEN -> OPEN");
                inner.state = CircuitState::Open;
                inner.consecutive_successes = 0;
                inner.half_open_admitted = 0;
            },
            CircuitState::Open => {},
        }
    }

    /// Run `f` through the breaker. If the breaker rejects the call, `f` is
    /// never invoked.
    pub async fn call<F, Fut, T, E>(&self, f: F) -> Result<T, CircuitCallError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.admit().map_err(CircuitCallError::Rejected)?;
        match f().await {
            Ok(value) => {
                self.on_success();
                Ok(value)
            },
            Err(err) => {
                self.on_failure();
                Err(CircuitCallError::Inner(err))
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn always_fails() -> Result<(), &'static str> {
        Err("boom")
    }

    async fn always_succeeds() -> Result<(), &'static str> {
        Ok(())
    }

    #[tokio::test]
    async fn trips_after_threshold_failures() {
        let breaker = CircuitBreaker::new(
            "test",
            CircuitBreakerConfig {
                failure_threshold: 3,
                ..Default::default()
            },
        );

        for _ in 0..3 {
            let result = breaker.call(always_fails).await;
            assert!(matches!(result, Err(CircuitCallError::Inner(_))));
        }

        assert_eq!(breaker.state(), CircuitState::Open);

        let result = breaker.call(always_succeeds).await;
        assert!(matches!(
            result,
            Err(CircuitCallError::Rejected(ResilienceError::BreakerOpen { .. }))
        ));
    }

    #[tokio::test]
    async fn recovers_after_timeout() {
        let breaker = CircuitBreaker::new(
            "test",
            CircuitBreakerConfig {
                failure_threshold: 1,
                recovery_timeout: Duration::from_millis(10),
                success_threshold: 1,
                half_open_max_requests: 1,
            },
        );

        let _ = breaker.call(always_fails).await;
        assert_eq!(breaker.state(), CircuitState::Open);

        tokio::time::sleep(Duration::from_millis(20)).await;

        let result = breaker.call(always_succeeds).await;
        assert!(result.is_ok());
        assert_eq!(breaker.state(), CircuitState::Closed);
    }

    #[tokio::test]
    async fn closed_state_resets_failure_counter_on_success() {
        let breaker = CircuitBreaker::new(
            "test",
            CircuitBreakerConfig {
                failure_threshold: 3,
                ..Default::default()
            },
        );
        let _ = breaker.call(always_fails).await;
        let _ = breaker.call(always_succeeds).await;
        let _ = breaker.call(always_fails).await;
        let _ = breaker.call(always_fails).await;
        assert_eq!(breaker.state(), CircuitState::Closed);
    }
}
