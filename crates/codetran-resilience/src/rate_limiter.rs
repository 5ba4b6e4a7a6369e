//! Token-bucket rate limiter.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::error::ResilienceError;

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

/// A token bucket with a fixed refill rate and burst capacity.
///
/// `acquire` always refills first: `tokens = min(burst, tokens + elapsed *
/// rate)`. If enough tokens are then available they are debited immediately;
/// otherwise the caller either blocks for the deficit (`acquire`) or is
/// told no (`try_acquire`).
#[derive(Debug)]
pub struct RateLimiter {
    rate: f64,
    burst: f64,
    bucket: Mutex<Bucket>,
}

impl RateLimiter {
    /// Create a limiter refilling at `rate` tokens/second up to `burst` tokens,
    /// starting full.
    #[must_use]
    pub fn new(rate: f64, burst: f64) -> Self {
        Self {
            rate,
            burst,
            bucket: Mutex::new(Bucket {
                tokens: burst,
                last_refill: Instant::now(),
            }),
        }
    }

    #[allow(clippy::arithmetic_side_effects)]
    fn refill(bucket: &mut Bucket, rate: f64, burst: f64) {
        let now = Instant::now();
        let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * rate).min(burst);
        bucket.last_refill = now;
    }

    /// Current token level, after applying any pending refill. For inspection only.
    #[must_use]
    pub fn available(&self) -> f64 {
        let mut bucket = self.bucket.lock().unwrap_or_else(|e| e.into_inner());
        Self::refill(&mut bucket, self.rate, self.burst);
        bucket.tokens
    }

    /// Debit `tokens` tokens immediately if available, otherwise return
    /// `false` without blocking.
    #[must_use]
    pub fn try_acquire(&self, tokens: f64) -> bool {
        let mut bucket = self.bucket.lock().unwrap_or_else(|e| e.into_inner());
        Self::refill(&mut bucket, self.rate, self.burst);
        if bucket.tokens >= tokens {
            bucket.tokens -= tokens;
            true
        } else {
            false
        }
    }

    /// Debit `tokens` tokens, waiting for the refill deficit if necessary.
    ///
    /// `tokens` may exceed `burst`: the bucket is driven into debt and the
    /// call blocks until the elapsed time at `rate` would have covered the
    /// deficit, at least `(tokens - burst) / rate` when starting from a full
    /// bucket. Never fails; use [`Self::try_acquire`] for a non-blocking check.
    #[allow(clippy::arithmetic_side_effects)]
    pub async fn acquire(&self, tokens: f64) -> Result<(), ResilienceError> {
        let wait = {
            let mut bucket = self.bucket.lock().unwrap_or_else(|e| e.into_inner());
            Self::refill(&mut bucket, self.rate, self.burst);
            let wait = if bucket.tokens >= tokens {
                None
            } else {
                let deficit = tokens - bucket.tokens;
                Some(Duration::from_secs_f64(deficit / self.rate))
            };
            bucket.tokens -= tokens;
            wait
        };

        if let Some(duration) = wait {
            tokio::time::sleep(duration).await;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_acquire_debits_when_available() {
        let limiter = RateLimiter::new(1.0, 5.0);
        assert!(limiter.try_acquire(3.0));
        assert!(limiter.available() <= 2.01);
    }

    #[test]
    fn try_acquire_fails_when_insufficient() {
        let limiter = RateLimiter::new(1.0, 2.0);
        assert!(limiter.try_acquire(2.0));
        assert!(!limiter.try_acquire(1.0));
    }

    #[tokio::test(start_paused = true)]
    async fn acquire_blocks_until_refilled() {
        let limiter = RateLimiter::new(10.0, 1.0);
        assert!(limiter.try_acquire(1.0));

        let start = tokio::time::Instant::now();
        limiter.acquire(1.0).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(90));
    }

    #[tokio::test(start_paused = true)]
    async fn acquire_over_burst_blocks_for_the_deficit_then_succeeds() {
        let limiter = RateLimiter::new(1.0, 2.0);
        let start = tokio::time::Instant::now();
        limiter.acquire(5.0).await.unwrap();
        assert!(start.elapsed() >= Duration::from_secs(3));
    }
}
