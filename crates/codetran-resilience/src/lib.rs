//! Resilience primitives shared by every provider: circuit breaker,
//! token-bucket rate limiter, and a priority queue for admission control.
//!
//! Each provider instance owns one [`CircuitBreaker`] and one [`RateLimiter`],
//! independently of every other provider, so a failing dependency cannot
//! starve a healthy one.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod circuit_breaker;
mod error;
mod priority_queue;
mod rate_limiter;

pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitCallError, CircuitState};
pub use error::{ResilienceError, ResilienceResult};
pub use priority_queue::{Priority, PriorityQueue};
pub use rate_limiter::RateLimiter;
