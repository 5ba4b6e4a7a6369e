//! Error taxonomy, classification, telemetry and structured logging for codetran.
//!
//! This crate provides:
//! - A category/severity taxonomy shared by every other crate in the workspace
//! - A rule-based classifier that assigns category/severity from an error's kind and message
//! - A bounded telemetry ring buffer recording every fault that passes through
//!   [`ErrorHandler::handle_error`]
//! - Category-keyed user-facing message formatting
//! - A graceful-degradation registry for routing around a known-bad feature
//! - Logging setup built on `tracing`/`tracing-subscriber`/`tracing-appender`
//!
//! # Example
//!
//! ```rust,no_run
//! use codetran_errors::{LogConfig, LogFormat, setup_logging, RequestContext};
//!
//! # fn main() -> Result<(), codetran_errors::TelemetryError> {
//! let config = LogConfig::new("debug").with_format(LogFormat::Pretty);
//! setup_logging(&config)?;
//!
//! let ctx = RequestContext::new("facade").with_operation("translate");
//! let span = ctx.span();
//! let _guard = span.enter();
//! tracing::info!("translating");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod classify;
mod context;
mod degradation;
mod error;
mod formatter;
mod logging;
mod record;
mod telemetry;

pub use classify::{Classifiable, classify};
pub use context::{RequestContext, RequestGuard};
pub use degradation::{FeatureFallbackGuard, GracefulDegradation};
pub use error::{CodetranError, CodetranResult, TelemetryError, TelemetryResult};
pub use formatter::UserMessageFormatter;
pub use logging::{LogConfig, LogFormat, LogTarget, setup_default_logging, setup_logging};
pub use record::{ErrorCategory, ErrorContext, ErrorRecord, ErrorSeverity};
pub use telemetry::{ErrorHandler, ErrorStatistics, ErrorTelemetry};
