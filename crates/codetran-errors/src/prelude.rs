//! Prelude module - commonly used types for convenient import.
//!
//! Use `use codetran_errors::prelude::*;` to import all essential types.
//!
//! # Example
//!
//! ```rust,no_run
//! use codetran_errors::prelude::*;
//!
//! # fn main() -> TelemetryResult<()> {
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

// Errors
pub use crate::{CodetranError, CodetranResult, TelemetryError, TelemetryResult};

// Taxonomy
pub use crate::{ErrorCategory, ErrorContext, ErrorRecord, ErrorSeverity};

// Classification
pub use crate::{Classifiable, classify};

// Telemetry & handling
pub use crate::{ErrorHandler, ErrorStatistics, ErrorTelemetry, UserMessageFormatter};

// Degradation
pub use crate::{FeatureFallbackGuard, GracefulDegradation};

// Logging configuration
pub use crate::{LogConfig, LogFormat, LogTarget};

// Setup functions
pub use crate::{setup_default_logging, setup_logging};

// Request context
pub use crate::{RequestContext, RequestGuard};
