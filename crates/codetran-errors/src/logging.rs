//! Logging setup on top of `tracing-subscriber` and `tracing-appender`.

use std::path::PathBuf;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

use crate::error::{TelemetryError, TelemetryResult};

/// Output shape for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line, human-readable.
    Pretty,
    /// One JSON object per line, suitable for the `logs/` JSONL sink.
    Json,
    /// Single-line, human-readable.
    Compact,
}

/// Where log output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Standard error.
    Stdout,
    /// A daily-rolling file under the given directory.
    File(PathBuf),
}

/// Logging configuration: level, format, target, and extra per-module directives.
#[derive(Debug, Clone)]
pub struct LogConfig {
    level: String,
    format: LogFormat,
    target: LogTarget,
    directives: Vec<String>,
}

impl LogConfig {
    /// Start from a base level (e.g. `"info"`, `"debug"`), pretty format, stdout.
    #[must_use]
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            format: LogFormat::Pretty,
            target: LogTarget::Stdout,
            directives: Vec::new(),
        }
    }

    /// Override the output format.
    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Override the output target.
    #[must_use]
    pub fn with_target(mut self, target: LogTarget) -> Self {
        self.target = target;
        self
    }

    /// Add an extra `EnvFilter` directive, e.g. `"codetran_providers=trace"`.
    #[must_use]
    pub fn with_directive(mut self, directive: impl Into<String>) -> Self {
        self.directives.push(directive.into());
        self
    }

    fn env_filter(&self) -> EnvFilter {
        let mut filter = EnvFilter::new(&self.level);
        for directive in &self.directives {
            if let Ok(d) = directive.parse() {
                filter = filter.add_directive(d);
            }
        }
        filter
    }
}

/// Install a global subscriber built from `config`. Call at most once per process.
///
/// # Errors
/// Returns [`TelemetryError::InitError`] if a global subscriber is already set,
/// or [`TelemetryError::IoError`] if the `logs/` directory cannot be created.
pub fn setup_logging(config: &LogConfig) -> TelemetryResult<()> {
    let filter = config.env_filter();

    match &config.target {
        LogTarget::Stdout => {
            let layer = boxed_layer(config.format, fmt::layer::<FilteredRegistry>());
            install(filter, layer)
        },
        LogTarget::File(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = tracing_appender::rolling::daily(dir, "codetran.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            // Leak the guard: the subscriber must outlive this function, and the
            // process owns the writer for its whole lifetime.
            std::mem::forget(guard);
            let layer = boxed_layer(config.format, fmt::layer::<FilteredRegistry>().with_writer(writer));
            install(filter, layer)
        },
    }
}

type FilteredRegistry = tracing_subscriber::layer::Layered<EnvFilter, tracing_subscriber::Registry>;

type BoxedFmtLayer = Box<dyn tracing_subscriber::Layer<FilteredRegistry> + Send + Sync + 'static>;

fn boxed_layer<W>(format: LogFormat, layer: fmt::Layer<FilteredRegistry, fmt::format::DefaultFields, fmt::format::Format, W>) -> BoxedFmtLayer
where
    W: for<'writer> fmt::MakeWriter<'writer> + Send + Sync + 'static,
{
    match format {
        LogFormat::Pretty => layer.pretty().boxed(),
        LogFormat::Json => layer.json().boxed(),
        LogFormat::Compact => layer.compact().boxed(),
    }
}

fn install(filter: EnvFilter, layer: BoxedFmtLayer) -> TelemetryResult<()> {
    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|e| TelemetryError::InitError(e.to_string()))
}

/// Install a reasonable default: `info` level, compact format, stdout.
///
/// # Errors
/// See [`setup_logging`].
pub fn setup_default_logging() -> TelemetryResult<()> {
    setup_logging(&LogConfig::new("info").with_format(LogFormat::Compact))
}
