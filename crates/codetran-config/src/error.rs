//! Configuration error types.

use thiserror::Error;

/// Errors raised by the configuration store.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// One or more fields failed schema validation.
    #[error("schema validation failed: {0:?}")]
    SchemaValidation(Vec<String>),

    /// The on-disk file could not be parsed and no backup verified either.
    #[error("configuration corrupted and unrecoverable: {0}")]
    Corruption(String),

    /// A key was requested that does not exist in the schema.
    #[error("unknown configuration key: {0}")]
    UnknownKey(String),

    /// Encryption/decryption of a sensitive field failed.
    #[error("crypto error: {0}")]
    Crypto(String),

    /// Filesystem I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML (de)serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A transaction was committed or aborted twice, or neither.
    #[error("transaction error: {0}")]
    Transaction(String),

    /// No migration path exists between two schema versions and the data
    /// was therefore left unmigrated (non-fatal; callers may inspect via
    /// the returned warning rather than this variant in practice).
    #[error("no migration path from version {from} to {to}")]
    NoMigrationPath {
        /// Version found on disk.
        from: u32,
        /// Version the running schema expects.
        to: u32,
    },
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
