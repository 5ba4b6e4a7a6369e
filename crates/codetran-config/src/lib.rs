//! Atomic, schema-validated, versioned, encrypted configuration store.
//!
//! A configuration record is a flat map from string keys to scalar values,
//! declared by a [`ConfigSchema`], persisted through one of three
//! [`StorageBackend`] encodings under an atomic write with checksum
//! verification and rolling backups. Sensitive fields are encrypted at rest
//! with AES-256-GCM; a decryption failure clears that field rather than
//! failing the whole load.
//!
//! ```no_run
//! use codetran_config::{ConfigStore, ConfigValue, StorageBackend, default_schema};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = ConfigStore::open(
//!     std::path::Path::new("/tmp/codetran"),
//!     StorageBackend::Json,
//!     default_schema(),
//! )?;
//! store.set("theme", ConfigValue::String("dark".into()))?;
//! assert_eq!(store.get("theme"), Some(ConfigValue::String("dark".into())));
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod backup;
mod checksum;
mod crypto;
mod error;
mod migration;
mod storage;
mod store;
mod types;

pub use crypto::SecureCredentialManager;
pub use error::{ConfigError, ConfigResult};
pub use migration::{ConfigMigration, MigrationTable};
pub use storage::{StorageBackend, atomic_write};
pub use store::{ConfigStore, ImportMode, Transaction};
pub use types::{ConfigSchema, ConfigValue, ScalarType, SchemaEntry, default_schema};
