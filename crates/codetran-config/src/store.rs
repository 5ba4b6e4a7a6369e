//! The configuration store: the public `get`/`set`/`update`/`transaction`/
//! `export`/`import`/`reset` contract over an encrypted, checksummed,
//! backed-up, schema-validated record.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde_json::{Map, Value};
use tracing::warn;

use crate::backup::{create_backup, list_backups_newest_first};
use crate::checksum;
use crate::crypto::SecureCredentialManager;
use crate::error::{ConfigError, ConfigResult};
use crate::migration::MigrationTable;
use crate::storage::{StorageBackend, atomic_write};
use crate::types::{ConfigSchema, ConfigValue};

const CHECKSUM_KEY: &str = "_checksum";
const VERSION_KEY: &str = "schema_version";
const KEY_FILE_NAME: &str = "codetran.key";
const RECOVERY_BACKUP_ATTEMPTS: usize = 3;

/// How an imported record should be merged with the existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    /// Overlay imported fields onto the existing record.
    Merge,
    /// Replace the record outright; defaults fill any omitted required field.
    Replace,
}

/// A durable, validated, encrypted, versioned key/value configuration store.
///
/// Owns the on-disk file, the encryption key file, and the backup directory
/// for its `dir`. Not a process singleton: callers construct one per
/// application instance (or per test) and thread it explicitly.
pub struct ConfigStore {
    file_path: PathBuf,
    backup_dir: PathBuf,
    backend: StorageBackend,
    schema: ConfigSchema,
    credentials: SecureCredentialManager,
    migrations: MigrationTable,
    values: RwLock<BTreeMap<String, ConfigValue>>,
}

impl ConfigStore {
    /// Open (or initialize) a store rooted at `dir`, using `backend`'s
    /// on-disk encoding and `schema` as the running schema.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] on filesystem failure while creating
    /// `dir` or the key file.
    pub fn open(dir: &Path, backend: StorageBackend, schema: ConfigSchema) -> ConfigResult<Self> {
        Self::open_with_migrations(dir, backend, schema, MigrationTable::new())
    }

    /// As [`Self::open`], additionally registering a migration table
    /// consulted when the on-disk schema version differs from `schema.version`.
    ///
    /// # Errors
    /// See [`Self::open`].
    pub fn open_with_migrations(
        dir: &Path,
        backend: StorageBackend,
        schema: ConfigSchema,
        migrations: MigrationTable,
    ) -> ConfigResult<Self> {
        std::fs::create_dir_all(dir)?;
        let file_path = dir.join(format!("config.{}", backend.extension()));
        let backup_dir = dir.join("backups");
        let key_path = dir.join(KEY_FILE_NAME);
        let credentials = SecureCredentialManager::load_or_create(&key_path)?;

        let mut store = Self {
            file_path,
            backup_dir,
            backend,
            schema,
            credentials,
            migrations,
            values: RwLock::new(BTreeMap::new()),
        };
        store.load()?;
        Ok(store)
    }

    fn load(&mut self) -> ConfigResult<()> {
        let file_exists = self.file_path.exists();
        let loaded = if file_exists {
            match self.try_load_file(&self.file_path.clone()) {
                Ok(loaded) => Some(loaded),
                Err(e) => {
                    warn!(error = %e, "configuration file failed integrity check, searching backups");
                    self.recover_from_backups()?
                },
            }
        } else {
            None
        };

        let mut values = match loaded {
            Some((values, on_disk_version)) => {
                let mut values = values;
                self.apply_migrations(&mut values, on_disk_version);
                values
            },
            None => self.schema.defaults(),
        };

        for (name, entry) in &self.schema.fields {
            values.entry(name.clone()).or_insert_with(|| entry.default.clone());
        }

        *self.values.write().unwrap_or_else(|e| e.into_inner()) = values;

        if !file_exists {
            self.persist()?;
        }
        Ok(())
    }

    fn recover_from_backups(&self) -> ConfigResult<Option<(BTreeMap<String, ConfigValue>, u32)>> {
        let candidates = list_backups_newest_first(&self.backup_dir)?;
        for candidate in candidates.into_iter().take(RECOVERY_BACKUP_ATTEMPTS) {
            if let Ok(loaded) = self.try_load_file(&candidate) {
                warn!(backup = %candidate.display(), "recovered configuration from backup");
                return Ok(Some(loaded));
            }
        }
        warn!("no backup verified; reinitializing configuration with defaults");
        Ok(None)
    }

    fn try_load_file(&self, path: &Path) -> ConfigResult<(BTreeMap<String, ConfigValue>, u32)> {
        let bytes = std::fs::read(path)?;
        let record = self.backend.decode(&bytes)?;

        let stored_checksum = record
            .get(CHECKSUM_KEY)
            .and_then(Value::as_str)
            .ok_or_else(|| ConfigError::Corruption("missing checksum".to_string()))?
            .to_string();

        let on_disk_version = record
            .get(VERSION_KEY)
            .and_then(Value::as_u64)
            .map_or(self.schema.version, |v| v as u32);

        let mut values = BTreeMap::new();
        for (key, value) in &record {
            if key == CHECKSUM_KEY || key == VERSION_KEY {
                continue;
            }
            values.insert(key.clone(), json_to_config_value(value)?);
        }

        if !checksum::verify(&values, &stored_checksum) {
            return Err(ConfigError::Corruption("checksum mismatch".to_string()));
        }

        for (name, entry) in &self.schema.fields {
            if entry.sensitive {
                if let Some(ConfigValue::String(encrypted)) = values.get(name) {
                    if !encrypted.is_empty() {
                        let plaintext = self.credentials.decrypt(encrypted);
                        values.insert(name.clone(), ConfigValue::String(plaintext));
                    }
                }
            }
        }

        Ok((values, on_disk_version))
    }

    /// Walk the migration chain from `on_disk_version` to `self.schema.version`,
    /// applying each matching step in order. Stops and warns if no step
    /// continues the chain before reaching the target version.
    fn apply_migrations(&self, values: &mut BTreeMap<String, ConfigValue>, on_disk_version: u32) {
        let mut version = on_disk_version;
        while version != self.schema.version {
            match self.migrations.find(version) {
                Some(migration) => {
                    (migration.apply)(values);
                    version = migration.to;
                },
                None => {
                    warn!(
                        from = version,
                        to = self.schema.version,
                        "no migration path; leaving record unmigrated"
                    );
                    break;
                },
            }
        }
    }

    fn persist(&self) -> ConfigResult<()> {
        create_backup(&self.file_path, &self.backup_dir, self.backend.extension())?;

        let values = self.values.read().unwrap_or_else(|e| e.into_inner());
        let mut record = Map::new();
        let mut on_disk_values = BTreeMap::new();

        for (key, value) in values.iter() {
            let on_disk = match self.schema.fields.get(key) {
                Some(entry) if entry.sensitive => match value {
                    ConfigValue::String(plaintext) if !plaintext.is_empty() => {
                        ConfigValue::String(self.credentials.encrypt(plaintext)?)
                    },
                    other => other.clone(),
                },
                _ => value.clone(),
            };
            record.insert(key.clone(), on_disk.to_json());
            on_disk_values.insert(key.clone(), on_disk);
        }

        // Checksum covers the on-disk (post-encryption) values, matching
        // try_load_file's verify-then-decrypt order.
        let checksum = checksum::compute(&on_disk_values);
        record.insert(CHECKSUM_KEY.to_string(), Value::String(checksum));
        record.insert(VERSION_KEY.to_string(), Value::Number(self.schema.version.into()));

        let bytes = self.backend.encode(&record)?;
        atomic_write(&self.file_path, &bytes)
    }

    /// Constant-time lookup of the in-memory view.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<ConfigValue> {
        self.values.read().unwrap_or_else(|e| e.into_inner()).get(key).cloned()
    }

    /// The full in-memory record.
    #[must_use]
    pub fn get_all(&self) -> BTreeMap<String, ConfigValue> {
        self.values.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Validate and persist a single field.
    ///
    /// # Errors
    /// Returns [`ConfigError::SchemaValidation`] if `value` violates the
    /// field's schema, or [`ConfigError::UnknownKey`] if `key` is undeclared.
    pub fn set(&self, key: &str, value: ConfigValue) -> ConfigResult<()> {
        let entry = self.schema.entry(key)?;
        entry.validate(key, &value).map_err(|e| ConfigError::SchemaValidation(vec![e]))?;

        {
            let mut values = self.values.write().unwrap_or_else(|e| e.into_inner());
            values.insert(key.to_string(), value);
        }
        self.persist()
    }

    /// Validate the merged view before applying any of `updates`.
    ///
    /// # Errors
    /// Returns [`ConfigError::SchemaValidation`] listing every offending field.
    pub fn update(&self, updates: BTreeMap<String, ConfigValue>) -> ConfigResult<()> {
        let mut merged = self.get_all();
        merged.extend(updates);
        self.schema.validate_all(&merged)?;

        {
            let mut values = self.values.write().unwrap_or_else(|e| e.into_inner());
            *values = merged;
        }
        self.persist()
    }

    /// Open a scoped edit batch. See [`Transaction`] for commit/rollback
    /// semantics.
    pub fn transaction(&self) -> Transaction<'_> {
        Transaction {
            store: self,
            snapshot: self.get_all(),
            pending: BTreeMap::new(),
            finalized: false,
        }
    }

    /// Write a sanitized snapshot to `path`, omitting the checksum/version
    /// envelope and, when `include_sensitive` is false, every sensitive field.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`]/[`ConfigError::Json`] on write failure.
    pub fn export(&self, path: &Path, include_sensitive: bool) -> ConfigResult<()> {
        let values = self.get_all();
        let mut record = Map::new();
        for (key, value) in &values {
            let sensitive = self.schema.fields.get(key).is_some_and(|e| e.sensitive);
            if sensitive && !include_sensitive {
                continue;
            }
            record.insert(key.clone(), value.to_json());
        }
        let bytes = serde_json::to_vec_pretty(&record)?;
        atomic_write(path, &bytes)
    }

    /// Load a previously exported snapshot from `path` and apply it.
    ///
    /// # Errors
    /// Returns [`ConfigError::SchemaValidation`] if the merged/replaced view
    /// is invalid.
    pub fn import(&self, path: &Path, mode: ImportMode) -> ConfigResult<()> {
        let bytes = std::fs::read(path)?;
        let value: Value = serde_json::from_slice(&bytes)?;
        let record = value.as_object().cloned().unwrap_or_default();

        let mut imported = BTreeMap::new();
        for (key, value) in &record {
            imported.insert(key.clone(), json_to_config_value(value)?);
        }

        let merged = match mode {
            ImportMode::Merge => {
                let mut merged = self.get_all();
                merged.extend(imported);
                merged
            },
            ImportMode::Replace => {
                let mut defaults = self.schema.defaults();
                defaults.extend(imported);
                defaults
            },
        };

        self.schema.validate_all(&merged)?;
        {
            let mut values = self.values.write().unwrap_or_else(|e| e.into_inner());
            *values = merged;
        }
        self.persist()
    }

    /// Restore the built-in default record and persist it.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] on persist failure.
    pub fn reset(&self) -> ConfigResult<()> {
        {
            let mut values = self.values.write().unwrap_or_else(|e| e.into_inner());
            *values = self.schema.defaults();
        }
        self.persist()
    }

    /// Validate the current in-memory record against the schema.
    ///
    /// # Errors
    /// Returns [`ConfigError::SchemaValidation`] if any field is invalid.
    pub fn validate(&self) -> ConfigResult<()> {
        self.schema.validate_all(&self.get_all())
    }

    /// The running schema.
    #[must_use]
    pub fn schema(&self) -> &ConfigSchema {
        &self.schema
    }
}

/// A scoped batch of `set` calls that commits atomically on normal scope
/// exit, or rolls back to the pre-transaction snapshot on explicit
/// [`Transaction::abort`] or an unwinding panic.
pub struct Transaction<'a> {
    store: &'a ConfigStore,
    snapshot: BTreeMap<String, ConfigValue>,
    pending: BTreeMap<String, ConfigValue>,
    finalized: bool,
}

impl Transaction<'_> {
    /// Stage a key/value change. Not visible to readers until commit.
    pub fn set(&mut self, key: impl Into<String>, value: ConfigValue) {
        self.pending.insert(key.into(), value);
    }

    /// Validate the merged view and persist it. No-op if already finalized.
    ///
    /// # Errors
    /// Returns [`ConfigError::SchemaValidation`] if the merged view is invalid.
    pub fn commit(mut self) -> ConfigResult<()> {
        self.finalized = true;
        if self.pending.is_empty() {
            return Ok(());
        }
        let mut merged = self.snapshot.clone();
        merged.extend(self.pending.clone());
        self.store.update(merged.clone().into_iter().collect())
    }

    /// Discard all staged changes without persisting anything.
    pub fn abort(mut self) {
        self.finalized = true;
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if self.finalized {
            return;
        }
        if std::thread::panicking() {
            // Roll back: drop the pending changes without applying them.
            return;
        }
        if self.pending.is_empty() {
            return;
        }
        let mut merged = self.snapshot.clone();
        merged.extend(self.pending.clone());
        if let Err(e) = self.store.update(merged.into_iter().collect()) {
            warn!(error = %e, "transaction auto-commit on scope exit failed");
        }
    }
}

fn json_to_config_value(value: &Value) -> ConfigResult<ConfigValue> {
    match value {
        Value::Bool(b) => Ok(ConfigValue::Bool(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(ConfigValue::Int(i))
            } else if let Some(f) = n.as_f64() {
                Ok(ConfigValue::Float(f))
            } else {
                Err(ConfigError::Corruption(format!("unrepresentable number: {n}")))
            }
        },
        Value::String(s) => Ok(ConfigValue::String(s.clone())),
        other => Err(ConfigError::Corruption(format!("unsupported value shape: {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::default_schema;

    fn open_store(dir: &Path) -> ConfigStore {
        ConfigStore::open(dir, StorageBackend::Json, default_schema()).unwrap()
    }

    #[test]
    fn loads_defaults_on_first_open() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(dir.path());
        assert_eq!(store.get("theme"), Some(ConfigValue::String("system".into())));
    }

    #[test]
    fn set_persists_and_reopens() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = open_store(dir.path());
            store.set("theme", ConfigValue::String("dark".into())).unwrap();
        }
        let reopened = open_store(dir.path());
        assert_eq!(reopened.get("theme"), Some(ConfigValue::String("dark".into())));
    }

    #[test]
    fn set_rejects_invalid_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(dir.path());
        let err = store.set("font_size", ConfigValue::Int(1)).unwrap_err();
        assert!(matches!(err, ConfigError::SchemaValidation(_)));
    }

    #[test]
    fn sensitive_field_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = open_store(dir.path());
            store.set("openai_api_key", ConfigValue::String("sk-abc123".into())).unwrap();
        }
        let reopened = open_store(dir.path());
        assert_eq!(reopened.get("openai_api_key"), Some(ConfigValue::String("sk-abc123".into())));

        let raw = std::fs::read_to_string(dir.path().join("config.json")).unwrap();
        assert!(!raw.contains("sk-abc123"));
    }

    #[test]
    fn transaction_commits_on_scope_exit() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(dir.path());
        {
            let mut txn = store.transaction();
            txn.set("theme", ConfigValue::String("dark".into()));
        }
        assert_eq!(store.get("theme"), Some(ConfigValue::String("dark".into())));
    }

    #[test]
    fn transaction_abort_discards_changes() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(dir.path());
        let mut txn = store.transaction();
        txn.set("theme", ConfigValue::String("dark".into()));
        txn.abort();
        assert_eq!(store.get("theme"), Some(ConfigValue::String("system".into())));
    }

    #[test]
    fn corrupted_file_recovers_from_backup() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = open_store(dir.path());
            store.set("theme", ConfigValue::String("dark".into())).unwrap();
        }
        std::fs::write(dir.path().join("config.json"), b"not even json").unwrap();

        let recovered = open_store(dir.path());
        assert_eq!(recovered.get("theme"), Some(ConfigValue::String("dark".into())));
    }

    #[test]
    fn export_omits_sensitive_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(dir.path());
        store.set("openai_api_key", ConfigValue::String("sk-abc".into())).unwrap();

        let export_path = dir.path().join("export.json");
        store.export(&export_path, false).unwrap();
        let raw = std::fs::read_to_string(&export_path).unwrap();
        assert!(!raw.contains("openai_api_key"));
    }

    #[test]
    fn import_replace_fills_missing_required_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(dir.path());

        let import_path = dir.path().join("import.json");
        std::fs::write(&import_path, r#"{"theme": "dark"}"#).unwrap();
        store.import(&import_path, ImportMode::Replace).unwrap();

        assert_eq!(store.get("theme"), Some(ConfigValue::String("dark".into())));
        assert_eq!(store.get("font_size"), Some(ConfigValue::Int(14)));
    }

    #[test]
    fn reset_restores_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(dir.path());
        store.set("theme", ConfigValue::String("dark".into())).unwrap();
        store.reset().unwrap();
        assert_eq!(store.get("theme"), Some(ConfigValue::String("system".into())));
    }
}
