//! Storage back-ends and the atomic write path shared by all of them.
//!
//! Three interchangeable encodings of the same record shape (a flat
//! string-keyed map of scalars plus the two reserved keys). Atomicity,
//! checksum placement, and backup rotation are identical across all three;
//! only the on-disk byte format differs.

use std::path::Path;

use serde_json::{Map, Value};

use crate::error::ConfigResult;

/// Which on-disk encoding a configuration store uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// A single JSON file.
    Json,
    /// A single YAML file.
    Yaml,
    /// A minimal two-column (key, value) table, physically a JSON-lines
    /// file (one `{"key": ..., "value": ...}` row per field) under the same
    /// atomic-write envelope as the other two backends. This workspace has
    /// no `libsqlite3` dependency available, so the relational back-end's
    /// *semantics* (atomicity via rename, not via a SQL transaction) are
    /// honored without a native SQL engine.
    Sqlite,
}

impl StorageBackend {
    /// File extension used for the live file and backup names.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Sqlite => "sqlite.jsonl",
        }
    }

    /// Serialize a flat JSON object record to this backend's on-disk bytes.
    ///
    /// # Errors
    /// Returns [`crate::ConfigError`] if `record` is not a JSON object or
    /// encoding fails.
    pub fn encode(self, record: &Map<String, Value>) -> ConfigResult<Vec<u8>> {
        match self {
            Self::Json => Ok(serde_json::to_vec_pretty(record)?),
            Self::Yaml => Ok(serde_yaml::to_string(record)?.into_bytes()),
            Self::Sqlite => {
                let mut out = String::new();
                for (key, value) in record {
                    let row = serde_json::json!({ "key": key, "value": value });
                    out.push_str(&serde_json::to_string(&row)?);
                    out.push('\n');
                }
                Ok(out.into_bytes())
            },
        }
    }

    /// Parse this backend's on-disk bytes back into a flat JSON object record.
    ///
    /// # Errors
    /// Returns [`crate::ConfigError`] if the bytes are not valid for this
    /// backend's encoding.
    pub fn decode(self, bytes: &[u8]) -> ConfigResult<Map<String, Value>> {
        match self {
            Self::Json => {
                let value: Value = serde_json::from_slice(bytes)?;
                Ok(value.as_object().cloned().unwrap_or_default())
            },
            Self::Yaml => {
                let value: Value = serde_yaml::from_slice(bytes)?;
                Ok(value.as_object().cloned().unwrap_or_default())
            },
            Self::Sqlite => {
                let text = String::from_utf8_lossy(bytes);
                let mut map = Map::new();
                for line in text.lines().filter(|l| !l.trim().is_empty()) {
                    let row: Value = serde_json::from_str(line)?;
                    if let (Some(key), Some(value)) = (row.get("key"), row.get("value")) {
                        if let Some(key) = key.as_str() {
                            map.insert(key.to_string(), value.clone());
                        }
                    }
                }
                Ok(map)
            },
        }
    }
}

/// Write `bytes` to `path` atomically: write to a sibling temp file, fsync,
/// then rename over the target. The rename is atomic on POSIX and NTFS
/// within the same filesystem.
///
/// # Errors
/// Returns [`crate::ConfigError::Io`] if any step fails.
pub fn atomic_write(path: &Path, bytes: &[u8]) -> ConfigResult<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)?;

    let temp_path = path.with_extension(format!(
        "{}.tmp",
        path.extension().and_then(|e| e.to_str()).unwrap_or("tmp")
    ));

    {
        let file = std::fs::File::create(&temp_path)?;
        let mut writer = std::io::BufWriter::new(&file);
        std::io::Write::write_all(&mut writer, bytes)?;
        std::io::Write::flush(&mut writer)?;
        file.sync_all()?;
    }

    std::fs::rename(&temp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_round_trips() {
        let mut record = Map::new();
        record.insert("theme".to_string(), Value::String("dark".into()));
        let encoded = StorageBackend::Json.encode(&record).unwrap();
        let decoded = StorageBackend::Json.decode(&encoded).unwrap();
        assert_eq!(record, decoded);
    }

    #[test]
    fn yaml_round_trips() {
        let mut record = Map::new();
        record.insert("font_size".to_string(), Value::Number(14.into()));
        let encoded = StorageBackend::Yaml.encode(&record).unwrap();
        let decoded = StorageBackend::Yaml.decode(&encoded).unwrap();
        assert_eq!(record, decoded);
    }

    #[test]
    fn sqlite_backend_round_trips() {
        let mut record = Map::new();
        record.insert("theme".to_string(), Value::String("dark".into()));
        record.insert("font_size".to_string(), Value::Number(14.into()));
        let encoded = StorageBackend::Sqlite.encode(&record).unwrap();
        let decoded = StorageBackend::Sqlite.decode(&encoded).unwrap();
        assert_eq!(record, decoded);
    }

    #[test]
    fn atomic_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        atomic_write(&path, b"hello").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"hello");
    }
}
