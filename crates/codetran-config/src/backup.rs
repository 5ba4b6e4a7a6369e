//! Timestamped backup rotation: before each write, copy the current file
//! into `backups/`, trimmed to the ten most recent entries.

use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::error::ConfigResult;

const MAX_BACKUPS: usize = 10;

/// Copy `live_file` into `backup_dir` under a monotonic timestamped name,
/// then trim `backup_dir` to the ten most recent entries.
///
/// # Errors
/// Returns [`crate::ConfigError::Io`] if the copy or directory listing fails.
pub fn create_backup(live_file: &Path, backup_dir: &Path, extension: &str) -> ConfigResult<()> {
    if !live_file.exists() {
        return Ok(());
    }
    std::fs::create_dir_all(backup_dir)?;

    let timestamp = Utc::now().format("%Y%m%d_%H%M%S%.f");
    let name = format!("config_backup_{timestamp}.{extension}");
    std::fs::copy(live_file, backup_dir.join(name))?;

    cleanup_old_backups(backup_dir)
}

/// Delete all but the `MAX_BACKUPS` most recently modified files in `backup_dir`.
///
/// # Errors
/// Returns [`crate::ConfigError::Io`] if the directory cannot be listed.
pub fn cleanup_old_backups(backup_dir: &Path) -> ConfigResult<()> {
    let mut entries = list_backups(backup_dir)?;
    if entries.len() <= MAX_BACKUPS {
        return Ok(());
    }
    entries.sort_by_key(|(_, modified)| std::cmp::Reverse(*modified));
    for (path, _) in entries.into_iter().skip(MAX_BACKUPS) {
        let _ = std::fs::remove_file(path);
    }
    Ok(())
}

/// List backup files newest-first.
///
/// # Errors
/// Returns [`crate::ConfigError::Io`] if `backup_dir` cannot be read.
pub fn list_backups_newest_first(backup_dir: &Path) -> ConfigResult<Vec<PathBuf>> {
    let mut entries = list_backups(backup_dir)?;
    entries.sort_by_key(|(_, modified)| std::cmp::Reverse(*modified));
    Ok(entries.into_iter().map(|(path, _)| path).collect())
}

fn list_backups(backup_dir: &Path) -> ConfigResult<Vec<(PathBuf, std::time::SystemTime)>> {
    if !backup_dir.exists() {
        return Ok(Vec::new());
    }
    let mut result = Vec::new();
    for entry in std::fs::read_dir(backup_dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() {
            let modified = entry.metadata()?.modified()?;
            result.push((path, modified));
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotates_to_ten_most_recent() {
        let dir = tempfile::tempdir().unwrap();
        let live = dir.path().join("config.json");
        let backups = dir.path().join("backups");

        for i in 0..15 {
            std::fs::write(&live, format!("{{\"n\":{i}}}")).unwrap();
            create_backup(&live, &backups, "json").unwrap();
            std::thread::sleep(std::time::Duration::from_millis(2));
        }

        let listed = list_backups_newest_first(&backups).unwrap();
        assert_eq!(listed.len(), 10);
    }

    #[test]
    fn no_op_when_live_file_absent() {
        let dir = tempfile::tempdir().unwrap();
        let live = dir.path().join("missing.json");
        let backups = dir.path().join("backups");
        create_backup(&live, &backups, "json").unwrap();
        assert!(!backups.exists());
    }
}
