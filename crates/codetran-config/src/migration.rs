//! Schema migration table: from-version -> to-version transform functions.

use std::collections::BTreeMap;

use crate::types::ConfigValue;

/// A single registered migration step.
pub struct ConfigMigration {
    /// Version migrated from.
    pub from: u32,
    /// Version migrated to.
    pub to: u32,
    /// The transform itself, applied in place.
    pub apply: fn(&mut BTreeMap<String, ConfigValue>),
}

/// An ordered table of migrations, searched for an exact `from` match.
#[derive(Default)]
pub struct MigrationTable {
    migrations: Vec<ConfigMigration>,
}

impl MigrationTable {
    /// An empty table.
    #[must_use]
    pub fn new() -> Self {
        Self { migrations: Vec::new() }
    }

    /// Register a migration step.
    pub fn register(&mut self, migration: ConfigMigration) {
        self.migrations.push(migration);
    }

    /// Find a migration whose `from` matches `version`.
    #[must_use]
    pub fn find(&self, version: u32) -> Option<&ConfigMigration> {
        self.migrations.iter().find(|m| m.from == version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_registered_migration() {
        let mut table = MigrationTable::new();
        table.register(ConfigMigration { from: 1, to: 2, apply: |_| {} });
        assert!(table.find(1).is_some());
        assert!(table.find(2).is_none());
    }
}
