//! SHA-256 integrity checksum over the canonical (sorted-key) JSON rendering
//! of a configuration record.

use std::collections::BTreeMap;

use sha2::{Digest, Sha256};

use crate::types::ConfigValue;

/// Compute the checksum over `values`, excluding the reserved
/// `schema_version`/`_checksum` keys.
#[must_use]
pub fn compute(values: &BTreeMap<String, ConfigValue>) -> String {
    let canonical: BTreeMap<&String, serde_json::Value> = values
        .iter()
        .filter(|(k, _)| k.as_str() != "_checksum" && k.as_str() != "schema_version")
        .map(|(k, v)| (k, v.to_json()))
        .collect();

    let serialized = serde_json::to_vec(&canonical).unwrap_or_default();
    let digest = Sha256::digest(&serialized);
    hex::encode(digest)
}

/// Verify `expected` matches the checksum recomputed over `values`.
#[must_use]
pub fn verify(values: &BTreeMap<String, ConfigValue>, expected: &str) -> bool {
    compute(values) == expected
}

mod hex {
    pub(super) fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{b:02x}")).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum_is_stable_across_insertion_order() {
        let mut a = BTreeMap::new();
        a.insert("theme".to_string(), ConfigValue::String("dark".into()));
        a.insert("font_size".to_string(), ConfigValue::Int(14));

        let mut b = BTreeMap::new();
        b.insert("font_size".to_string(), ConfigValue::Int(14));
        b.insert("theme".to_string(), ConfigValue::String("dark".into()));

        assert_eq!(compute(&a), compute(&b));
    }

    #[test]
    fn checksum_changes_with_value() {
        let mut a = BTreeMap::new();
        a.insert("font_size".to_string(), ConfigValue::Int(14));
        let mut b = a.clone();
        b.insert("font_size".to_string(), ConfigValue::Int(15));
        assert_ne!(compute(&a), compute(&b));
    }

    #[test]
    fn verify_rejects_tampering() {
        let mut values = BTreeMap::new();
        values.insert("font_size".to_string(), ConfigValue::Int(14));
        let checksum = compute(&values);
        values.insert("font_size".to_string(), ConfigValue::Int(99));
        assert!(!verify(&values, &checksum));
    }
}
