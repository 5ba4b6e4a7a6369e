//! Scalar value type, per-field schema entries, and the built-in schema.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use crate::error::{ConfigError, ConfigResult};

/// A single configuration value. Scalars only — no nested objects/arrays,
/// matching the base record's "map from string keys to scalar values" shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// Boolean flag.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Floating point.
    Float(f64),
    /// UTF-8 string.
    String(String),
}

impl ConfigValue {
    fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
        }
    }

    /// Numeric value as `f64`, for min/max comparisons across int and float.
    fn as_numeric(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Bool(_) | Self::String(_) => None,
        }
    }

    /// Canonical string rendering, used for enum-membership comparisons.
    fn as_comparable_string(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
        }
    }

    pub(crate) fn to_json(&self) -> Json {
        match self {
            Self::Bool(b) => Json::Bool(*b),
            Self::Int(i) => Json::Number((*i).into()),
            Self::Float(f) => serde_json::Number::from_f64(*f).map_or(Json::Null, Json::Number),
            Self::String(s) => Json::String(s.clone()),
        }
    }
}

/// The declared scalar type for a field, independent of any concrete value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarType {
    /// `bool`.
    Bool,
    /// `int`.
    Int,
    /// `float`.
    Float,
    /// `string`.
    String,
}

impl ScalarType {
    fn matches(self, value: &ConfigValue) -> bool {
        matches!(
            (self, value),
            (Self::Bool, ConfigValue::Bool(_))
                | (Self::Int, ConfigValue::Int(_))
                | (Self::Float, ConfigValue::Float(_))
                | (Self::String, ConfigValue::String(_))
        )
    }
}

/// Declares the shape and constraints of one configuration field.
#[derive(Debug, Clone)]
pub struct SchemaEntry {
    /// Declared scalar type.
    pub scalar_type: ScalarType,
    /// Whether the field must be present.
    pub required: bool,
    /// Inclusive lower bound, for numeric fields.
    pub min: Option<f64>,
    /// Inclusive upper bound, for numeric fields.
    pub max: Option<f64>,
    /// Allowed values, for enumerated fields.
    pub allowed: Option<Vec<String>>,
    /// Whether this field is encrypted at rest and elided from
    /// non-sensitive exports.
    pub sensitive: bool,
    /// Default value used by `reset()` and to fill omitted required
    /// fields on `import(..., mode = Replace)`.
    pub default: ConfigValue,
}

impl SchemaEntry {
    /// Validate `value` against this entry's type/min/max/enum constraints.
    ///
    /// # Errors
    /// Returns a human-readable description of the first violated constraint.
    pub fn validate(&self, field: &str, value: &ConfigValue) -> Result<(), String> {
        if !self.scalar_type.matches(value) {
            return Err(format!(
                "{field}: expected {:?}, got {}",
                self.scalar_type,
                value.type_name()
            ));
        }
        if let Some(min) = self.min {
            if let Some(n) = value.as_numeric() {
                if n < min {
                    return Err(format!("{field}: {n} is below minimum {min}"));
                }
            }
        }
        if let Some(max) = self.max {
            if let Some(n) = value.as_numeric() {
                if n > max {
                    return Err(format!("{field}: {n} is above maximum {max}"));
                }
            }
        }
        if let Some(allowed) = &self.allowed {
            let rendered = value.as_comparable_string();
            if !allowed.iter().any(|a| a == &rendered) {
                return Err(format!("{field}: {rendered:?} not in allowed set {allowed:?}"));
            }
        }
        Ok(())
    }
}

/// The full field-name -> schema-entry map plus the version this schema
/// corresponds to on disk.
#[derive(Debug, Clone)]
pub struct ConfigSchema {
    /// Schema version. Bumped whenever fields are added, removed, or
    /// re-typed in an incompatible way.
    pub version: u32,
    /// Field definitions.
    pub fields: BTreeMap<String, SchemaEntry>,
}

impl ConfigSchema {
    /// Validate every `(key, value)` pair in `values`, and confirm every
    /// required field is present. Returns every offending field, not just
    /// the first.
    pub(crate) fn validate_all(&self, values: &BTreeMap<String, ConfigValue>) -> ConfigResult<()> {
        let mut errors = Vec::new();

        for (name, entry) in &self.fields {
            match values.get(name) {
                Some(value) => {
                    if let Err(e) = entry.validate(name, value) {
                        errors.push(e);
                    }
                },
                None if entry.required => {
                    errors.push(format!("{name}: required field is missing"));
                },
                None => {},
            }
        }

        for key in values.keys() {
            if !self.fields.contains_key(key) {
                errors.push(format!("{key}: not declared in schema"));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::SchemaValidation(errors))
        }
    }

    /// The default record: every field set to its schema default.
    pub(crate) fn defaults(&self) -> BTreeMap<String, ConfigValue> {
        self.fields
            .iter()
            .map(|(name, entry)| (name.clone(), entry.default.clone()))
            .collect()
    }

    /// Look up a field's schema entry.
    ///
    /// # Errors
    /// Returns [`ConfigError::UnknownKey`] if `key` is not declared.
    pub fn entry(&self, key: &str) -> ConfigResult<&SchemaEntry> {
        self.fields.get(key).ok_or_else(|| ConfigError::UnknownKey(key.to_string()))
    }
}

macro_rules! field {
    ($map:ident, $name:expr, $ty:ident, $required:expr, $min:expr, $max:expr, $allowed:expr, $sensitive:expr, $default:expr) => {
        $map.insert(
            $name.to_string(),
            SchemaEntry {
                scalar_type: ScalarType::$ty,
                required: $required,
                min: $min,
                max: $max,
                allowed: $allowed,
                sensitive: $sensitive,
                default: $default,
            },
        );
    };
}

/// The built-in default schema: window/editor preferences, provider
/// selection, and per-provider API credentials.
#[must_use]
pub fn default_schema() -> ConfigSchema {
    let mut fields = BTreeMap::new();

    field!(fields, "window_opacity", Float, false, Some(0.0), Some(1.0), None, false, ConfigValue::Float(1.0));
    field!(
        fields,
        "theme",
        String,
        true,
        None,
        None,
        Some(vec!["light".into(), "dark".into(), "system".into()]),
        false,
        ConfigValue::String("system".into())
    );
    field!(fields, "start_minimized", Bool, false, None, None, None, false, ConfigValue::Bool(false));
    field!(fields, "auto_detect_language", Bool, false, None, None, None, false, ConfigValue::Bool(true));
    field!(fields, "save_history", Bool, false, None, None, None, false, ConfigValue::Bool(true));
    field!(fields, "history_limit", Int, false, Some(0.0), Some(10000.0), None, false, ConfigValue::Int(100));
    field!(fields, "font_size", Int, true, Some(8.0), Some(32.0), None, false, ConfigValue::Int(14));
    field!(fields, "show_line_numbers", Bool, false, None, None, None, false, ConfigValue::Bool(true));
    field!(fields, "word_wrap", Bool, false, None, None, None, false, ConfigValue::Bool(true));
    field!(
        fields,
        "preferred_provider",
        String,
        false,
        None,
        None,
        Some(vec!["openai".into(), "anthropic".into(), "google".into(), "offline".into(), "auto".into()]),
        false,
        ConfigValue::String("auto".into())
    );
    field!(fields, "translation_timeout", Int, false, Some(1.0), Some(300.0), None, false, ConfigValue::Int(30));
    field!(fields, "openai_api_key", String, false, None, None, None, true, ConfigValue::String(String::new()));
    field!(fields, "anthropic_api_key", String, false, None, None, None, true, ConfigValue::String(String::new()));
    field!(fields, "google_api_key", String, false, None, None, None, true, ConfigValue::String(String::new()));
    field!(fields, "copy_on_translate", Bool, false, None, None, None, false, ConfigValue::Bool(false));
    field!(fields, "clear_output_on_input_change", Bool, false, None, None, None, false, ConfigValue::Bool(true));
    field!(fields, "cache_translations", Bool, false, None, None, None, false, ConfigValue::Bool(true));
    field!(fields, "max_cache_size", Int, false, Some(1.0), Some(10000.0), None, false, ConfigValue::Int(100));
    field!(
        fields,
        "log_level",
        String,
        false,
        None,
        None,
        Some(vec!["trace".into(), "debug".into(), "info".into(), "warn".into(), "error".into()]),
        false,
        ConfigValue::String("info".into())
    );

    ConfigSchema { version: 1, fields }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_schema_satisfies_its_own_required_fields() {
        let schema = default_schema();
        let defaults = schema.defaults();
        assert!(schema.validate_all(&defaults).is_ok());
    }

    #[test]
    fn rejects_out_of_range() {
        let schema = default_schema();
        let mut values = schema.defaults();
        values.insert("font_size".into(), ConfigValue::Int(999));
        let err = schema.validate_all(&values).unwrap_err();
        assert!(matches!(err, ConfigError::SchemaValidation(_)));
    }

    #[test]
    fn rejects_unknown_enum_value() {
        let schema = default_schema();
        let mut values = schema.defaults();
        values.insert("theme".into(), ConfigValue::String("neon".into()));
        assert!(schema.validate_all(&values).is_err());
    }
}
