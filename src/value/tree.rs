//! The `ConfigValue` tree and its conversion/access surface.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

use super::revive;

/// Keyed container node of a [`ConfigValue`] tree.
///
/// A `BTreeMap` keeps field iteration deterministic, which keeps merge
/// results and test assertions stable.
pub type Map = BTreeMap<String, ConfigValue>;

/// One node of a configuration snapshot.
///
/// `Object` is the only container the resolvers recurse into; every other
/// variant (including `Array`) is treated as a leaf and replaced wholesale
/// when a higher-precedence layer touches it.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Null,
    Bool(bool),
    /// Numbers are `f64` so a permissive numeric coercion can carry a
    /// not-a-number sentinel through the pipeline.
    Number(f64),
    String(String),
    /// An instant revived from an ISO-8601 string during JSON parsing.
    Date(DateTime<Utc>),
    Array(Vec<ConfigValue>),
    Object(Map),
}

impl ConfigValue {
    /// Empty object node, the identity element for merging.
    pub fn empty() -> Self {
        ConfigValue::Object(Map::new())
    }

    /// Parse JSON text into a value tree, reviving ISO-8601 date strings
    /// anywhere in the parsed structure.
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        let parsed: serde_json::Value = serde_json::from_str(text)?;
        Ok(revive::revive(parsed))
    }

    /// Render back to a `serde_json::Value`. Dates become ISO-8601 strings
    /// with millisecond precision; integral numbers render without a
    /// fractional part.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            ConfigValue::Null => serde_json::Value::Null,
            ConfigValue::Bool(value) => serde_json::Value::Bool(*value),
            ConfigValue::Number(value) => number_to_json(*value),
            ConfigValue::String(value) => serde_json::Value::String(value.clone()),
            ConfigValue::Date(value) => serde_json::Value::String(format_date(value)),
            ConfigValue::Array(items) => {
                serde_json::Value::Array(items.iter().map(ConfigValue::to_json).collect())
            }
            ConfigValue::Object(fields) => serde_json::Value::Object(
                fields
                    .iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
        }
    }

    /// Get a nested value by dot-separated path.
    pub fn get(&self, path: &str) -> Option<&ConfigValue> {
        let mut current = self;
        for part in path.split('.') {
            match current {
                ConfigValue::Object(fields) => current = fields.get(part)?,
                _ => return None,
            }
        }
        Some(current)
    }

    /// Mutable access to a nested value by dot-separated path.
    pub fn get_mut(&mut self, path: &str) -> Option<&mut ConfigValue> {
        let mut current = self;
        for part in path.split('.') {
            match current {
                ConfigValue::Object(fields) => current = fields.get_mut(part)?,
                _ => return None,
            }
        }
        Some(current)
    }

    /// Set a nested value by dot-separated path, creating intermediate
    /// objects as needed. Replaces any non-object node along the way.
    pub fn set(&mut self, path: &str, value: impl Into<ConfigValue>) {
        let mut parts: Vec<&str> = path.split('.').collect();
        let last = match parts.pop() {
            Some(last) => last,
            None => return,
        };
        let mut current = self;
        for part in parts {
            if !current.is_object() {
                *current = ConfigValue::empty();
            }
            if let ConfigValue::Object(fields) = current {
                current = fields
                    .entry(part.to_string())
                    .or_insert_with(ConfigValue::empty);
            }
        }
        if !current.is_object() {
            *current = ConfigValue::empty();
        }
        if let ConfigValue::Object(fields) = current {
            fields.insert(last.to_string(), value.into());
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ConfigValue::Null)
    }

    pub fn is_object(&self) -> bool {
        matches!(self, ConfigValue::Object(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, ConfigValue::Array(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ConfigValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            ConfigValue::Date(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[ConfigValue]> {
        match self {
            ConfigValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            ConfigValue::Object(fields) => Some(fields),
            _ => None,
        }
    }
}

/// Format an instant the way the revival pattern expects it back.
pub(crate) fn format_date(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn number_to_json(value: f64) -> serde_json::Value {
    if value.fract() == 0.0 && value >= i64::MIN as f64 && value <= i64::MAX as f64 {
        serde_json::Value::Number(serde_json::Number::from(value as i64))
    } else {
        serde_json::Number::from_f64(value)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null)
    }
}

impl From<serde_json::Value> for ConfigValue {
    /// Structural conversion without date revival; strings stay strings.
    fn from(value: serde_json::Value) -> Self {
        revive::convert(value, false)
    }
}

impl From<&serde_json::Value> for ConfigValue {
    fn from(value: &serde_json::Value) -> Self {
        ConfigValue::from(value.clone())
    }
}

impl From<ConfigValue> for serde_json::Value {
    fn from(value: ConfigValue) -> Self {
        value.to_json()
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Bool(value)
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        ConfigValue::Number(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::Number(value as f64)
    }
}

impl From<i32> for ConfigValue {
    fn from(value: i32) -> Self {
        ConfigValue::Number(f64::from(value))
    }
}

impl From<u32> for ConfigValue {
    fn from(value: u32) -> Self {
        ConfigValue::Number(f64::from(value))
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::String(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::String(value)
    }
}

impl From<DateTime<Utc>> for ConfigValue {
    fn from(value: DateTime<Utc>) -> Self {
        ConfigValue::Date(value)
    }
}

impl Serialize for ConfigValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl fmt::Display for ConfigValue {
    /// Compact JSON rendering, dates as ISO-8601 strings.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_from_json_value_is_structural() {
        let value = ConfigValue::from(json!({
            "port": 8080,
            "name": "api",
            "debug": false,
            "nothing": null,
            "created": "2020-05-15T10:30:00.000Z",
            "nested": {"list": [1, 2]}
        }));

        assert_eq!(value.get("port").and_then(ConfigValue::as_f64), Some(8080.0));
        assert_eq!(value.get("name").and_then(ConfigValue::as_str), Some("api"));
        assert_eq!(value.get("debug").and_then(ConfigValue::as_bool), Some(false));
        assert!(value.get("nothing").is_some_and(ConfigValue::is_null));
        // No revival on the structural conversion path.
        assert_eq!(
            value.get("created").and_then(ConfigValue::as_str),
            Some("2020-05-15T10:30:00.000Z")
        );
        assert_eq!(
            value.get("nested.list").and_then(ConfigValue::as_array).map(|list| list.len()),
            Some(2)
        );
    }

    #[test]
    fn test_to_json_round_trip() {
        let original = json!({"a": {"b": [1, "two", true, null]}, "n": 1.5});
        let value = ConfigValue::from(original.clone());
        assert_eq!(value.to_json(), original);
    }

    #[test]
    fn test_to_json_renders_dates_as_iso_strings() {
        let instant = Utc.with_ymd_and_hms(2020, 5, 15, 10, 30, 0).unwrap();
        let value = ConfigValue::Date(instant);
        assert_eq!(value.to_json(), json!("2020-05-15T10:30:00.000Z"));
    }

    #[test]
    fn test_integral_numbers_render_without_fraction() {
        assert_eq!(ConfigValue::Number(9090.0).to_json(), json!(9090));
        assert_eq!(ConfigValue::Number(0.5).to_json(), json!(0.5));
    }

    #[test]
    fn test_get_missing_path() {
        let value = ConfigValue::from(json!({"a": {"b": 1}}));
        assert!(value.get("a.c").is_none());
        assert!(value.get("a.b.c").is_none());
    }

    #[test]
    fn test_set_creates_intermediate_objects() {
        let mut value = ConfigValue::empty();
        value.set("server.port", 9090);
        assert_eq!(value.get("server.port").and_then(ConfigValue::as_f64), Some(9090.0));

        value.set("server.host", "localhost");
        assert_eq!(value.get("server.host").and_then(ConfigValue::as_str), Some("localhost"));
        assert_eq!(value.get("server.port").and_then(ConfigValue::as_f64), Some(9090.0));
    }

    #[test]
    fn test_display_is_compact_json() {
        let value = ConfigValue::from(json!({"port": 8080}));
        assert_eq!(value.to_string(), r#"{"port":8080}"#);
    }
}
