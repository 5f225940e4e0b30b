//! ISO-8601 date revival for parsed JSON values.
//!
//! JSON has no date type, so serialized instants travel as strings. When a
//! parsed string looks like `2020-05-15T10:30:00.000Z` it is revived into a
//! `ConfigValue::Date`; everything else passes through unchanged.

use chrono::{DateTime, Utc};
use regex_lite::Regex;
use std::sync::OnceLock;

use super::tree::{ConfigValue, Map};

/// Year, month, day, `T`, time to millisecond precision, `Z`.
const DATE_PATTERN: &str = r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{3}Z$";

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(DATE_PATTERN).unwrap())
}

/// A candidate must sit strictly between 15 and 30 characters and match the
/// serialized-date shape.
fn is_serialized_date(text: &str) -> bool {
    text.len() > 15 && text.len() < 30 && date_pattern().is_match(text)
}

/// Convert a parsed JSON value into a `ConfigValue`, reviving date-shaped
/// strings anywhere in the structure.
pub(crate) fn revive(value: serde_json::Value) -> ConfigValue {
    convert(value, true)
}

/// Shared conversion from `serde_json::Value`. With `revive_dates` unset,
/// strings pass through verbatim (the structural `From` path).
pub(crate) fn convert(value: serde_json::Value, revive_dates: bool) -> ConfigValue {
    match value {
        serde_json::Value::Null => ConfigValue::Null,
        serde_json::Value::Bool(value) => ConfigValue::Bool(value),
        serde_json::Value::Number(value) => {
            ConfigValue::Number(value.as_f64().unwrap_or(f64::NAN))
        }
        serde_json::Value::String(text) => {
            if revive_dates && is_serialized_date(&text) {
                // A string can match the shape but still name an impossible
                // instant (month 13); such strings stay strings.
                match DateTime::parse_from_rfc3339(&text) {
                    Ok(instant) => ConfigValue::Date(instant.with_timezone(&Utc)),
                    Err(_) => ConfigValue::String(text),
                }
            } else {
                ConfigValue::String(text)
            }
        }
        serde_json::Value::Array(items) => ConfigValue::Array(
            items
                .into_iter()
                .map(|item| convert(item, revive_dates))
                .collect(),
        ),
        serde_json::Value::Object(fields) => {
            let converted: Map = fields
                .into_iter()
                .map(|(key, value)| (key, convert(value, revive_dates)))
                .collect();
            ConfigValue::Object(converted)
        }
    }
}
