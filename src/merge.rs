//! Deep merge across configuration layers.
//!
//! Merge semantics:
//! - Objects: deep-merge by key (recursive)
//! - Arrays: REPLACE (second wins entirely)
//! - Scalars: override (second wins)
//! - Null: override (null can override any value)

use crate::value::ConfigValue;

/// Deep merge two values; `overlay` has the higher precedence.
///
/// Pure and allocating: both inputs are consumed and a fresh tree comes
/// back. Untouched base fields survive unchanged.
pub fn deep_merge(base: ConfigValue, overlay: ConfigValue) -> ConfigValue {
    match (base, overlay) {
        // Both objects: deep merge
        (ConfigValue::Object(mut base_map), ConfigValue::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged = if let Some(base_value) = base_map.remove(&key) {
                    deep_merge(base_value, overlay_value)
                } else {
                    overlay_value
                };
                base_map.insert(key, merged);
            }
            ConfigValue::Object(base_map)
        }

        // Arrays: REPLACE (no concatenation)
        (ConfigValue::Array(_), overlay @ ConfigValue::Array(_)) => overlay,

        // Scalars and any other case: overlay wins
        (_, overlay) => overlay,
    }
}

/// Merge layers in order (first is base, last has highest precedence).
pub fn merge_layers(layers: Vec<ConfigValue>) -> ConfigValue {
    layers.into_iter().fold(ConfigValue::Null, deep_merge)
}
