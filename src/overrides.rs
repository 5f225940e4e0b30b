//! Convention-named environment overrides.
//!
//! The override layer mirrors the base structure: every leaf path derives a
//! variable name (`{prefix}{PATH_SEGMENTS_JOINED_BY_DOUBLE_UNDERSCORE}`),
//! and any such variable present in the environment contributes its
//! JSON-parsed value to the patch. Container branches recurse with the
//! derived name plus `__` as the extended prefix.
//!
//! Visited container branches stay in the patch even when no leaf under
//! them resolved; the link layer prunes instead. Both behaviors are locked
//! in by tests.

use crate::env::EnvSource;
use crate::error::ConfigError;
use crate::name::derive_var_name;
use crate::value::{ConfigValue, Map};

/// Build the override patch for `template` under `prefix`.
///
/// A present variable that fails to JSON-parse fails the whole resolution;
/// no partial patch escapes. Non-object templates yield an empty patch:
/// only keyed structures have derivable paths.
pub fn resolve_overrides(
    env: &dyn EnvSource,
    prefix: &str,
    template: &ConfigValue,
) -> Result<ConfigValue, ConfigError> {
    let mut patch = Map::new();
    if let ConfigValue::Object(fields) = template {
        walk_template(env, prefix, prefix, fields, &mut patch)?;
    }
    Ok(ConfigValue::Object(patch))
}

fn walk_template(
    env: &dyn EnvSource,
    bound_prefix: &str,
    name_prefix: &str,
    fields: &Map,
    patch: &mut Map,
) -> Result<(), ConfigError> {
    for (key, node) in fields {
        let name = derive_var_name(name_prefix, &[key]);
        match node {
            ConfigValue::Object(children) => {
                let child_prefix = format!("{name}__");
                let mut child_patch = Map::new();
                walk_template(env, bound_prefix, &child_prefix, children, &mut child_patch)?;
                patch.insert(key.clone(), ConfigValue::Object(child_patch));
            }
            _ => {
                if let Some(raw) = env.var(&name) {
                    let value = ConfigValue::from_json_str(&raw).map_err(|source| {
                        ConfigError::InvalidOverrideValue {
                            prefix: bound_prefix.to_string(),
                            variable: name.clone(),
                            source,
                        }
                    })?;
                    patch.insert(key.clone(), value);
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MapEnv;
    use serde_json::json;

    fn value(json: serde_json::Value) -> ConfigValue {
        ConfigValue::from(json)
    }

    #[test]
    fn test_simple_leaf_override() {
        let env = MapEnv::from_iter([("CONFIG_OVERRIDE_PORT", "9090")]);
        let template = value(json!({"port": 8080}));

        let patch = resolve_overrides(&env, "CONFIG_OVERRIDE_", &template).unwrap();
        assert_eq!(patch, value(json!({"port": 9090})));
    }

    #[test]
    fn test_nested_paths_join_with_double_underscore() {
        let env = MapEnv::from_iter([(
            "CONFIG_OVERRIDE_SOME_LIBRARY__DEEPER__KEY",
            "\"dsadsa\"",
        )]);
        let template = value(json!({
            "SomeLibrary": {"Deeper": {"key": "asdasd", "otherKey": "123123"}}
        }));

        let patch = resolve_overrides(&env, "CONFIG_OVERRIDE_", &template).unwrap();
        assert_eq!(
            patch,
            value(json!({"SomeLibrary": {"Deeper": {"key": "dsadsa"}}}))
        );
    }

    #[test]
    fn test_visited_containers_stay_as_placeholders() {
        let env = MapEnv::new();
        let template = value(json!({
            "accessCode": "123abc",
            "SomeLibrary": {"Deeper": {"key": "asdasd"}}
        }));

        let patch = resolve_overrides(&env, "CONFIG_OVERRIDE_", &template).unwrap();
        // Leaf keys with no variable set disappear; visited containers stay,
        // even empty.
        assert_eq!(patch, value(json!({"SomeLibrary": {"Deeper": {}}})));
    }

    #[test]
    fn test_string_overrides_must_be_quoted_json() {
        let env = MapEnv::from_iter([("CONFIG_OVERRIDE_ACCESS_CODE", "321cba")]);
        let template = value(json!({"accessCode": "123abc"}));

        let error = resolve_overrides(&env, "CONFIG_OVERRIDE_", &template).unwrap_err();
        match error {
            ConfigError::InvalidOverrideValue { prefix, variable, .. } => {
                assert_eq!(prefix, "CONFIG_OVERRIDE_");
                assert_eq!(variable, "CONFIG_OVERRIDE_ACCESS_CODE");
            }
            other => panic!("expected InvalidOverrideValue, got {other:?}"),
        }
    }

    #[test]
    fn test_nested_parse_failure_reports_bound_prefix() {
        let env = MapEnv::from_iter([("APP_DB__HOST", "not json")]);
        let template = value(json!({"db": {"host": "localhost"}}));

        let error = resolve_overrides(&env, "APP_", &template).unwrap_err();
        match error {
            ConfigError::InvalidOverrideValue { prefix, variable, .. } => {
                assert_eq!(prefix, "APP_");
                assert_eq!(variable, "APP_DB__HOST");
            }
            other => panic!("expected InvalidOverrideValue, got {other:?}"),
        }
    }

    #[test]
    fn test_null_base_leaves_are_overridable() {
        let env = MapEnv::from_iter([("CONFIG_OVERRIDE_NULL_THING", "42")]);
        let template = value(json!({"nullThing": null}));

        let patch = resolve_overrides(&env, "CONFIG_OVERRIDE_", &template).unwrap();
        assert_eq!(patch, value(json!({"nullThing": 42})));
    }

    #[test]
    fn test_array_leaves_replace_wholesale() {
        let env = MapEnv::from_iter([("CONFIG_OVERRIDE_HOSTS", "[\"a\",\"b\"]")]);
        let template = value(json!({"hosts": ["x"]}));

        let patch = resolve_overrides(&env, "CONFIG_OVERRIDE_", &template).unwrap();
        assert_eq!(patch, value(json!({"hosts": ["a", "b"]})));
    }

    #[test]
    fn test_override_values_revive_dates() {
        let env = MapEnv::from_iter([("CONFIG_OVERRIDE_LAUNCHED_AT", "\"2021-03-01T08:00:00.000Z\"")]);
        let template = value(json!({"launchedAt": null}));

        let patch = resolve_overrides(&env, "CONFIG_OVERRIDE_", &template).unwrap();
        assert!(patch.get("launchedAt").unwrap().as_date().is_some());
    }

    #[test]
    fn test_non_object_template_yields_empty_patch() {
        let env = MapEnv::from_iter([("CONFIG_OVERRIDE_", "1")]);
        let patch = resolve_overrides(&env, "CONFIG_OVERRIDE_", &value(json!(42))).unwrap();
        assert_eq!(patch, ConfigValue::empty());
    }
}
