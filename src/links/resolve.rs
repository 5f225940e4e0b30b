//! Link tree resolution.

use crate::env::EnvSource;
use crate::error::ConfigError;
use crate::value::{ConfigValue, Map};
use crate::warn::{LinkWarning, WarningKind, WarningSink};

use super::descriptor::{LinkDescriptor, LinkSpec, LinkType};

/// Resolve a link specification tree into a partial snapshot.
///
/// Required links with unset variables fail the whole resolution; optional
/// links warn and either apply their default or drop out of the result.
/// Container branches that resolved no field at all are pruned, unlike the
/// override layer, which keeps visited branches as placeholders.
pub fn resolve_links(
    env: &dyn EnvSource,
    warnings: &dyn WarningSink,
    spec: &LinkSpec,
    label: &str,
) -> Result<ConfigValue, ConfigError> {
    let mut path = Vec::new();
    let resolved = walk_spec(env, warnings, spec, label, &mut path)?;
    Ok(resolved.unwrap_or_else(ConfigValue::empty))
}

fn walk_spec(
    env: &dyn EnvSource,
    warnings: &dyn WarningSink,
    spec: &LinkSpec,
    label: &str,
    path: &mut Vec<String>,
) -> Result<Option<ConfigValue>, ConfigError> {
    match spec {
        LinkSpec::Leaf(descriptor) => resolve_leaf(env, warnings, descriptor, label, path),
        LinkSpec::Tree(children) => {
            let mut resolved = Map::new();
            for (key, child) in children {
                path.push(key.clone());
                let value = walk_spec(env, warnings, child, label, path);
                path.pop();
                if let Some(value) = value? {
                    resolved.insert(key.clone(), value);
                }
            }
            if resolved.is_empty() {
                Ok(None)
            } else {
                Ok(Some(ConfigValue::Object(resolved)))
            }
        }
    }
}

fn resolve_leaf(
    env: &dyn EnvSource,
    warnings: &dyn WarningSink,
    descriptor: &LinkDescriptor,
    label: &str,
    path: &[String],
) -> Result<Option<ConfigValue>, ConfigError> {
    let field = path.join(".");

    let Some(raw) = env.var(&descriptor.variable) else {
        if descriptor.required {
            return Err(ConfigError::MissingRequiredEnv {
                label: label.to_string(),
                field,
                variable: descriptor.variable.clone(),
            });
        }
        return Ok(match &descriptor.default {
            Some(default) => {
                warnings.emit(&LinkWarning {
                    label: label.to_string(),
                    field,
                    variable: descriptor.variable.clone(),
                    kind: WarningKind::DefaultApplied(default.clone()),
                });
                Some(default.clone())
            }
            None => {
                warnings.emit(&LinkWarning {
                    label: label.to_string(),
                    field,
                    variable: descriptor.variable.clone(),
                    kind: WarningKind::LeftUnbound,
                });
                None
            }
        });
    };

    let value = match descriptor.value_type {
        LinkType::String => ConfigValue::String(raw),
        LinkType::Number => ConfigValue::Number(raw.trim().parse().unwrap_or(f64::NAN)),
        LinkType::Json => {
            ConfigValue::from_json_str(&raw).map_err(|source| ConfigError::ParseError {
                label: label.to_string(),
                field,
                variable: descriptor.variable.clone(),
                source,
            })?
        }
        LinkType::Function => match &descriptor.transform {
            Some(transform) => transform(&raw),
            None => {
                return Err(ConfigError::MisconfiguredLink {
                    label: label.to_string(),
                    field,
                    variable: descriptor.variable.clone(),
                })
            }
        },
    };
    Ok(Some(value))
}
