//! Store construction.

use std::sync::Arc;

use crate::env::{EnvSource, ProcessEnv};
use crate::error::ConfigError;
use crate::overrides::resolve_overrides;
use crate::value::ConfigValue;
use crate::warn::{LogSink, WarningSink};

use super::{ConfigStore, DEFAULT_OVERRIDE_PREFIX};

/// Builder for [`ConfigStore`].
///
/// Defaults: override prefix `CONFIG_OVERRIDE_`, empty label, the process
/// environment, warnings to the log.
pub struct ConfigStoreBuilder {
    base: ConfigValue,
    override_prefix: String,
    label: String,
    env: Arc<dyn EnvSource>,
    warnings: Arc<dyn WarningSink>,
}

impl ConfigStoreBuilder {
    pub(crate) fn new(base: ConfigValue) -> Self {
        Self {
            base,
            override_prefix: DEFAULT_OVERRIDE_PREFIX.to_string(),
            label: String::new(),
            env: Arc::new(ProcessEnv),
            warnings: Arc::new(LogSink),
        }
    }

    /// Prefix for convention-named override variables.
    pub fn override_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.override_prefix = prefix.into();
        self
    }

    /// Label shown in error and warning messages, handy when a process
    /// owns several stores.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Environment to resolve against instead of the process environment.
    pub fn env(mut self, env: Arc<dyn EnvSource>) -> Self {
        self.env = env;
        self
    }

    /// Sink for non-fatal link warnings.
    pub fn warnings(mut self, warnings: Arc<dyn WarningSink>) -> Self {
        self.warnings = warnings;
        self
    }

    /// Resolve overrides and finalize the first snapshot.
    ///
    /// Fails if an override variable under the prefix holds invalid JSON.
    pub fn build(self) -> Result<ConfigStore, ConfigError> {
        let overrides = resolve_overrides(self.env.as_ref(), &self.override_prefix, &self.base)?;
        let mut store = ConfigStore {
            env: self.env,
            warnings: self.warnings,
            label: self.label,
            base: self.base,
            override_prefix: self.override_prefix,
            overrides,
            links: ConfigValue::empty(),
            reactions: Vec::new(),
            finalized: ConfigValue::Null,
        };
        store.refinalize();
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MapEnv;
    use serde_json::json;

    #[test]
    fn test_builder_defaults() {
        let store = ConfigStore::builder(json!({}))
            .env(Arc::new(MapEnv::new()))
            .build()
            .unwrap();
        assert_eq!(store.override_prefix(), DEFAULT_OVERRIDE_PREFIX);
        assert_eq!(store.label(), "");
    }

    #[test]
    fn test_build_fails_on_bad_override_json() {
        let env = MapEnv::from_iter([("CONFIG_OVERRIDE_PORT", "abc")]);
        let result = ConfigStore::builder(json!({"port": 8080}))
            .env(Arc::new(env))
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidOverrideValue { .. })
        ));
    }

    #[test]
    fn test_builder_applies_custom_prefix_and_label() {
        let env = MapEnv::from_iter([("MY_APP_PORT", "9090")]);
        let store = ConfigStore::builder(json!({"port": 8080}))
            .override_prefix("MY_APP_")
            .label("api")
            .env(Arc::new(env))
            .build()
            .unwrap();
        assert_eq!(store.label(), "api");
        assert_eq!(
            store.snapshot().get("port").and_then(ConfigValue::as_f64),
            Some(9090.0)
        );
    }
}
