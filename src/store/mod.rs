//! The configuration store.
//!
//! Owns the four layers (base, links, overrides, reactions) and recomputes
//! the finalized snapshot after every mutating call. Precedence, lowest to
//! highest: base < links < overrides; reactions run over the merged result.
//! Every mutating operation validates fully before committing, so a failing
//! call leaves the store exactly as it was.

mod builder;

pub use builder::ConfigStoreBuilder;

use std::fmt;
use std::sync::Arc;

use crate::env::EnvSource;
use crate::error::ConfigError;
use crate::links::{resolve_links, LinkSpec};
use crate::merge::{deep_merge, merge_layers};
use crate::overrides::resolve_overrides;
use crate::reaction::{apply_reactions, Reaction};
use crate::value::ConfigValue;
use crate::warn::WarningSink;

/// Prefix used for override variables when none is given.
pub const DEFAULT_OVERRIDE_PREFIX: &str = "CONFIG_OVERRIDE_";

/// Layer exclusions for an ephemeral snapshot computation.
///
/// Each flag omits one layer from that single computation; stored layers
/// and the cached finalized snapshot are unaffected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SnapshotOptions {
    pub skip_overrides: bool,
    pub skip_links: bool,
    pub skip_reactions: bool,
}

impl SnapshotOptions {
    fn skips_any_layer(&self) -> bool {
        self.skip_overrides || self.skip_links || self.skip_reactions
    }
}

/// The single recomputation path: merge the layers in precedence order,
/// then run the reactions. Pure over its inputs.
fn compute_snapshot(
    base: &ConfigValue,
    links: &ConfigValue,
    overrides: &ConfigValue,
    reactions: &[Reaction],
    options: SnapshotOptions,
) -> ConfigValue {
    let mut layers = vec![base.clone()];
    if !options.skip_links {
        layers.push(links.clone());
    }
    if !options.skip_overrides {
        layers.push(overrides.clone());
    }
    let merged = merge_layers(layers);
    if options.skip_reactions {
        merged
    } else {
        apply_reactions(merged, reactions)
    }
}

/// Layered configuration store.
///
/// Construct with [`ConfigStore::new`] or [`ConfigStore::builder`]; read
/// with [`snapshot`](ConfigStore::snapshot). Returned values are always
/// fresh copies, never references into the store's own state.
pub struct ConfigStore {
    env: Arc<dyn EnvSource>,
    warnings: Arc<dyn WarningSink>,
    label: String,
    base: ConfigValue,
    override_prefix: String,
    overrides: ConfigValue,
    links: ConfigValue,
    reactions: Vec<Reaction>,
    finalized: ConfigValue,
}

impl ConfigStore {
    /// A store over the process environment with the default override
    /// prefix and no label.
    ///
    /// Fails if an override variable under the default prefix holds
    /// invalid JSON.
    pub fn new(base: impl Into<ConfigValue>) -> Result<Self, ConfigError> {
        Self::builder(base).build()
    }

    /// Start building a store over `base`.
    pub fn builder(base: impl Into<ConfigValue>) -> ConfigStoreBuilder {
        ConfigStoreBuilder::new(base.into())
    }

    /// Re-resolve the override layer against a new prefix.
    ///
    /// Overrides resolved under the previous prefix are dropped. On error
    /// the store is untouched: prefix, overrides, and the finalized
    /// snapshot all keep their previous values.
    pub fn set_override_prefix(&mut self, prefix: impl Into<String>) -> Result<(), ConfigError> {
        let prefix = prefix.into();
        let overrides = resolve_overrides(self.env.as_ref(), &prefix, &self.base)?;
        self.override_prefix = prefix;
        self.overrides = overrides;
        self.refinalize();
        Ok(())
    }

    /// Resolve `spec` and merge the result into the link layer.
    ///
    /// Fails if any required link is missing or any link fails coercion;
    /// a failing bind leaves the existing link layer in place.
    pub fn bind_links(&mut self, spec: &LinkSpec) -> Result<(), ConfigError> {
        self.bind_links_with(spec, false)
    }

    /// Like [`bind_links`](ConfigStore::bind_links), but with
    /// `reset_previous` the freshly resolved values replace the link layer
    /// instead of merging into it.
    pub fn bind_links_with(
        &mut self,
        spec: &LinkSpec,
        reset_previous: bool,
    ) -> Result<(), ConfigError> {
        let resolved = resolve_links(self.env.as_ref(), self.warnings.as_ref(), spec, &self.label)?;
        self.links = if reset_previous {
            resolved
        } else {
            deep_merge(self.links.clone(), resolved)
        };
        self.refinalize();
        Ok(())
    }

    /// Append a reaction and recompute. Reactions run on every
    /// recomputation from then on, in registration order.
    pub fn add_reaction(&mut self, reaction: impl Fn(&mut ConfigValue) + Send + Sync + 'static) {
        self.reactions.push(Box::new(reaction));
        self.refinalize();
    }

    /// Deep-merge `partial` into the base layer and re-resolve overrides
    /// against the current prefix.
    pub fn update_base(&mut self, partial: impl Into<ConfigValue>) -> Result<(), ConfigError> {
        let prefix = self.override_prefix.clone();
        self.update_base_with_prefix(partial, prefix)
    }

    /// Deep-merge `partial` into the base layer, then re-resolve overrides
    /// against `prefix`. The base can grow new branches here, which is why
    /// overrides re-resolve: new paths may now have matching variables.
    pub fn update_base_with_prefix(
        &mut self,
        partial: impl Into<ConfigValue>,
        prefix: impl Into<String>,
    ) -> Result<(), ConfigError> {
        let base = deep_merge(self.base.clone(), partial.into());
        let prefix = prefix.into();
        let overrides = resolve_overrides(self.env.as_ref(), &prefix, &base)?;
        self.base = base;
        self.override_prefix = prefix;
        self.overrides = overrides;
        self.refinalize();
        Ok(())
    }

    /// The finalized snapshot: all layers merged, all reactions applied.
    pub fn snapshot(&self) -> ConfigValue {
        self.finalized.clone()
    }

    /// An ephemeral view honoring the given exclusions. With no exclusion
    /// set this is the cached finalized snapshot; otherwise the view is
    /// computed from scratch and nothing stored changes.
    pub fn snapshot_with(&self, options: SnapshotOptions) -> ConfigValue {
        if options.skips_any_layer() {
            compute_snapshot(&self.base, &self.links, &self.overrides, &self.reactions, options)
        } else {
            self.finalized.clone()
        }
    }

    /// The resolved link layer.
    pub fn links(&self) -> ConfigValue {
        self.links.clone()
    }

    /// The resolved override patch.
    pub fn overrides(&self) -> ConfigValue {
        self.overrides.clone()
    }

    /// The base layer.
    pub fn base(&self) -> ConfigValue {
        self.base.clone()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn override_prefix(&self) -> &str {
        &self.override_prefix
    }

    fn refinalize(&mut self) {
        self.finalized = compute_snapshot(
            &self.base,
            &self.links,
            &self.overrides,
            &self.reactions,
            SnapshotOptions::default(),
        );
    }
}

impl fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigStore")
            .field("label", &self.label)
            .field("override_prefix", &self.override_prefix)
            .field("base", &self.base)
            .field("links", &self.links)
            .field("overrides", &self.overrides)
            .field("reactions", &self.reactions.len())
            .field("finalized", &self.finalized)
            .finish()
    }
}
