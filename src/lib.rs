//! envlayer - Layered environment-driven configuration
//!
//! This crate resolves one deterministic configuration snapshot from four
//! layered sources: a static base structure, declaratively bound
//! environment variables (links), convention-named environment variables
//! (overrides), and an ordered list of post-merge mutations (reactions).
//! Precedence, lowest to highest: base < links < overrides; reactions run
//! over the merged result.
//!
//! ```
//! use std::sync::Arc;
//! use envlayer::{ConfigStore, LinkDescriptor, LinkSpec, MapEnv};
//! use serde_json::json;
//!
//! let env = MapEnv::from_iter([("CONFIG_OVERRIDE_PORT", "9090")]);
//! let mut store = ConfigStore::builder(json!({"port": 8080, "name": "svc"}))
//!     .env(Arc::new(env))
//!     .build()?;
//!
//! store.bind_links(&LinkSpec::tree([(
//!     "name",
//!     LinkDescriptor::string("SERVICE_NAME").optional().default_value("svc").into(),
//! )]))?;
//!
//! let snapshot = store.snapshot();
//! assert_eq!(snapshot.get("port").and_then(|v| v.as_f64()), Some(9090.0));
//! # Ok::<(), envlayer::ConfigError>(())
//! ```

pub mod env;
pub mod error;
pub mod links;
pub mod merge;
pub mod name;
pub mod overrides;
pub mod reaction;
pub mod store;
pub mod value;
pub mod warn;

pub use env::{EnvSource, MapEnv, ProcessEnv};
pub use error::ConfigError;
pub use links::{resolve_links, LinkDescriptor, LinkSpec, LinkType, TransformFn};
pub use merge::{deep_merge, merge_layers};
pub use name::derive_var_name;
pub use overrides::resolve_overrides;
pub use reaction::{apply_reactions, Reaction};
pub use store::{ConfigStore, ConfigStoreBuilder, SnapshotOptions, DEFAULT_OVERRIDE_PREFIX};
pub use value::ConfigValue;
pub use warn::{CollectSink, LinkWarning, LogSink, WarningKind, WarningSink};
