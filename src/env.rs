//! Injectable environment lookup.
//!
//! Resolvers never touch `std::env` directly; they read through an
//! [`EnvSource`] so tests can swap the process environment for an
//! in-memory map. Lookups are pull-based: a value read once is not
//! re-read until the owning layer is explicitly rebound.

use std::collections::BTreeMap;
use std::sync::Mutex;

/// Read-only key to string-or-absent lookup over an environment.
pub trait EnvSource: Send + Sync {
    /// The value of `name`, or `None` when unset (or not valid UTF-8).
    fn var(&self, name: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// In-memory environment for tests.
///
/// Interior mutability mirrors the real environment: externally mutable
/// between calls, read-only from the resolvers' side.
#[derive(Debug, Default)]
pub struct MapEnv {
    vars: Mutex<BTreeMap<String, String>>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.lock().unwrap().insert(name.into(), value.into());
    }

    pub fn remove(&self, name: &str) {
        self.vars.lock().unwrap().remove(name);
    }
}

impl EnvSource for MapEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.lock().unwrap().get(name).cloned()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(entries: I) -> Self {
        let vars = entries
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self {
            vars: Mutex::new(vars),
        }
    }
}
