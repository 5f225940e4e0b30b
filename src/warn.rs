//! Non-fatal resolution warnings.
//!
//! Link resolution reports fall-through conditions (a default applied, an
//! optional link left unbound) through an injectable [`WarningSink`].
//! Warnings never interrupt resolution and are never promoted to errors.

use std::fmt;
use std::sync::Mutex;

use crate::error::label_tag;
use crate::value::ConfigValue;

/// Why a link fell through to something other than its variable's value.
#[derive(Debug, Clone, PartialEq)]
pub enum WarningKind {
    /// The variable was unset and the declared default was used.
    DefaultApplied(ConfigValue),
    /// The variable was unset, no default was declared, and the field was
    /// left out of the link layer entirely.
    LeftUnbound,
}

/// One warning raised while resolving a link tree.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkWarning {
    /// Store label, empty when the store has none.
    pub label: String,
    /// Dot-separated field path within the snapshot.
    pub field: String,
    /// The environment variable the link names.
    pub variable: String,
    pub kind: WarningKind,
}

impl fmt::Display for LinkWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = label_tag(&self.label);
        match &self.kind {
            WarningKind::DefaultApplied(default) => write!(
                f,
                "config{tag}: field '{}' using default value ({}) because environment variable \"{}\" is not set",
                self.field, default, self.variable
            ),
            WarningKind::LeftUnbound => write!(
                f,
                "config{tag}: field '{}' left unbound because optional environment variable \"{}\" is not set and no default value is declared",
                self.field, self.variable
            ),
        }
    }
}

/// Receiver for non-fatal resolution warnings.
pub trait WarningSink: Send + Sync {
    fn emit(&self, warning: &LinkWarning);
}

/// Default sink: warnings go to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl WarningSink for LogSink {
    fn emit(&self, warning: &LinkWarning) {
        tracing::warn!("{warning}");
    }
}

/// Test sink that keeps every warning for later inspection.
#[derive(Debug, Default)]
pub struct CollectSink {
    collected: Mutex<Vec<LinkWarning>>,
}

impl CollectSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far.
    pub fn collected(&self) -> Vec<LinkWarning> {
        self.collected.lock().unwrap().clone()
    }

    /// Take the collected warnings, leaving the sink empty.
    pub fn drain(&self) -> Vec<LinkWarning> {
        std::mem::take(&mut *self.collected.lock().unwrap())
    }
}

impl WarningSink for CollectSink {
    fn emit(&self, warning: &LinkWarning) {
        self.collected.lock().unwrap().push(warning.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_applied_message() {
        let warning = LinkWarning {
            label: "api".to_string(),
            field: "port".to_string(),
            variable: "PORT".to_string(),
            kind: WarningKind::DefaultApplied(ConfigValue::Number(3000.0)),
        };
        assert_eq!(
            warning.to_string(),
            "config (api): field 'port' using default value (3000) because environment variable \"PORT\" is not set"
        );
    }

    #[test]
    fn test_left_unbound_message_without_label() {
        let warning = LinkWarning {
            label: String::new(),
            field: "db.host".to_string(),
            variable: "DB_HOST".to_string(),
            kind: WarningKind::LeftUnbound,
        };
        let message = warning.to_string();
        assert!(message.starts_with("config: field 'db.host'"));
        assert!(message.contains("\"DB_HOST\""));
    }

    #[test]
    fn test_collect_sink_keeps_warnings_in_order() {
        let sink = CollectSink::new();
        for field in ["a", "b"] {
            sink.emit(&LinkWarning {
                label: String::new(),
                field: field.to_string(),
                variable: field.to_uppercase(),
                kind: WarningKind::LeftUnbound,
            });
        }
        let collected = sink.drain();
        assert_eq!(collected.len(), 2);
        assert_eq!(collected[0].field, "a");
        assert_eq!(collected[1].field, "b");
        assert!(sink.collected().is_empty());
    }
}
