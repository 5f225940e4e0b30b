//! Error types for layer resolution.
//!
//! Every failure is raised synchronously at the point of resolution
//! (construction, prefix rebind, or link bind). A failing operation never
//! commits partial state: the store keeps whatever it held before the call.

use thiserror::Error;

/// Render the store label the way it appears in messages: empty labels
/// disappear, anything else shows up parenthesized.
pub(crate) fn label_tag(label: &str) -> String {
    if label.is_empty() {
        String::new()
    } else {
        format!(" ({label})")
    }
}

/// Resolution failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A link marked required (the default) names a variable the
    /// environment does not define.
    #[error("config{tag}: required environment variable [{variable}] for field '{field}' is not set (define it, or mark the link optional and give it a default)", tag = label_tag(.label))]
    MissingRequiredEnv {
        label: String,
        field: String,
        variable: String,
    },

    /// A JSON-typed link variable holds text that does not parse.
    #[error("config{tag}: environment variable [{variable}] for field '{field}' is not valid JSON: {source}", tag = label_tag(.label))]
    ParseError {
        label: String,
        field: String,
        variable: String,
        #[source]
        source: serde_json::Error,
    },

    /// A function-typed link was declared without a transform.
    #[error("config{tag}: link for field '{field}' ([{variable}]) declares a function type but carries no transform", tag = label_tag(.label))]
    MisconfiguredLink {
        label: String,
        field: String,
        variable: String,
    },

    /// An override variable holds text that does not parse as JSON.
    /// String overrides must carry escaped double quotes.
    #[error("override variable [{variable}] under prefix '{prefix}' is not valid JSON (string values need escaped double quotes): {source}")]
    InvalidOverrideValue {
        prefix: String,
        variable: String,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json_error() -> serde_json::Error {
        serde_json::from_str::<serde_json::Value>("abc").unwrap_err()
    }

    #[test]
    fn test_missing_required_message_names_everything() {
        let error = ConfigError::MissingRequiredEnv {
            label: "api".to_string(),
            field: "db.host".to_string(),
            variable: "DB_HOST".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("(api)"));
        assert!(message.contains("'db.host'"));
        assert!(message.contains("[DB_HOST]"));
    }

    #[test]
    fn test_empty_label_leaves_no_tag() {
        let error = ConfigError::MissingRequiredEnv {
            label: String::new(),
            field: "port".to_string(),
            variable: "PORT".to_string(),
        };
        assert!(error.to_string().starts_with("config:"));
    }

    #[test]
    fn test_override_message_names_prefix_and_variable() {
        let error = ConfigError::InvalidOverrideValue {
            prefix: "CONFIG_OVERRIDE_".to_string(),
            variable: "CONFIG_OVERRIDE_PORT".to_string(),
            source: json_error(),
        };
        let message = error.to_string();
        assert!(message.contains("CONFIG_OVERRIDE_PORT"));
        assert!(message.contains("'CONFIG_OVERRIDE_'"));
    }
}
