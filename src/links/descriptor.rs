//! Link descriptors and the specification tree.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::value::ConfigValue;

/// Custom coercion from the raw variable text to a value.
pub type TransformFn = Arc<dyn Fn(&str) -> ConfigValue + Send + Sync>;

/// How a present variable's raw text becomes a configuration value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkType {
    /// Use the raw text verbatim.
    String,
    /// Numeric coercion; text that does not parse becomes NaN and passes
    /// through unchanged.
    Number,
    /// JSON-parse the text, reviving date-shaped strings.
    Json,
    /// Apply the descriptor's transform to the raw text.
    Function,
}

/// One field-to-variable binding.
///
/// `required` defaults to true. `optional` and `default_value` are
/// independent modifiers: an optional link without a default is simply left
/// out of the link layer when its variable is unset.
#[derive(Clone)]
pub struct LinkDescriptor {
    pub(crate) variable: String,
    pub(crate) value_type: LinkType,
    pub(crate) required: bool,
    pub(crate) default: Option<ConfigValue>,
    pub(crate) transform: Option<TransformFn>,
}

impl LinkDescriptor {
    /// A descriptor with the given coercion type, required, no default.
    ///
    /// A `Function`-typed descriptor built this way has no transform yet
    /// and will fail resolution; prefer [`LinkDescriptor::with_transform`].
    pub fn new(variable: impl Into<String>, value_type: LinkType) -> Self {
        Self {
            variable: variable.into(),
            value_type,
            required: true,
            default: None,
            transform: None,
        }
    }

    pub fn string(variable: impl Into<String>) -> Self {
        Self::new(variable, LinkType::String)
    }

    pub fn number(variable: impl Into<String>) -> Self {
        Self::new(variable, LinkType::Number)
    }

    pub fn json(variable: impl Into<String>) -> Self {
        Self::new(variable, LinkType::Json)
    }

    /// A `Function`-typed descriptor with its transform supplied up front.
    pub fn with_transform(
        variable: impl Into<String>,
        transform: impl Fn(&str) -> ConfigValue + Send + Sync + 'static,
    ) -> Self {
        let mut descriptor = Self::new(variable, LinkType::Function);
        descriptor.transform = Some(Arc::new(transform));
        descriptor
    }

    /// Mark the link as not required: an unset variable warns instead of
    /// failing.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Value used (with a warning) when an optional link's variable is
    /// unset.
    pub fn default_value(mut self, value: impl Into<ConfigValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    pub fn value_type(&self) -> LinkType {
        self.value_type
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn default(&self) -> Option<&ConfigValue> {
        self.default.as_ref()
    }
}

impl fmt::Debug for LinkDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkDescriptor")
            .field("variable", &self.variable)
            .field("value_type", &self.value_type)
            .field("required", &self.required)
            .field("default", &self.default)
            .field("transform", &self.transform.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// A tree of link descriptors mirroring (a subset of) the base shape.
#[derive(Debug, Clone)]
pub enum LinkSpec {
    Leaf(LinkDescriptor),
    Tree(BTreeMap<String, LinkSpec>),
}

impl LinkSpec {
    /// Build a container node from `(field, spec)` entries.
    pub fn tree<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, LinkSpec)>,
    {
        LinkSpec::Tree(
            entries
                .into_iter()
                .map(|(key, spec)| (key.into(), spec))
                .collect(),
        )
    }
}

impl From<LinkDescriptor> for LinkSpec {
    fn from(descriptor: LinkDescriptor) -> Self {
        LinkSpec::Leaf(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_defaults_to_required() {
        let descriptor = LinkDescriptor::string("ACCESS_CODE");
        assert!(descriptor.is_required());
        assert!(descriptor.default().is_none());
        assert_eq!(descriptor.value_type(), LinkType::String);
    }

    #[test]
    fn test_optional_and_default_are_independent() {
        let descriptor = LinkDescriptor::number("PORT").optional();
        assert!(!descriptor.is_required());
        assert!(descriptor.default().is_none());

        let descriptor = LinkDescriptor::number("PORT").optional().default_value(3000);
        assert_eq!(descriptor.default(), Some(&ConfigValue::Number(3000.0)));
    }

    #[test]
    fn test_with_transform_sets_function_type() {
        let descriptor =
            LinkDescriptor::with_transform("FLAG", |raw| ConfigValue::Bool(raw == "yes"));
        assert_eq!(descriptor.value_type(), LinkType::Function);
        assert!(descriptor.transform.is_some());
    }

    #[test]
    fn test_tree_builder_keys_by_field() {
        let spec = LinkSpec::tree([
            ("port", LinkDescriptor::number("PORT").into()),
            (
                "db",
                LinkSpec::tree([("host", LinkDescriptor::string("DB_HOST").into())]),
            ),
        ]);
        let LinkSpec::Tree(children) = spec else {
            panic!("expected a tree");
        };
        assert!(matches!(children.get("port"), Some(LinkSpec::Leaf(_))));
        assert!(matches!(children.get("db"), Some(LinkSpec::Tree(_))));
    }
}
