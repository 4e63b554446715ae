//! Unit factory
//!
//! Renders create every element through [`ElementFactory`] so that the
//! namespace/tag pairing is decided in one place.

use crate::unit::TreeUnit;
use std::collections::HashMap;

/// Schema namespaces of the 2015-01 model
pub mod namespaces {
    /// Core model namespace
    pub const OME: &str = "http://www.openmicroscopy.org/Schemas/OME/2015-01";

    /// Structured annotations namespace
    pub const SA: &str = "http://www.openmicroscopy.org/Schemas/SA/2015-01";

    /// Regions of interest namespace
    pub const ROI: &str = "http://www.openmicroscopy.org/Schemas/ROI/2015-01";
}

/// Creates tree units keyed by (namespace, tag name)
///
/// Units are created unprefixed unless a prefix has been bound to the
/// namespace with [`with_prefix`](Self::with_prefix).
#[derive(Debug, Clone, Default)]
pub struct ElementFactory {
    prefixes: HashMap<String, String>,
}

impl ElementFactory {
    /// Create factory with no prefix bindings
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a prefix to a namespace
    #[inline]
    #[must_use]
    pub fn with_prefix(mut self, namespace: impl Into<String>, prefix: impl Into<String>) -> Self {
        self.prefixes.insert(namespace.into(), prefix.into());
        self
    }

    /// Create an empty unit for `tag` in `namespace`
    #[must_use]
    pub fn create(&self, namespace: &str, tag: &str) -> TreeUnit {
        let name = match self.prefixes.get(namespace) {
            Some(prefix) if !prefix.is_empty() => format!("{prefix}:{tag}"),
            _ => tag.to_string(),
        };
        TreeUnit::with_namespace(namespace, name)
    }

    /// Prefix bound to `namespace`, if any
    #[inline]
    #[must_use]
    pub fn prefix(&self, namespace: &str) -> Option<&str> {
        self.prefixes.get(namespace).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_creates_unprefixed_unit() {
        let factory = ElementFactory::new();
        let unit = factory.create(namespaces::OME, "Image");
        assert_eq!(unit.name(), "Image");
        assert_eq!(unit.namespace(), Some(namespaces::OME));
    }

    #[test]
    fn factory_applies_bound_prefix() {
        let factory = ElementFactory::new().with_prefix(namespaces::SA, "SA");
        let unit = factory.create(namespaces::SA, "MapAnnotation");
        assert_eq!(unit.name(), "SA:MapAnnotation");
        assert_eq!(unit.local_name(), "MapAnnotation");
        assert_eq!(factory.prefix(namespaces::SA), Some("SA"));
        assert_eq!(factory.prefix(namespaces::ROI), None);
    }
}
