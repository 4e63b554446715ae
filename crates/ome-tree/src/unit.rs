//! Element tree units
//!
//! Provides [`TreeUnit`], the parser-neutral element used on both sides of
//! the object graph.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Strip an XML namespace prefix (`ome:Image` → `Image`)
#[inline]
#[must_use]
pub fn strip_prefix(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}

/// One element of a document tree
///
/// Attributes keep insertion order so a rendered tree compares equal to the
/// tree it came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeUnit {
    /// Tag name as written, possibly prefixed
    name: String,

    /// Namespace URI, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    namespace: Option<String>,

    /// Attributes in document order
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    attributes: IndexMap<String, String>,

    /// Child units in document order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<TreeUnit>,

    /// Text content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

impl TreeUnit {
    /// Create a unit with no namespace
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Create a namespaced unit
    #[inline]
    #[must_use]
    pub fn with_namespace(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: Some(namespace.into()),
            ..Self::default()
        }
    }

    /// Tag name as written
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tag name with any namespace prefix removed
    #[inline]
    #[must_use]
    pub fn local_name(&self) -> &str {
        strip_prefix(&self.name)
    }

    /// Namespace URI
    #[inline]
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Attribute lookup by name
    #[inline]
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Check whether an attribute is present
    #[inline]
    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// All attributes in document order
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Set an attribute, replacing any previous value
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Builder form of [`set_attribute`](Self::set_attribute)
    #[inline]
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Direct children in document order
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[TreeUnit] {
        &self.children
    }

    /// Direct children whose local tag name matches `local_name`
    ///
    /// The comparison ignores namespace prefixes on the children.
    pub fn children_named<'a>(&'a self, local_name: &'a str) -> impl Iterator<Item = &'a TreeUnit> + 'a {
        self.children
            .iter()
            .filter(move |child| child.local_name() == local_name)
    }

    /// Append a child
    pub fn append_child(&mut self, child: TreeUnit) {
        self.children.push(child);
    }

    /// Builder form of [`append_child`](Self::append_child)
    #[inline]
    #[must_use]
    pub fn with_child(mut self, child: TreeUnit) -> Self {
        self.append_child(child);
        self
    }

    /// Text content
    #[inline]
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Text content, empty string when absent
    #[inline]
    #[must_use]
    pub fn text_or_empty(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// Set text content
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    /// Builder form of [`set_text`](Self::set_text)
    #[inline]
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }

    /// Total number of units in this subtree, including `self`
    #[must_use]
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(TreeUnit::subtree_len).sum::<usize>()
    }
}
