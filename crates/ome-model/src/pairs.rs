//! Ordered key/value pairs
//!
//! Provides [`OrderedPairs`], the value of a map annotation. It is a leaf
//! value, not a graph node, and takes no part in linking.
//!
//! In a document each pair is one `<M K="key">value</M>` unit.

use ome_tree::{namespaces, ElementFactory, TreeUnit};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Tag of a pair unit
pub const PAIR_TAG: &str = "M";

/// Attribute carrying a pair's key
pub const KEY_ATTRIBUTE: &str = "K";

/// Insertion-ordered list of string pairs
///
/// Keys are not required to be unique. The list cannot be mutated in place;
/// accessors hand out views or copies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderedPairs {
    pairs: Vec<(String, String)>,
}

impl OrderedPairs {
    /// Create empty list
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy pairs from a slice
    #[must_use]
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self { pairs: pairs.to_vec() }
    }

    /// Parse every `M` child of `element`
    ///
    /// Children with another local tag are ignored. Pair units without a
    /// key are skipped.
    #[must_use]
    pub fn from_element(element: &TreeUnit) -> Self {
        let pairs = element
            .children_named(PAIR_TAG)
            .filter_map(|unit| match unit.attribute(KEY_ATTRIBUTE) {
                Some(key) => Some((key.to_string(), unit.text_or_empty().to_string())),
                None => {
                    warn!("{} unit without {} attribute skipped", PAIR_TAG, KEY_ATTRIBUTE);
                    None
                }
            })
            .collect();
        Self { pairs }
    }

    /// Append one `M` child per pair to `parent`, in order
    ///
    /// An empty value leaves the pair unit without text.
    pub fn render_into(&self, parent: &mut TreeUnit, factory: &ElementFactory) {
        for (key, value) in &self.pairs {
            let mut unit = factory
                .create(namespaces::OME, PAIR_TAG)
                .with_attribute(KEY_ATTRIBUTE, key);
            if !value.is_empty() {
                unit.set_text(value);
            }
            parent.append_child(unit);
        }
    }

    /// Read-only view of the pairs
    #[inline]
    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Copy of the pairs
    #[must_use]
    pub fn to_vec(&self) -> Vec<(String, String)> {
        self.pairs.clone()
    }

    /// Value of the first pair with `key`
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Number of pairs
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Check if empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterate pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl From<Vec<(String, String)>> for OrderedPairs {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for OrderedPairs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}
