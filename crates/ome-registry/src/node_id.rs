//! Node handles
//!
//! Provides [`NodeId`], the arena index every graph edge is expressed in.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Handle of one node in a materialized graph
///
/// Identity of a node is its `NodeId`, never its field values: two nodes
/// with identical contents are still distinct members of a [`UniqueList`].
///
/// [`UniqueList`]: crate::UniqueList
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    /// Create handle from an arena index
    #[inline]
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// Arena index of this handle
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
