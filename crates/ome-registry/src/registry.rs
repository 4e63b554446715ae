//! Identifier registry and pending-reference ledger
//!
//! Provides [`ModelRegistry`], created fresh for every document parse and
//! discarded once references are resolved.

use crate::node_id::NodeId;
use crate::reference::Reference;
use indexmap::IndexMap;
use std::collections::HashMap;

/// Pending edges drained from a registry, grouped by source node
///
/// Sources appear in the order they first recorded an edge; each source's
/// references keep their recording order.
pub type PendingEdges = Vec<(NodeId, Vec<Reference>)>;

/// Per-document identifier index and ledger of unresolved references
///
/// # Invariants
/// - An identifier maps to at most one node; registering it again replaces
///   the previous occupant (last write wins).
/// - The ledger only grows during a walk; [`take_pending`](Self::take_pending)
///   empties it, so no descriptor is handed out for resolution twice.
#[derive(Debug, Default, Clone)]
pub struct ModelRegistry {
    /// Document identifier -> node
    objects: HashMap<String, NodeId>,

    /// Source node -> references it declared, in recording order
    pending: IndexMap<NodeId, Vec<Reference>>,
}

impl ModelRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `node` under `id`
    ///
    /// Returns the previous occupant of `id`, if any. Duplicate identifiers
    /// are tolerated: the new node silently replaces the old one.
    pub fn register(&mut self, id: impl Into<String>, node: NodeId) -> Option<NodeId> {
        let id = id.into();
        let previous = self.objects.insert(id.clone(), node);
        if let Some(prev) = previous {
            if prev != node {
                tracing::debug!("identifier {} re-registered: {} replaces {}", id, node, prev);
            }
        }
        previous
    }

    /// Look up the node registered under `id`
    #[inline]
    #[must_use]
    pub fn lookup(&self, id: &str) -> Option<NodeId> {
        self.objects.get(id).copied()
    }

    /// Check whether `id` is registered
    #[inline]
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.objects.contains_key(id)
    }

    /// Remove the registration for `id`
    #[inline]
    pub fn remove(&mut self, id: &str) -> Option<NodeId> {
        self.objects.remove(id)
    }

    /// Number of registered identifiers
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if no identifier is registered
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Registered identifiers, sorted for stable output
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.objects.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Append a pending reference declared by `source`
    pub fn record_pending(&mut self, source: NodeId, reference: Reference) {
        self.pending.entry(source).or_default().push(reference);
    }

    /// Iterate pending edges
    ///
    /// Sources in first-recorded order, then each source's references in
    /// recording order.
    pub fn pending_edges(&self) -> impl Iterator<Item = (NodeId, &Reference)> {
        self.pending
            .iter()
            .flat_map(|(source, refs)| refs.iter().map(move |r| (*source, r)))
    }

    /// Pending references declared by one source
    #[must_use]
    pub fn pending_for(&self, source: NodeId) -> &[Reference] {
        self.pending.get(&source).map_or(&[], Vec::as_slice)
    }

    /// Total number of pending references
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.values().map(Vec::len).sum()
    }

    /// Drain the ledger
    ///
    /// After this call the ledger is empty; identifier registrations are
    /// kept so the drained edges can still be looked up.
    pub fn take_pending(&mut self) -> PendingEdges {
        std::mem::take(&mut self.pending).into_iter().collect()
    }
}
