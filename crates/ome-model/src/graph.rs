//! Node arena
//!
//! Provides [`ModelGraph`], the arena holding every node of one document.
//! Edges of every kind are [`NodeId`]s into it; only ownership edges are
//! walked when rendering.

use crate::object::{BackLink, ModelObject};
use ome_registry::NodeId;

/// Arena of materialized nodes
///
/// Slots are reserved before a node's fields are populated so that the
/// node's handle can be registered while it is still being built.
#[derive(Debug, Default)]
pub struct ModelGraph {
    slots: Vec<Option<Box<dyn ModelObject>>>,
}

impl ModelGraph {
    /// Create empty graph
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a slot for a node under construction
    pub fn reserve(&mut self) -> NodeId {
        self.slots.push(None);
        NodeId::from_index(self.slots.len() - 1)
    }

    /// Install a node into a reserved slot
    ///
    /// Returns the node that previously occupied the slot, if any. Unknown
    /// handles are ignored and the node is handed back.
    pub fn install(
        &mut self,
        id: NodeId,
        node: Box<dyn ModelObject>,
    ) -> Option<Box<dyn ModelObject>> {
        match self.slots.get_mut(id.index()) {
            Some(slot) => slot.replace(node),
            None => Some(node),
        }
    }

    /// Take a node out of its slot, leaving the slot vacant
    pub fn take(&mut self, id: NodeId) -> Option<Box<dyn ModelObject>> {
        self.slots.get_mut(id.index()).and_then(Option::take)
    }

    /// Check whether `id` names an installed node
    #[inline]
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Borrow a node
    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&(dyn ModelObject + 'static)> {
        self.slots.get(id.index())?.as_deref()
    }

    /// Borrow a node mutably
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut (dyn ModelObject + 'static)> {
        match self.slots.get_mut(id.index()) {
            Some(Some(node)) => Some(&mut **node),
            _ => None,
        }
    }

    /// Borrow a node as its concrete type
    #[must_use]
    pub fn downcast<T: ModelObject>(&self, id: NodeId) -> Option<&T> {
        self.get(id)?.as_any().downcast_ref::<T>()
    }

    /// Borrow a node mutably as its concrete type
    pub fn downcast_mut<T: ModelObject>(&mut self, id: NodeId) -> Option<&mut T> {
        self.get_mut(id)?.as_any_mut().downcast_mut::<T>()
    }

    /// Number of installed nodes
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Check if no node is installed
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Installed nodes in handle order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &(dyn ModelObject + 'static))> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_deref().map(|node| (NodeId::from_index(i), node)))
    }

    /// Installed nodes of concrete type `T` in handle order
    pub fn nodes_of<T: ModelObject>(&self) -> impl Iterator<Item = (NodeId, &T)> {
        self.iter()
            .filter_map(|(id, node)| node.as_any().downcast_ref::<T>().map(|typed| (id, typed)))
    }

    /// First node whose own identifier equals `id`
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<(NodeId, &(dyn ModelObject + 'static))> {
        self.iter().find(|(_, node)| node.id() == Some(id))
    }

    /// Apply an inverse pointer to its holder
    ///
    /// Returns `false` if the holder is missing or keeps no such
    /// back-reference.
    pub fn apply_back_link(&mut self, back: &BackLink) -> bool {
        match self.get_mut(back.holder) {
            Some(holder) => holder.accept_back_link(back),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Channel, Pixels};
    use crate::object::Lineage;

    #[test]
    fn reserved_slot_is_vacant_until_installed() {
        let mut graph = ModelGraph::new();
        let id = graph.reserve();

        assert!(!graph.contains(id));
        assert!(graph.is_empty());

        assert!(graph.install(id, Box::new(Pixels::default())).is_none());
        assert!(graph.contains(id));
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.get(id).map(|node| node.type_name()), Some("Pixels"));
    }

    #[test]
    fn install_into_unknown_slot_hands_node_back() {
        let mut graph = ModelGraph::new();
        let returned = graph.install(NodeId::from_index(3), Box::new(Pixels::default()));
        assert!(returned.is_some());
        assert!(graph.is_empty());
    }

    #[test]
    fn downcast_checks_concrete_type() {
        let mut graph = ModelGraph::new();
        let id = graph.reserve();
        graph.install(id, Box::new(Channel::default()));

        assert!(graph.downcast::<Channel>(id).is_some());
        assert!(graph.downcast::<Pixels>(id).is_none());
        assert!(graph.downcast_mut::<Channel>(id).is_some());
    }

    #[test]
    fn nodes_of_filters_by_type() {
        let mut graph = ModelGraph::new();
        for node in [
            Box::new(Pixels::default()) as Box<dyn ModelObject>,
            Box::new(Channel::default()),
            Box::new(Channel::default()),
        ] {
            let id = graph.reserve();
            graph.install(id, node);
        }

        let channels: Vec<NodeId> = graph.nodes_of::<Channel>().map(|(id, _)| id).collect();
        assert_eq!(channels, vec![NodeId::from_index(1), NodeId::from_index(2)]);
    }

    #[test]
    fn take_vacates_slot() {
        let mut graph = ModelGraph::new();
        let id = graph.reserve();
        graph.install(id, Box::new(Channel::default()));

        assert!(graph.take(id).is_some());
        assert!(!graph.contains(id));
        assert!(graph.take(id).is_none());
    }

    #[test]
    fn back_link_to_missing_holder_is_refused() {
        const PIXELS: Lineage = &["Pixels"];
        let mut graph = ModelGraph::new();
        let back = BackLink::owner(NodeId::from_index(0), NodeId::from_index(1), PIXELS);
        assert!(!graph.apply_back_link(&back));

        let channel = graph.reserve();
        graph.install(channel, Box::new(Channel::default()));
        let back = BackLink::owner(channel, NodeId::from_index(9), PIXELS);
        assert!(graph.apply_back_link(&back));
        assert_eq!(graph.downcast::<Channel>(channel).unwrap().pixels(), Some(NodeId::from_index(9)));
    }
}
