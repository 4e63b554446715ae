//! Build and render contexts
//!
//! [`BuildContext`] is threaded through every `update` call of one
//! materialize pass. It owns nothing itself; it borrows the graph being
//! filled and the registry collecting identifiers and pending edges, so no
//! state outlives the pass.

use crate::config::RenderConfig;
use crate::element::{at_most_one, ID_ATTRIBUTE};
use crate::error::BuildError;
use crate::graph::ModelGraph;
use crate::object::{BackLink, Lineage, ModelObject};
use ome_registry::{ModelRegistry, NodeId, Reference, ReferenceKind};
use ome_tree::{ElementFactory, TreeUnit};
use tracing::{debug, warn};

/// Mutable state of one materialize pass
#[derive(Debug)]
pub struct BuildContext<'a> {
    graph: &'a mut ModelGraph,
    registry: &'a mut ModelRegistry,
}

impl<'a> BuildContext<'a> {
    /// Create context over a graph and registry
    #[inline]
    #[must_use]
    pub fn new(graph: &'a mut ModelGraph, registry: &'a mut ModelRegistry) -> Self {
        Self { graph, registry }
    }

    /// Build a new node of type `T` from `element`
    ///
    /// The node's slot is reserved before `update` runs so its handle can be
    /// registered and used as a reference source while it is populated.
    ///
    /// # Errors
    /// Propagates the node's [`BuildError`].
    pub fn build<T: ModelObject + Default>(&mut self, element: &TreeUnit) -> Result<NodeId, BuildError> {
        let this = self.graph.reserve();
        let mut node = T::default();
        node.update(this, element, self)?;
        self.graph.install(this, Box::new(node));
        Ok(this)
    }

    /// Build an owned child and point it back at its owner
    ///
    /// # Errors
    /// Propagates the child's [`BuildError`].
    pub fn build_owned<T: ModelObject + Default>(
        &mut self,
        owner: NodeId,
        owner_lineage: Lineage,
        element: &TreeUnit,
    ) -> Result<NodeId, BuildError> {
        let child = self.build::<T>(element)?;
        let back = BackLink::owner(child, owner, owner_lineage);
        if !self.graph.apply_back_link(&back) {
            debug!("{} keeps no owner reference for {:?}", child, owner_lineage);
        }
        Ok(child)
    }

    /// Read the required `ID` attribute and register the node under it
    ///
    /// A node that already has an identifier may be updated from a unit
    /// without one.
    ///
    /// # Errors
    /// [`BuildError::MissingRequiredIdentifier`] if neither the unit nor the
    /// node supplies an identifier.
    pub fn identify(
        &mut self,
        this: NodeId,
        element: &TreeUnit,
        current: &mut Option<String>,
        type_name: &'static str,
    ) -> Result<(), BuildError> {
        match element.attribute(ID_ATTRIBUTE) {
            Some(id) => {
                *current = Some(id.to_string());
                if let Some(previous) = self.registry.register(id, this) {
                    debug!("{} re-registered {} over {}", type_name, id, previous);
                }
                Ok(())
            }
            None if current.is_some() => Ok(()),
            None => Err(BuildError::MissingRequiredIdentifier(type_name)),
        }
    }

    /// Record every `<Kind ID=".."/>` child of `element` as a pending edge
    ///
    /// Reference units without an `ID` attribute are skipped.
    pub fn collect_references(&mut self, this: NodeId, element: &TreeUnit, kind: ReferenceKind) {
        for unit in element.children_named(kind.name()) {
            match unit.attribute(ID_ATTRIBUTE) {
                Some(target) => self.record_reference(this, Reference::new(kind, target)),
                None => warn!("{} under {} has no ID, skipped", kind, element.local_name()),
            }
        }
    }

    /// Record the single `<Kind ID=".."/>` child of `element`, if any
    ///
    /// # Errors
    /// [`BuildError::MultipleElementsWhereOneExpected`] if the reference
    /// occurs more than once.
    pub fn collect_single_reference(
        &mut self,
        this: NodeId,
        element: &TreeUnit,
        kind: ReferenceKind,
    ) -> Result<(), BuildError> {
        if let Some(unit) = at_most_one(element, kind.name())? {
            match unit.attribute(ID_ATTRIBUTE) {
                Some(target) => self.record_reference(this, Reference::new(kind, target)),
                None => warn!("{} under {} has no ID, skipped", kind, element.local_name()),
            }
        }
        Ok(())
    }

    /// Record one pending edge
    #[inline]
    pub fn record_reference(&mut self, source: NodeId, reference: Reference) {
        self.registry.record_pending(source, reference);
    }

    /// Graph being built
    #[inline]
    #[must_use]
    pub fn graph(&self) -> &ModelGraph {
        self.graph
    }

    /// Registry of this pass
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &ModelRegistry {
        self.registry
    }
}

/// Read-only state of one render pass
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    graph: &'a ModelGraph,
    factory: &'a ElementFactory,
    config: RenderConfig,
}

impl<'a> RenderContext<'a> {
    /// Create context
    #[inline]
    #[must_use]
    pub fn new(graph: &'a ModelGraph, factory: &'a ElementFactory, config: RenderConfig) -> Self {
        Self {
            graph,
            factory,
            config,
        }
    }

    /// Graph being rendered
    #[inline]
    #[must_use]
    pub fn graph(&self) -> &ModelGraph {
        self.graph
    }

    /// Rendering options
    #[inline]
    #[must_use]
    pub fn config(&self) -> RenderConfig {
        self.config
    }

    /// Create an empty unit through the factory
    #[inline]
    #[must_use]
    pub fn element(&self, namespace: &str, tag: &str) -> TreeUnit {
        self.factory.create(namespace, tag)
    }

    /// Element factory of this pass
    #[inline]
    #[must_use]
    pub fn factory(&self) -> &ElementFactory {
        self.factory
    }

    /// Create a unit holding only text
    ///
    /// Empty text leaves the unit without text, as it was read.
    #[must_use]
    pub fn text_element(&self, namespace: &str, tag: &str, text: &str) -> TreeUnit {
        let unit = self.element(namespace, tag);
        if text.is_empty() {
            unit
        } else {
            unit.with_text(text)
        }
    }

    /// Render a node, `None` if the handle is vacant
    #[must_use]
    pub fn render(&self, id: NodeId) -> Option<TreeUnit> {
        self.graph.get(id).map(|node| node.render(self))
    }

    /// Render owned children into `parent`, in order
    pub fn render_children<'i>(&self, parent: &mut TreeUnit, children: impl IntoIterator<Item = &'i NodeId>) {
        for unit in children.into_iter().filter_map(|&child| self.render(child)) {
            parent.append_child(unit);
        }
    }

    /// Emit resolved forward references as `<Kind ID=".."/>` children
    ///
    /// Does nothing unless [`RenderConfig::emit_references`] is set. Targets
    /// without an identifier are skipped.
    pub fn render_references<'i>(
        &self,
        parent: &mut TreeUnit,
        namespace: &str,
        kind: ReferenceKind,
        targets: impl IntoIterator<Item = &'i NodeId>,
    ) {
        if !self.config.emit_references {
            return;
        }
        for &target in targets {
            if let Some(id) = self.graph.get(target).and_then(|node| node.id()) {
                parent.append_child(self.element(namespace, kind.name()).with_attribute(ID_ATTRIBUTE, id));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IMAGE_REF: ReferenceKind = ReferenceKind::new("ImageRef");

    #[test]
    fn identify_registers_and_keeps_existing_id() {
        let mut graph = ModelGraph::new();
        let mut registry = ModelRegistry::new();
        let this = graph.reserve();
        let mut ctx = BuildContext::new(&mut graph, &mut registry);

        let mut id = None;
        let err = ctx.identify(this, &TreeUnit::new("Image"), &mut id, "Image").unwrap_err();
        assert_eq!(err, BuildError::MissingRequiredIdentifier("Image"));

        ctx.identify(this, &TreeUnit::new("Image").with_attribute("ID", "Image:0"), &mut id, "Image")
            .unwrap();
        assert_eq!(id.as_deref(), Some("Image:0"));
        assert_eq!(ctx.registry().lookup("Image:0"), Some(this));

        // Updating a node that already has an identifier needs none
        ctx.identify(this, &TreeUnit::new("Image"), &mut id, "Image").unwrap();
        assert_eq!(id.as_deref(), Some("Image:0"));
    }

    #[test]
    fn collect_references_skips_units_without_id() {
        let mut graph = ModelGraph::new();
        let mut registry = ModelRegistry::new();
        let this = graph.reserve();
        let element = TreeUnit::new("Dataset")
            .with_child(TreeUnit::new("ImageRef").with_attribute("ID", "Image:0"))
            .with_child(TreeUnit::new("ImageRef"))
            .with_child(TreeUnit::new("OME:ImageRef").with_attribute("ID", "Image:1"));

        BuildContext::new(&mut graph, &mut registry).collect_references(this, &element, IMAGE_REF);

        let targets: Vec<&str> = registry.pending_for(this).iter().map(Reference::target_id).collect();
        assert_eq!(targets, vec!["Image:0", "Image:1"]);
    }

    #[test]
    fn empty_text_renders_without_text() {
        let graph = ModelGraph::new();
        let factory = ElementFactory::new();
        let ctx = RenderContext::new(&graph, &factory, RenderConfig::default());

        assert_eq!(ctx.text_element(ome_tree::namespaces::OME, "Description", "").text(), None);
        assert_eq!(
            ctx.text_element(ome_tree::namespaces::OME, "Description", " x ").text(),
            Some(" x ")
        );
    }

    #[test]
    fn render_references_only_when_enabled() {
        let mut graph = ModelGraph::new();
        let mut registry = ModelRegistry::new();
        let image = BuildContext::new(&mut graph, &mut registry)
            .build::<crate::catalog::Image>(&TreeUnit::new("Image").with_attribute("ID", "Image:0"))
            .unwrap();
        let factory = ElementFactory::new();

        let mut unit = TreeUnit::new("Dataset");
        RenderContext::new(&graph, &factory, RenderConfig::default()).render_references(
            &mut unit,
            ome_tree::namespaces::OME,
            IMAGE_REF,
            &[image],
        );
        assert!(unit.children().is_empty());

        let config = RenderConfig::default().with_references(true);
        RenderContext::new(&graph, &factory, config).render_references(
            &mut unit,
            ome_tree::namespaces::OME,
            IMAGE_REF,
            &[image, NodeId::from_index(42)],
        );
        assert_eq!(unit.children().len(), 1);
        assert_eq!(unit.children()[0].attribute("ID"), Some("Image:0"));
    }
}
