//! Whole-document entry points
//!
//! One [`materialize`] call creates a fresh graph and registry, walks the
//! tree, runs the resolution pass and drops the registry. Nothing is kept
//! between calls.

use crate::catalog::Ome;
use crate::config::{ModelConfig, RenderConfig};
use crate::context::{BuildContext, RenderContext};
use crate::error::{BuildError, ModelResult};
use crate::graph::ModelGraph;
use crate::object::ModelObject;
use crate::resolve::{resolve_with, ResolutionReport};
use ome_registry::{ModelRegistry, NodeId};
use ome_tree::{codec, namespaces, ElementFactory, TreeUnit};
use std::path::Path;
use tracing::info;

/// A materialized document: its node graph and root
#[derive(Debug)]
pub struct Model {
    graph: ModelGraph,
    root: NodeId,
}

impl Model {
    /// Materialize and apply the configured reference policy
    ///
    /// # Errors
    /// Build errors, or [`ResolveError::Unresolved`] when
    /// [`ModelConfig::strict_references`] is set and any edge dangles.
    ///
    /// [`ResolveError::Unresolved`]: crate::ResolveError::Unresolved
    pub fn load(root: &TreeUnit, config: &ModelConfig) -> ModelResult<(Self, ResolutionReport)> {
        let (model, report) = materialize_with(root, config)?;
        if config.strict_references {
            report.ensure_complete()?;
        }
        Ok((model, report))
    }

    /// Read a document file and [`load`](Self::load) it
    ///
    /// The format is chosen by file extension.
    ///
    /// # Errors
    /// [`ModelError::Tree`] if the file cannot be read or decoded, otherwise
    /// as [`load`](Self::load).
    ///
    /// [`ModelError::Tree`]: crate::ModelError::Tree
    pub fn read(path: impl AsRef<Path>, config: &ModelConfig) -> ModelResult<(Self, ResolutionReport)> {
        let tree = codec::read(path)?;
        Self::load(&tree, config)
    }

    /// Root node
    #[must_use]
    pub fn root(&self) -> Option<&Ome> {
        self.graph.downcast::<Ome>(self.root)
    }

    /// Root handle
    #[inline]
    #[must_use]
    pub fn root_id(&self) -> NodeId {
        self.root
    }

    /// Node graph
    #[inline]
    #[must_use]
    pub fn graph(&self) -> &ModelGraph {
        &self.graph
    }

    /// Node graph, mutably
    #[inline]
    pub fn graph_mut(&mut self) -> &mut ModelGraph {
        &mut self.graph
    }

    /// Node of type `T` whose document identifier is `id`
    #[must_use]
    pub fn find_by_id<T: ModelObject>(&self, id: &str) -> Option<(NodeId, &T)> {
        self.graph.nodes_of::<T>().find(|(_, node)| node.id() == Some(id))
    }
}

/// Materialize a document with default options
///
/// # Errors
/// Any [`BuildError`] raised while walking the tree.
pub fn materialize(root: &TreeUnit) -> Result<(Model, ResolutionReport), BuildError> {
    materialize_with(root, &ModelConfig::default())
}

/// Materialize a document
///
/// Unresolved references never fail this call; they are counted in the
/// returned report.
///
/// # Errors
/// Any [`BuildError`] raised while walking the tree.
pub fn materialize_with(root: &TreeUnit, config: &ModelConfig) -> Result<(Model, ResolutionReport), BuildError> {
    let mut graph = ModelGraph::new();
    let mut registry = ModelRegistry::new();

    let root_id = BuildContext::new(&mut graph, &mut registry).build::<Ome>(root)?;
    let identified = registry.len();
    let pending = registry.pending_count();
    let report = resolve_with(&mut graph, &mut registry, config);

    info!(
        nodes = graph.len(),
        identified,
        pending,
        linked = report.linked,
        unresolved = report.unresolved_count,
        "materialized document"
    );
    Ok((Model { graph, root: root_id }, report))
}

/// Render a model with default options
#[must_use]
pub fn serialize(model: &Model) -> TreeUnit {
    serialize_with(model, RenderConfig::default())
}

/// Render a model
#[must_use]
pub fn serialize_with(model: &Model, config: RenderConfig) -> TreeUnit {
    let factory = ElementFactory::new();
    let ctx = RenderContext::new(&model.graph, &factory, config);
    ctx.render(model.root)
        .unwrap_or_else(|| factory.create(namespaces::OME, Ome::TYPE_NAME))
}
