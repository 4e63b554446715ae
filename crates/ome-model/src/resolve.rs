//! Resolution pass
//!
//! Drains the pending ledger after the tree walk and offers every edge to
//! its source node, in ledger order, exactly once.

use crate::config::ModelConfig;
use crate::error::ResolveError;
use crate::graph::ModelGraph;
use crate::object::{Link, LinkTarget};
use ome_registry::{ModelRegistry, NodeId, Reference, ReferenceKind};
use serde::Serialize;
use tracing::{debug, error, warn};

/// A reference whose target identifier was never registered
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingReference {
    /// Source node handle
    pub source: NodeId,
    /// Source node type
    pub source_type: &'static str,
    /// Source node identifier, if it has one
    pub source_id: Option<String>,
    /// Reference category
    pub kind: ReferenceKind,
    /// Identifier that could not be found
    pub target_id: String,
}

/// Outcome of one resolution pass
///
/// A non-zero `unresolved_count` is not an error by itself; callers decide
/// with [`ensure_complete`](Self::ensure_complete).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionReport {
    /// Edges whose source or target could not be found
    pub unresolved_count: u32,
    /// Dangling edges, when diagnostics are collected
    pub dangling: Vec<DanglingReference>,
    /// Edges claimed by their source node
    pub linked: u32,
}

impl ResolutionReport {
    /// Check whether every edge found its target
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unresolved_count == 0
    }

    /// Fail if any edge was left unresolved
    ///
    /// # Errors
    /// [`ResolveError::Unresolved`] carrying the unresolved count.
    pub fn ensure_complete(&self) -> Result<(), ResolveError> {
        if self.is_complete() {
            Ok(())
        } else {
            Err(ResolveError::Unresolved {
                count: self.unresolved_count,
            })
        }
    }

    fn add_unresolved(&mut self, count: usize) {
        let count = u32::try_from(count).unwrap_or(u32::MAX);
        self.unresolved_count = self.unresolved_count.saturating_add(count);
    }
}

/// Resolve every pending edge with default options
pub fn resolve(graph: &mut ModelGraph, registry: &mut ModelRegistry) -> ResolutionReport {
    resolve_with(graph, registry, &ModelConfig::default())
}

/// Resolve every pending edge
///
/// The ledger is drained, so a second call finds nothing to do.
pub fn resolve_with(graph: &mut ModelGraph, registry: &mut ModelRegistry, config: &ModelConfig) -> ResolutionReport {
    let mut report = ResolutionReport::default();

    for (source, references) in registry.take_pending() {
        if !graph.contains(source) {
            error!("{} pending reference(s) from missing source {}", references.len(), source);
            report.add_unresolved(references.len());
            continue;
        }
        for reference in &references {
            match registry.lookup(reference.target_id()) {
                Some(target) => resolve_edge(graph, source, reference, target, &mut report),
                None => {
                    warn!("dangling reference {} from {}", reference, source);
                    report.add_unresolved(1);
                    if config.collect_diagnostics {
                        report.dangling.push(dangling(graph, source, reference));
                    }
                }
            }
        }
    }

    report
}

fn resolve_edge(
    graph: &mut ModelGraph,
    source: NodeId,
    reference: &Reference,
    target: NodeId,
    report: &mut ResolutionReport,
) {
    let Some(lineage) = graph.get(target).map(|node| node.lineage()) else {
        warn!("{} registered at vacant {}", reference.target_id(), target);
        report.add_unresolved(1);
        return;
    };

    let mut link = Link::new(source, reference, LinkTarget { id: target, lineage });
    let claimed = graph.get_mut(source).is_some_and(|node| node.try_link(&mut link));
    if !claimed {
        debug!("{} from {} not claimed", reference, source);
        return;
    }

    report.linked = report.linked.saturating_add(1);
    for back in link.into_back_links() {
        if !graph.apply_back_link(&back) {
            debug!("{} keeps no back-reference for {}", back.holder, reference);
        }
    }
}

fn dangling(graph: &ModelGraph, source: NodeId, reference: &Reference) -> DanglingReference {
    let node = graph.get(source);
    DanglingReference {
        source,
        source_type: node.map_or("", |node| node.type_name()),
        source_id: node.and_then(|node| node.id()).map(str::to_string),
        kind: reference.kind(),
        target_id: reference.target_id().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Dataset, Image, IMAGE_REF};
    use crate::context::BuildContext;
    use ome_tree::TreeUnit;

    fn build_pair(graph: &mut ModelGraph, registry: &mut ModelRegistry, target: &str) -> (NodeId, NodeId) {
        let mut ctx = BuildContext::new(graph, registry);
        let dataset = ctx
            .build::<Dataset>(
                &TreeUnit::new("Dataset")
                    .with_attribute("ID", "Dataset:0")
                    .with_child(TreeUnit::new("ImageRef").with_attribute("ID", target)),
            )
            .unwrap();
        let image = ctx
            .build::<Image>(&TreeUnit::new("Image").with_attribute("ID", "Image:0"))
            .unwrap();
        (dataset, image)
    }

    #[test]
    fn forward_reference_links_both_ways() {
        let mut graph = ModelGraph::new();
        let mut registry = ModelRegistry::new();
        let (dataset, image) = build_pair(&mut graph, &mut registry, "Image:0");

        let report = resolve(&mut graph, &mut registry);

        assert!(report.is_complete());
        assert_eq!(report.linked, 1);
        assert_eq!(graph.downcast::<Dataset>(dataset).unwrap().linked_images(), &[image]);
        assert_eq!(graph.downcast::<Image>(image).unwrap().datasets(), &[dataset]);
    }

    #[test]
    fn dangling_reference_is_counted_and_described() {
        let mut graph = ModelGraph::new();
        let mut registry = ModelRegistry::new();
        let (dataset, _) = build_pair(&mut graph, &mut registry, "X");

        let report = resolve(&mut graph, &mut registry);

        assert_eq!(report.unresolved_count, 1);
        assert_eq!(report.linked, 0);
        assert_eq!(
            report.dangling,
            vec![DanglingReference {
                source: dataset,
                source_type: "Dataset",
                source_id: Some("Dataset:0".to_string()),
                kind: IMAGE_REF,
                target_id: "X".to_string(),
            }]
        );
        assert!(graph.downcast::<Dataset>(dataset).unwrap().linked_images().is_empty());
        assert_eq!(report.ensure_complete(), Err(ResolveError::Unresolved { count: 1 }));
    }

    #[test]
    fn diagnostics_can_be_turned_off() {
        let mut graph = ModelGraph::new();
        let mut registry = ModelRegistry::new();
        build_pair(&mut graph, &mut registry, "X");

        let config = ModelConfig::new().with_diagnostics(false);
        let report = resolve_with(&mut graph, &mut registry, &config);

        assert_eq!(report.unresolved_count, 1);
        assert!(report.dangling.is_empty());
    }

    #[test]
    fn missing_source_counts_every_edge() {
        let mut graph = ModelGraph::new();
        let mut registry = ModelRegistry::new();
        let ghost = NodeId::from_index(7);
        registry.record_pending(ghost, Reference::new(IMAGE_REF, "Image:0"));
        registry.record_pending(ghost, Reference::new(IMAGE_REF, "Image:1"));

        let report = resolve(&mut graph, &mut registry);

        assert_eq!(report.unresolved_count, 2);
        assert!(report.dangling.is_empty());
    }

    #[test]
    fn found_but_unclaimed_is_not_counted() {
        let mut graph = ModelGraph::new();
        let mut registry = ModelRegistry::new();
        let (dataset, _) = build_pair(&mut graph, &mut registry, "Image:0");
        // An ImageRef aimed at a dataset is found but no level claims it
        registry.record_pending(dataset, Reference::new(IMAGE_REF, "Dataset:0"));

        let report = resolve(&mut graph, &mut registry);

        assert_eq!(report.unresolved_count, 0);
        assert_eq!(report.linked, 1);
    }

    #[test]
    fn ledger_is_drained() {
        let mut graph = ModelGraph::new();
        let mut registry = ModelRegistry::new();
        build_pair(&mut graph, &mut registry, "X");

        resolve(&mut graph, &mut registry);
        let second = resolve(&mut graph, &mut registry);

        assert_eq!(registry.pending_count(), 0);
        assert_eq!(second, ResolutionReport::default());
    }
}
