//! OME Registry
//!
//! Per-document bookkeeping for deferred reference resolution.
//!
//! # Overview
//!
//! The registry crate provides:
//! - **NodeId**: arena handle naming one node of a materialized graph
//! - **Reference**: a typed edge descriptor carrying only a target identifier
//! - **ModelRegistry**: identifier → node index plus the ledger of pending edges
//! - **UniqueList**: order-preserving collection with set membership
//!
//! # Example
//!
//! ```rust
//! use ome_registry::{ModelRegistry, NodeId, Reference, ReferenceKind};
//!
//! const IMAGE_REF: ReferenceKind = ReferenceKind::new("ImageRef");
//!
//! let mut registry = ModelRegistry::new();
//! let dataset = NodeId::from_index(0);
//! let image = NodeId::from_index(1);
//!
//! // Forward reference: recorded before the target is seen
//! registry.record_pending(dataset, Reference::new(IMAGE_REF, "Image:0"));
//! registry.register("Image:0", image);
//!
//! let (source, reference) = registry.pending_edges().next().unwrap();
//! assert_eq!(source, dataset);
//! assert_eq!(registry.lookup(reference.target_id()), Some(image));
//! ```

#![warn(missing_docs)]

pub mod node_id;
pub mod reference;
pub mod registry;
pub mod unique_list;

// Re-exports
pub use node_id::NodeId;
pub use reference::{Reference, ReferenceKind};
pub use registry::{ModelRegistry, PendingEdges};
pub use unique_list::UniqueList;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for registry operations
    pub use crate::{ModelRegistry, NodeId, Reference, ReferenceKind, UniqueList};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
