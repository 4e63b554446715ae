//! OME Model
//!
//! Typed object graph for OME metadata documents.
//!
//! # Overview
//!
//! - [`materialize`]: walk a [`TreeUnit`] into a [`Model`], then resolve
//!   every cross-reference in one sequential pass
//! - [`ModelObject`]: the contract each node type implements (update,
//!   render, link)
//! - [`ModelGraph`]: arena owning every node of one document
//! - [`ResolutionReport`]: count and list of references left unresolved
//! - [`OrderedPairs`]: ordered key/value list held by map annotations
//! - [`serialize`]: render the owned structure back to a tree
//!
//! # Example
//!
//! ```rust
//! use ome_model::{materialize, catalog::Image};
//! use ome_tree::{namespaces, TreeUnit};
//!
//! let document = TreeUnit::with_namespace(namespaces::OME, "OME")
//!     .with_child(
//!         TreeUnit::with_namespace(namespaces::OME, "Image")
//!             .with_attribute("ID", "Image:0")
//!             .with_child(TreeUnit::new("ROIRef").with_attribute("ID", "ROI:missing")),
//!     );
//!
//! let (model, report) = materialize(&document).unwrap();
//! assert_eq!(report.unresolved_count, 1);
//!
//! let (_, image) = model.find_by_id::<Image>("Image:0").unwrap();
//! assert!(image.linked_rois().is_empty());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod catalog;
mod config;
mod context;
mod document;
mod element;
mod error;
mod graph;
mod object;
mod pairs;
mod resolve;

// Re-exports
pub use config::{ModelConfig, RenderConfig};
pub use context::{BuildContext, RenderContext};
pub use document::{materialize, materialize_with, serialize, serialize_with, Model};
pub use element::ID_ATTRIBUTE;
pub use error::{BuildError, ModelError, ModelResult, ResolveError};
pub use graph::ModelGraph;
pub use object::{AsAny, BackLink, Lineage, Link, LinkTarget, ModelObject};
pub use pairs::{OrderedPairs, KEY_ATTRIBUTE, PAIR_TAG};
pub use resolve::{resolve, resolve_with, DanglingReference, ResolutionReport};

pub use ome_tree::TreeUnit;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with a materialized model
    pub use crate::{materialize, serialize, Model, ModelConfig, ModelObject, ResolutionReport};
    pub use ome_registry::NodeId;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
