//! OME Element Tree
//!
//! The generic tree form that OME documents are parsed into and rendered
//! back out of. The object graph never sees bytes; it only walks
//! [`TreeUnit`]s.
//!
//! # Core Concepts
//!
//! - [`TreeUnit`]: one element (tag, namespace, attributes, children, text)
//! - [`ElementFactory`]: creates units keyed by (namespace, tag name)
//! - [`codec`]: JSON / YAML serializations of a whole tree
//!
//! # Example
//!
//! ```rust
//! use ome_tree::{ElementFactory, TreeUnit};
//!
//! let factory = ElementFactory::new();
//! let mut image = factory.create(ome_tree::namespaces::OME, "Image");
//! image.set_attribute("ID", "Image:0");
//!
//! let parsed = TreeUnit::new("ome:Image").with_attribute("ID", "Image:0");
//! assert_eq!(parsed.local_name(), "Image");
//! assert_eq!(parsed.attribute("ID"), image.attribute("ID"));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod codec;
mod factory;
mod unit;

pub use codec::{DocumentFormat, TreeError};
pub use factory::{namespaces, ElementFactory};
pub use unit::{strip_prefix, TreeUnit};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
