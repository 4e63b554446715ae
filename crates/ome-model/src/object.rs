//! Node contract
//!
//! Every graph member implements [`ModelObject`]: build from a tree unit,
//! render back to one, and take part in the link protocol.
//!
//! # Link protocol
//!
//! After the whole document is walked the resolver hands each pending
//! [`Reference`] to its source node's [`ModelObject::try_link`]. A concrete
//! type first offers the request to the levels it embeds (base first); the
//! first level that recognizes the reference kind claims it and returns
//! `true`. Claiming levels may ask for an inverse pointer on the target with
//! [`Link::back_link`]; the resolver applies it via
//! [`ModelObject::accept_back_link`] right after the claim.

use crate::context::{BuildContext, RenderContext};
use crate::error::BuildError;
use ome_registry::{NodeId, Reference, ReferenceKind};
use ome_tree::TreeUnit;
use std::any::Any;
use std::fmt::Debug;

/// Type chain of a node, most-derived type first
pub type Lineage = &'static [&'static str];

/// Upcast support for typed access into the graph
pub trait AsAny: Any {
    /// Borrow as `Any`
    fn as_any(&self) -> &dyn Any;

    /// Borrow mutably as `Any`
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A member of the object graph
pub trait ModelObject: AsAny + Debug {
    /// Element tag this type is read from and rendered as
    fn type_name(&self) -> &'static str;

    /// Type chain used for "is-a" checks during linking
    fn lineage(&self) -> Lineage;

    /// Document identifier, if this node has one
    fn id(&self) -> Option<&str> {
        None
    }

    /// Populate fields from `element`
    ///
    /// Nothing is removed, only added or updated. `this` is the node's own
    /// handle, already reserved in the graph, so it can be registered and
    /// recorded as a reference source before the node is installed.
    ///
    /// # Errors
    /// Any [`BuildError`] aborts the whole materialize call.
    fn update(
        &mut self,
        this: NodeId,
        element: &TreeUnit,
        ctx: &mut BuildContext<'_>,
    ) -> Result<(), BuildError>;

    /// Render this node and its owned children as a new tree unit
    fn render(&self, ctx: &RenderContext<'_>) -> TreeUnit;

    /// Bind one pending reference to its resolved target
    ///
    /// Returns `false` if no level of this type recognizes the reference.
    fn try_link(&mut self, link: &mut Link<'_>) -> bool;

    /// Set an inverse pointer requested by a forward edge
    ///
    /// Returns `false` if this type keeps no back-reference for the source.
    fn accept_back_link(&mut self, _back: &BackLink) -> bool {
        false
    }
}

/// Resolved target of a link request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkTarget {
    /// Target node
    pub id: NodeId,
    /// Target's type chain
    pub lineage: Lineage,
}

impl LinkTarget {
    /// Check whether the target is-a `type_name`
    #[inline]
    #[must_use]
    pub fn is(&self, type_name: &str) -> bool {
        self.lineage.contains(&type_name)
    }
}

/// One pending reference offered to its source node
#[derive(Debug)]
pub struct Link<'a> {
    source: NodeId,
    reference: &'a Reference,
    target: LinkTarget,
    back_links: Vec<BackLink>,
}

impl<'a> Link<'a> {
    /// Create request
    #[inline]
    #[must_use]
    pub fn new(source: NodeId, reference: &'a Reference, target: LinkTarget) -> Self {
        Self {
            source,
            reference,
            target,
            back_links: Vec::new(),
        }
    }

    /// Source node
    #[inline]
    #[must_use]
    pub fn source(&self) -> NodeId {
        self.source
    }

    /// Reference being resolved
    #[inline]
    #[must_use]
    pub fn reference(&self) -> &Reference {
        self.reference
    }

    /// Resolved target
    #[inline]
    #[must_use]
    pub fn target(&self) -> LinkTarget {
        self.target
    }

    /// Target handle if the reference is of `kind` and the target is-a `type_name`
    ///
    /// A matching kind with a target of the wrong type is not claimable.
    #[must_use]
    pub fn claim(&self, kind: ReferenceKind, type_name: &str) -> Option<NodeId> {
        if !self.reference.is(kind) {
            return None;
        }
        if !self.target.is(type_name) {
            tracing::debug!(
                "{} target {} is a {:?}, expected {}",
                kind,
                self.reference.target_id(),
                self.target.lineage,
                type_name
            );
            return None;
        }
        Some(self.target.id)
    }

    /// Ask for an inverse pointer from the target back to the source
    pub fn back_link(&mut self, source_lineage: Lineage) {
        self.back_links.push(BackLink {
            holder: self.target.id,
            from: self.source,
            from_lineage: source_lineage,
            via: Some(self.reference.kind()),
        });
    }

    /// Requested inverse pointers
    #[must_use]
    pub fn into_back_links(self) -> Vec<BackLink> {
        self.back_links
    }
}

/// Inverse pointer to set on `holder`, naming `from`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackLink {
    /// Node that stores the back-reference
    pub holder: NodeId,
    /// Node the back-reference points at
    pub from: NodeId,
    /// Type chain of `from`
    pub from_lineage: Lineage,
    /// Reference kind that established the edge, `None` for ownership
    pub via: Option<ReferenceKind>,
}

impl BackLink {
    /// Back-reference from an owned child to its owner
    #[inline]
    #[must_use]
    pub fn owner(child: NodeId, owner: NodeId, owner_lineage: Lineage) -> Self {
        Self {
            holder: child,
            from: owner,
            from_lineage: owner_lineage,
            via: None,
        }
    }

    /// Check whether the pointed-at node is-a `type_name`
    #[inline]
    #[must_use]
    pub fn from_is(&self, type_name: &str) -> bool {
        self.from_lineage.contains(&type_name)
    }

    /// Check whether this back-reference comes from an ownership edge
    #[inline]
    #[must_use]
    pub fn is_ownership(&self) -> bool {
        self.via.is_none()
    }
}
