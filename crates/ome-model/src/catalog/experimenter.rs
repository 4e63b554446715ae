//! People who own and acquire data

use super::annotation::ANNOTATION;
use super::{ANNOTATION_REF, EXPERIMENTER_REF};
use crate::context::{BuildContext, RenderContext};
use crate::element::{check_tag, read_attribute, write_attribute, ID_ATTRIBUTE};
use crate::error::BuildError;
use crate::object::{BackLink, Lineage, Link, ModelObject};
use ome_registry::{NodeId, UniqueList};
use ome_tree::{namespaces, TreeUnit};

/// A person
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Experimenter {
    id: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    annotations: UniqueList<NodeId>,
    images: UniqueList<NodeId>,
}

impl Experimenter {
    /// Element tag
    pub const TYPE_NAME: &'static str = "Experimenter";
    /// Type chain
    pub const LINEAGE: Lineage = &[Self::TYPE_NAME];

    /// First name
    #[inline]
    #[must_use]
    pub fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref()
    }

    /// Last name
    #[inline]
    #[must_use]
    pub fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref()
    }

    /// Email address
    #[inline]
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Linked annotations
    #[inline]
    #[must_use]
    pub fn linked_annotations(&self) -> &[NodeId] {
        self.annotations.as_slice()
    }

    /// Images acquired by this experimenter
    #[inline]
    #[must_use]
    pub fn images(&self) -> &[NodeId] {
        self.images.as_slice()
    }
}

impl ModelObject for Experimenter {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn lineage(&self) -> Lineage {
        Self::LINEAGE
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn update(&mut self, this: NodeId, element: &TreeUnit, ctx: &mut BuildContext<'_>) -> Result<(), BuildError> {
        check_tag(element, Self::TYPE_NAME);
        ctx.identify(this, element, &mut self.id, Self::TYPE_NAME)?;
        read_attribute(element, "FirstName", &mut self.first_name)?;
        read_attribute(element, "LastName", &mut self.last_name)?;
        read_attribute(element, "Email", &mut self.email)?;
        ctx.collect_references(this, element, ANNOTATION_REF);
        Ok(())
    }

    fn render(&self, ctx: &RenderContext<'_>) -> TreeUnit {
        let mut unit = ctx.element(namespaces::OME, Self::TYPE_NAME);
        write_attribute(&mut unit, ID_ATTRIBUTE, self.id.as_ref());
        write_attribute(&mut unit, "FirstName", self.first_name.as_ref());
        write_attribute(&mut unit, "LastName", self.last_name.as_ref());
        write_attribute(&mut unit, "Email", self.email.as_ref());
        ctx.render_references(&mut unit, namespaces::SA, ANNOTATION_REF, &self.annotations);
        unit
    }

    fn try_link(&mut self, link: &mut Link<'_>) -> bool {
        match link.claim(ANNOTATION_REF, ANNOTATION) {
            Some(target) => {
                self.annotations.add(target);
                link.back_link(Self::LINEAGE);
                true
            }
            None => false,
        }
    }

    fn accept_back_link(&mut self, back: &BackLink) -> bool {
        if back.via == Some(EXPERIMENTER_REF) && back.from_is(super::Image::TYPE_NAME) {
            self.images.add(back.from);
            return true;
        }
        false
    }
}
