//! Datasets: named groups of images

use super::annotation::ANNOTATION;
use super::{Image, ANNOTATION_REF, IMAGE_REF};
use crate::context::{BuildContext, RenderContext};
use crate::element::{check_tag, read_attribute, read_text, write_attribute, ID_ATTRIBUTE};
use crate::error::BuildError;
use crate::object::{Lineage, Link, ModelObject};
use ome_registry::{NodeId, UniqueList};
use ome_tree::{namespaces, TreeUnit};

const DESCRIPTION: &str = "Description";

/// A named group of images
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    id: Option<String>,
    name: Option<String>,
    description: Option<String>,
    images: UniqueList<NodeId>,
    annotations: UniqueList<NodeId>,
}

impl Dataset {
    /// Element tag
    pub const TYPE_NAME: &'static str = "Dataset";
    /// Type chain
    pub const LINEAGE: Lineage = &[Self::TYPE_NAME];

    /// Display name
    #[inline]
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Free text description
    #[inline]
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Linked images
    #[inline]
    #[must_use]
    pub fn linked_images(&self) -> &[NodeId] {
        self.images.as_slice()
    }

    /// Link an image; the image's back-reference is left alone
    pub fn link_image(&mut self, image: NodeId) -> bool {
        self.images.add(image)
    }

    /// Unlink an image
    pub fn unlink_image(&mut self, image: NodeId) -> bool {
        self.images.remove(&image)
    }

    /// Linked annotations
    #[inline]
    #[must_use]
    pub fn linked_annotations(&self) -> &[NodeId] {
        self.annotations.as_slice()
    }
}

impl ModelObject for Dataset {
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
        read_attribute(element, "Name", &mut self.name)?;
        read_text(element, DESCRIPTION, &mut self.description)?;
        ctx.collect_references(this, element, IMAGE_REF);
        ctx.collect_references(this, element, ANNOTATION_REF);
        Ok(())
    }

    fn render(&self, ctx: &RenderContext<'_>) -> TreeUnit {
        let mut unit = ctx.element(namespaces::OME, Self::TYPE_NAME);
        write_attribute(&mut unit, ID_ATTRIBUTE, self.id.as_ref());
        write_attribute(&mut unit, "Name", self.name.as_ref());
        if let Some(description) = &self.description {
            unit.append_child(ctx.text_element(namespaces::OME, DESCRIPTION, description));
        }
        ctx.render_references(&mut unit, namespaces::OME, IMAGE_REF, &self.images);
        ctx.render_references(&mut unit, namespaces::SA, ANNOTATION_REF, &self.annotations);
        unit
    }

    fn try_link(&mut self, link: &mut Link<'_>) -> bool {
        if let Some(target) = link.claim(IMAGE_REF, Image::TYPE_NAME) {
            self.images.add(target);
        } else if let Some(target) = link.claim(ANNOTATION_REF, ANNOTATION) {
            self.annotations.add(target);
        } else {
            return false;
        }
        link.back_link(Self::LINEAGE);
        true
    }
}
