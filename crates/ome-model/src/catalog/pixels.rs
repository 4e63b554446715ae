//! Pixel data description and channels

use super::annotation::ANNOTATION;
use super::ANNOTATION_REF;
use crate::context::{BuildContext, RenderContext};
use crate::element::{check_tag, read_attribute, write_attribute, ID_ATTRIBUTE};
use crate::error::BuildError;
use crate::object::{BackLink, Lineage, Link, ModelObject};
use ome_registry::{NodeId, UniqueList};
use ome_tree::{namespaces, TreeUnit};

/// Dimensions and layout of an image's pixel data
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pixels {
    id: Option<String>,
    dimension_order: Option<String>,
    pixel_type: Option<String>,
    size_x: Option<u32>,
    size_y: Option<u32>,
    size_z: Option<u32>,
    size_c: Option<u32>,
    size_t: Option<u32>,
    channels: Vec<NodeId>,
    annotations: UniqueList<NodeId>,
}

impl Pixels {
    /// Element tag
    pub const TYPE_NAME: &'static str = "Pixels";
    /// Type chain
    pub const LINEAGE: Lineage = &[Self::TYPE_NAME];

    /// Axis order, e.g. `XYZCT`
    #[inline]
    #[must_use]
    pub fn dimension_order(&self) -> Option<&str> {
        self.dimension_order.as_deref()
    }

    /// Pixel type, e.g. `uint16`
    #[inline]
    #[must_use]
    pub fn pixel_type(&self) -> Option<&str> {
        self.pixel_type.as_deref()
    }

    /// Size along X
    #[inline]
    #[must_use]
    pub fn size_x(&self) -> Option<u32> {
        self.size_x
    }

    /// Size along Y
    #[inline]
    #[must_use]
    pub fn size_y(&self) -> Option<u32> {
        self.size_y
    }

    /// Number of focal planes
    #[inline]
    #[must_use]
    pub fn size_z(&self) -> Option<u32> {
        self.size_z
    }

    /// Number of channels
    #[inline]
    #[must_use]
    pub fn size_c(&self) -> Option<u32> {
        self.size_c
    }

    /// Number of time points
    #[inline]
    #[must_use]
    pub fn size_t(&self) -> Option<u32> {
        self.size_t
    }

    /// Owned channels in document order
    #[inline]
    #[must_use]
    pub fn channels(&self) -> &[NodeId] {
        &self.channels
    }

    /// Linked annotations
    #[inline]
    #[must_use]
    pub fn linked_annotations(&self) -> &[NodeId] {
        self.annotations.as_slice()
    }

    /// Link an annotation; the annotation's back-reference is left alone
    pub fn link_annotation(&mut self, annotation: NodeId) -> bool {
        self.annotations.add(annotation)
    }

    /// Unlink an annotation
    pub fn unlink_annotation(&mut self, annotation: NodeId) -> bool {
        self.annotations.remove(&annotation)
    }
}

impl ModelObject for Pixels {
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
        read_attribute(element, "DimensionOrder", &mut self.dimension_order)?;
        read_attribute(element, "Type", &mut self.pixel_type)?;
        read_attribute(element, "SizeX", &mut self.size_x)?;
        read_attribute(element, "SizeY", &mut self.size_y)?;
        read_attribute(element, "SizeZ", &mut self.size_z)?;
        read_attribute(element, "SizeC", &mut self.size_c)?;
        read_attribute(element, "SizeT", &mut self.size_t)?;
        for child in element.children_named(Channel::TYPE_NAME) {
            let channel = ctx.build_owned::<Channel>(this, Self::LINEAGE, child)?;
            self.channels.push(channel);
        }
        ctx.collect_references(this, element, ANNOTATION_REF);
        Ok(())
    }

    fn render(&self, ctx: &RenderContext<'_>) -> TreeUnit {
        let mut unit = ctx.element(namespaces::OME, Self::TYPE_NAME);
        write_attribute(&mut unit, ID_ATTRIBUTE, self.id.as_ref());
        write_attribute(&mut unit, "DimensionOrder", self.dimension_order.as_ref());
        write_attribute(&mut unit, "Type", self.pixel_type.as_ref());
        write_attribute(&mut unit, "SizeX", self.size_x.as_ref());
        write_attribute(&mut unit, "SizeY", self.size_y.as_ref());
        write_attribute(&mut unit, "SizeZ", self.size_z.as_ref());
        write_attribute(&mut unit, "SizeC", self.size_c.as_ref());
        write_attribute(&mut unit, "SizeT", self.size_t.as_ref());
        ctx.render_children(&mut unit, &self.channels);
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
}

/// One channel of a pixel set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Channel {
    id: Option<String>,
    name: Option<String>,
    samples_per_pixel: Option<u32>,
    annotations: UniqueList<NodeId>,
    pixels: Option<NodeId>,
}

impl Channel {
    /// Element tag
    pub const TYPE_NAME: &'static str = "Channel";
    /// Type chain
    pub const LINEAGE: Lineage = &[Self::TYPE_NAME];

    /// Channel name
    #[inline]
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Samples per pixel
    #[inline]
    #[must_use]
    pub fn samples_per_pixel(&self) -> Option<u32> {
        self.samples_per_pixel
    }

    /// Linked annotations
    #[inline]
    #[must_use]
    pub fn linked_annotations(&self) -> &[NodeId] {
        self.annotations.as_slice()
    }

    /// Owning pixel set
    #[inline]
    #[must_use]
    pub fn pixels(&self) -> Option<NodeId> {
        self.pixels
    }
}

impl ModelObject for Channel {
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
        read_attribute(element, "SamplesPerPixel", &mut self.samples_per_pixel)?;
        ctx.collect_references(this, element, ANNOTATION_REF);
        Ok(())
    }

    fn render(&self, ctx: &RenderContext<'_>) -> TreeUnit {
        let mut unit = ctx.element(namespaces::OME, Self::TYPE_NAME);
        write_attribute(&mut unit, ID_ATTRIBUTE, self.id.as_ref());
        write_attribute(&mut unit, "Name", self.name.as_ref());
        write_attribute(&mut unit, "SamplesPerPixel", self.samples_per_pixel.as_ref());
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
        if back.is_ownership() && back.from_is(Pixels::TYPE_NAME) {
            self.pixels = Some(back.from);
            return true;
        }
        false
    }
}
