//! Document root and the annotation container

use super::{
    CommentAnnotation, Dataset, Experimenter, Image, LongAnnotation, MapAnnotation, Roi, TagAnnotation,
};
use crate::context::{BuildContext, RenderContext};
use crate::element::{at_most_one, check_tag, read_attribute, write_attribute};
use crate::error::BuildError;
use crate::object::{Lineage, Link, ModelObject};
use ome_registry::NodeId;
use ome_tree::{namespaces, TreeUnit};
use tracing::debug;

/// Document root
///
/// Owns every top-level node. Carries no identifier and takes no part in
/// linking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ome {
    uuid: Option<String>,
    creator: Option<String>,
    datasets: Vec<NodeId>,
    experimenters: Vec<NodeId>,
    images: Vec<NodeId>,
    structured_annotations: Option<NodeId>,
    rois: Vec<NodeId>,
}

impl Ome {
    /// Element tag
    pub const TYPE_NAME: &'static str = "OME";
    /// Type chain
    pub const LINEAGE: Lineage = &[Self::TYPE_NAME];

    /// Document UUID
    #[inline]
    #[must_use]
    pub fn uuid(&self) -> Option<&str> {
        self.uuid.as_deref()
    }

    /// Software that wrote the document
    #[inline]
    #[must_use]
    pub fn creator(&self) -> Option<&str> {
        self.creator.as_deref()
    }

    /// Owned datasets
    #[inline]
    #[must_use]
    pub fn datasets(&self) -> &[NodeId] {
        &self.datasets
    }

    /// Owned experimenters
    #[inline]
    #[must_use]
    pub fn experimenters(&self) -> &[NodeId] {
        &self.experimenters
    }

    /// Owned images
    #[inline]
    #[must_use]
    pub fn images(&self) -> &[NodeId] {
        &self.images
    }

    /// Owned annotation container
    #[inline]
    #[must_use]
    pub fn structured_annotations(&self) -> Option<NodeId> {
        self.structured_annotations
    }

    /// Owned regions of interest
    #[inline]
    #[must_use]
    pub fn rois(&self) -> &[NodeId] {
        &self.rois
    }
}

fn build_all<T: ModelObject + Default>(
    element: &TreeUnit,
    tag: &'static str,
    ctx: &mut BuildContext<'_>,
    into: &mut Vec<NodeId>,
) -> Result<(), BuildError> {
    for child in element.children_named(tag) {
        into.push(ctx.build::<T>(child)?);
    }
    Ok(())
}

impl ModelObject for Ome {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn lineage(&self) -> Lineage {
        Self::LINEAGE
    }

    fn update(&mut self, _this: NodeId, element: &TreeUnit, ctx: &mut BuildContext<'_>) -> Result<(), BuildError> {
        check_tag(element, Self::TYPE_NAME);
        read_attribute(element, "UUID", &mut self.uuid)?;
        read_attribute(element, "Creator", &mut self.creator)?;
        build_all::<Dataset>(element, Dataset::TYPE_NAME, ctx, &mut self.datasets)?;
        build_all::<Experimenter>(element, Experimenter::TYPE_NAME, ctx, &mut self.experimenters)?;
        build_all::<Image>(element, Image::TYPE_NAME, ctx, &mut self.images)?;
        if let Some(unit) = at_most_one(element, StructuredAnnotations::TYPE_NAME)? {
            self.structured_annotations = Some(ctx.build::<StructuredAnnotations>(unit)?);
        }
        build_all::<Roi>(element, Roi::TYPE_NAME, ctx, &mut self.rois)
    }

    fn render(&self, ctx: &RenderContext<'_>) -> TreeUnit {
        let mut unit = ctx.element(namespaces::OME, Self::TYPE_NAME);
        write_attribute(&mut unit, "UUID", self.uuid.as_ref());
        write_attribute(&mut unit, "Creator", self.creator.as_ref());
        ctx.render_children(&mut unit, &self.datasets);
        ctx.render_children(&mut unit, &self.experimenters);
        ctx.render_children(&mut unit, &self.images);
        ctx.render_children(&mut unit, &self.structured_annotations);
        ctx.render_children(&mut unit, &self.rois);
        unit
    }

    fn try_link(&mut self, _link: &mut Link<'_>) -> bool {
        false
    }
}

/// Container owning every annotation of a document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuredAnnotations {
    annotations: Vec<NodeId>,
}

impl StructuredAnnotations {
    /// Element tag
    pub const TYPE_NAME: &'static str = "StructuredAnnotations";
    /// Type chain
    pub const LINEAGE: Lineage = &[Self::TYPE_NAME];

    /// Owned annotations in document order
    #[inline]
    #[must_use]
    pub fn annotations(&self) -> &[NodeId] {
        &self.annotations
    }
}

impl ModelObject for StructuredAnnotations {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn lineage(&self) -> Lineage {
        Self::LINEAGE
    }

    fn update(&mut self, _this: NodeId, element: &TreeUnit, ctx: &mut BuildContext<'_>) -> Result<(), BuildError> {
        check_tag(element, Self::TYPE_NAME);
        for child in element.children() {
            let annotation = match child.local_name() {
                CommentAnnotation::TYPE_NAME => ctx.build::<CommentAnnotation>(child)?,
                TagAnnotation::TYPE_NAME => ctx.build::<TagAnnotation>(child)?,
                LongAnnotation::TYPE_NAME => ctx.build::<LongAnnotation>(child)?,
                MapAnnotation::TYPE_NAME => ctx.build::<MapAnnotation>(child)?,
                other => {
                    debug!("unsupported annotation {}, skipped", other);
                    continue;
                }
            };
            self.annotations.push(annotation);
        }
        Ok(())
    }

    fn render(&self, ctx: &RenderContext<'_>) -> TreeUnit {
        let mut unit = ctx.element(namespaces::SA, Self::TYPE_NAME);
        ctx.render_children(&mut unit, &self.annotations);
        unit
    }

    fn try_link(&mut self, _link: &mut Link<'_>) -> bool {
        false
    }
}
