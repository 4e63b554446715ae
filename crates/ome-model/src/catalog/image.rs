//! Images

use super::annotation::ANNOTATION;
use super::{Experimenter, Pixels, Roi, ANNOTATION_REF, EXPERIMENTER_REF, IMAGE_REF, ROI_REF};
use crate::context::{BuildContext, RenderContext};
use crate::element::{at_most_one, check_tag, read_attribute, read_text, write_attribute, ID_ATTRIBUTE};
use crate::error::BuildError;
use crate::object::{BackLink, Lineage, Link, ModelObject};
use ome_registry::{NodeId, UniqueList};
use ome_tree::{namespaces, TreeUnit};

const ACQUISITION_DATE: &str = "AcquisitionDate";
const DESCRIPTION: &str = "Description";

/// One acquired image and its pixel data
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Image {
    id: Option<String>,
    name: Option<String>,
    acquisition_date: Option<String>,
    description: Option<String>,
    pixels: Option<NodeId>,
    experimenter: Option<NodeId>,
    rois: UniqueList<NodeId>,
    annotations: UniqueList<NodeId>,
    datasets: UniqueList<NodeId>,
}

impl Image {
    /// Element tag
    pub const TYPE_NAME: &'static str = "Image";
    /// Type chain
    pub const LINEAGE: Lineage = &[Self::TYPE_NAME];

    /// Display name
    #[inline]
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Acquisition timestamp as written
    #[inline]
    #[must_use]
    pub fn acquisition_date(&self) -> Option<&str> {
        self.acquisition_date.as_deref()
    }

    /// Free text description
    #[inline]
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Owned pixel set
    #[inline]
    #[must_use]
    pub fn pixels(&self) -> Option<NodeId> {
        self.pixels
    }

    /// Linked experimenter
    #[inline]
    #[must_use]
    pub fn linked_experimenter(&self) -> Option<NodeId> {
        self.experimenter
    }

    /// Linked regions of interest
    #[inline]
    #[must_use]
    pub fn linked_rois(&self) -> &[NodeId] {
        self.rois.as_slice()
    }

    /// Link a region; the region's back-reference is left alone
    pub fn link_roi(&mut self, roi: NodeId) -> bool {
        self.rois.add(roi)
    }

    /// Unlink a region
    pub fn unlink_roi(&mut self, roi: NodeId) -> bool {
        self.rois.remove(&roi)
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

    /// Datasets that contain this image
    #[inline]
    #[must_use]
    pub fn datasets(&self) -> &[NodeId] {
        self.datasets.as_slice()
    }
}

impl ModelObject for Image {
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
        read_text(element, ACQUISITION_DATE, &mut self.acquisition_date)?;
        ctx.collect_single_reference(this, element, EXPERIMENTER_REF)?;
        read_text(element, DESCRIPTION, &mut self.description)?;
        if let Some(pixels) = at_most_one(element, Pixels::TYPE_NAME)? {
            self.pixels = Some(ctx.build::<Pixels>(pixels)?);
        }
        ctx.collect_references(this, element, ROI_REF);
        ctx.collect_references(this, element, ANNOTATION_REF);
        Ok(())
    }

    fn render(&self, ctx: &RenderContext<'_>) -> TreeUnit {
        let mut unit = ctx.element(namespaces::OME, Self::TYPE_NAME);
        write_attribute(&mut unit, ID_ATTRIBUTE, self.id.as_ref());
        write_attribute(&mut unit, "Name", self.name.as_ref());
        if let Some(date) = &self.acquisition_date {
            unit.append_child(ctx.text_element(namespaces::OME, ACQUISITION_DATE, date));
        }
        ctx.render_references(&mut unit, namespaces::OME, EXPERIMENTER_REF, &self.experimenter);
        if let Some(description) = &self.description {
            unit.append_child(ctx.text_element(namespaces::OME, DESCRIPTION, description));
        }
        ctx.render_children(&mut unit, &self.pixels);
        ctx.render_references(&mut unit, namespaces::ROI, ROI_REF, &self.rois);
        ctx.render_references(&mut unit, namespaces::SA, ANNOTATION_REF, &self.annotations);
        unit
    }

    fn try_link(&mut self, link: &mut Link<'_>) -> bool {
        if let Some(target) = link.claim(EXPERIMENTER_REF, Experimenter::TYPE_NAME) {
            self.experimenter = Some(target);
        } else if let Some(target) = link.claim(ROI_REF, Roi::TYPE_NAME) {
            self.rois.add(target);
        } else if let Some(target) = link.claim(ANNOTATION_REF, ANNOTATION) {
            self.annotations.add(target);
        } else {
            return false;
        }
        link.back_link(Self::LINEAGE);
        true
    }

    fn accept_back_link(&mut self, back: &BackLink) -> bool {
        if back.via == Some(IMAGE_REF) && back.from_is(super::Dataset::TYPE_NAME) {
            self.datasets.add(back.from);
            return true;
        }
        false
    }
}
