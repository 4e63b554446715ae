//! Node catalog
//!
//! A representative subset of the 2015-01 model: enough concrete types to
//! cover ownership, single- and multi-valued references, back-references
//! and multi-level type chains.

mod annotation;
mod dataset;
mod experimenter;
mod image;
mod ome;
mod pixels;
mod roi;

pub use annotation::{
    AnnotationCore, CommentAnnotation, LongAnnotation, MapAnnotation, TagAnnotation, TextAnnotationCore, ANNOTATION,
    TEXT_ANNOTATION,
};
pub use dataset::Dataset;
pub use experimenter::Experimenter;
pub use image::Image;
pub use ome::{Ome, StructuredAnnotations};
pub use pixels::{Channel, Pixels};
pub use roi::{Point, Rectangle, Roi, ShapeCore, SHAPE};

use ome_registry::ReferenceKind;

/// Edge to an annotation
pub const ANNOTATION_REF: ReferenceKind = ReferenceKind::new("AnnotationRef");

/// Edge to an experimenter
pub const EXPERIMENTER_REF: ReferenceKind = ReferenceKind::new("ExperimenterRef");

/// Edge to an image
pub const IMAGE_REF: ReferenceKind = ReferenceKind::new("ImageRef");

/// Edge to a region of interest
pub const ROI_REF: ReferenceKind = ReferenceKind::new("ROIRef");

/// Types an annotation keeps back-references for
const ANNOTATABLE: &[&str] = &[
    Dataset::TYPE_NAME,
    Experimenter::TYPE_NAME,
    Image::TYPE_NAME,
    Pixels::TYPE_NAME,
    Channel::TYPE_NAME,
    Roi::TYPE_NAME,
    SHAPE,
];
