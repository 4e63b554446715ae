//! Regions of interest and their shapes

use super::annotation::ANNOTATION;
use super::{ANNOTATION_REF, ROI_REF};
use crate::context::{BuildContext, RenderContext};
use crate::element::{at_most_one, check_tag, read_attribute, read_text, write_attribute, ID_ATTRIBUTE};
use crate::error::BuildError;
use crate::object::{BackLink, Lineage, Link, ModelObject};
use ome_registry::{NodeId, UniqueList};
use ome_tree::{namespaces, TreeUnit};
use tracing::debug;

/// Abstract shape type name
pub const SHAPE: &str = "Shape";

const UNION: &str = "Union";
const DESCRIPTION: &str = "Description";

/// Fields shared by every shape
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShapeCore {
    id: Option<String>,
    the_z: Option<u32>,
    the_t: Option<u32>,
    the_c: Option<u32>,
    locked: Option<bool>,
    text: Option<String>,
    annotations: UniqueList<NodeId>,
    roi: Option<NodeId>,
}

impl ShapeCore {
    /// Populate shared fields
    ///
    /// # Errors
    /// Missing identifier or a malformed plane index or flag.
    pub fn update(
        &mut self,
        this: NodeId,
        element: &TreeUnit,
        ctx: &mut BuildContext<'_>,
        type_name: &'static str,
    ) -> Result<(), BuildError> {
        ctx.identify(this, element, &mut self.id, type_name)?;
        read_attribute(element, "TheZ", &mut self.the_z)?;
        read_attribute(element, "TheT", &mut self.the_t)?;
        read_attribute(element, "TheC", &mut self.the_c)?;
        read_attribute(element, "Locked", &mut self.locked)?;
        read_attribute(element, "Text", &mut self.text)?;
        ctx.collect_references(this, element, ANNOTATION_REF);
        Ok(())
    }

    /// Render shared fields into `unit`
    pub fn render_into(&self, unit: &mut TreeUnit, ctx: &RenderContext<'_>) {
        write_attribute(unit, ID_ATTRIBUTE, self.id.as_ref());
        write_attribute(unit, "TheZ", self.the_z.as_ref());
        write_attribute(unit, "TheT", self.the_t.as_ref());
        write_attribute(unit, "TheC", self.the_c.as_ref());
        write_attribute(unit, "Locked", self.locked.as_ref());
        write_attribute(unit, "Text", self.text.as_ref());
        ctx.render_references(unit, namespaces::SA, ANNOTATION_REF, &self.annotations);
    }

    /// Claim `AnnotationRef` edges; `lineage` is the concrete shape's chain
    pub fn try_link(&mut self, link: &mut Link<'_>, lineage: Lineage) -> bool {
        match link.claim(ANNOTATION_REF, ANNOTATION) {
            Some(target) => {
                self.annotations.add(target);
                link.back_link(lineage);
                true
            }
            None => false,
        }
    }

    /// Record the owning region
    pub fn accept_back_link(&mut self, back: &BackLink) -> bool {
        if back.is_ownership() && back.from_is(Roi::TYPE_NAME) {
            self.roi = Some(back.from);
            return true;
        }
        false
    }

    /// Document identifier
    #[inline]
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Z plane index
    #[inline]
    #[must_use]
    pub fn the_z(&self) -> Option<u32> {
        self.the_z
    }

    /// Time point index
    #[inline]
    #[must_use]
    pub fn the_t(&self) -> Option<u32> {
        self.the_t
    }

    /// Channel index
    #[inline]
    #[must_use]
    pub fn the_c(&self) -> Option<u32> {
        self.the_c
    }

    /// Whether the shape is locked against editing
    #[inline]
    #[must_use]
    pub fn locked(&self) -> Option<bool> {
        self.locked
    }

    /// Label text
    #[inline]
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
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

    /// Owning region
    #[inline]
    #[must_use]
    pub fn roi(&self) -> Option<NodeId> {
        self.roi
    }
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rectangle {
    shape: ShapeCore,
    x: Option<f64>,
    y: Option<f64>,
    width: Option<f64>,
    height: Option<f64>,
}

impl Rectangle {
    /// Element tag
    pub const TYPE_NAME: &'static str = "Rectangle";
    /// Type chain
    pub const LINEAGE: Lineage = &[Self::TYPE_NAME, SHAPE];

    /// Shared shape fields
    #[inline]
    #[must_use]
    pub fn shape(&self) -> &ShapeCore {
        &self.shape
    }

    /// Left edge
    #[inline]
    #[must_use]
    pub fn x(&self) -> Option<f64> {
        self.x
    }

    /// Top edge
    #[inline]
    #[must_use]
    pub fn y(&self) -> Option<f64> {
        self.y
    }

    /// Width
    #[inline]
    #[must_use]
    pub fn width(&self) -> Option<f64> {
        self.width
    }

    /// Height
    #[inline]
    #[must_use]
    pub fn height(&self) -> Option<f64> {
        self.height
    }
}

impl ModelObject for Rectangle {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn lineage(&self) -> Lineage {
        Self::LINEAGE
    }

    fn id(&self) -> Option<&str> {
        self.shape.id()
    }

    fn update(&mut self, this: NodeId, element: &TreeUnit, ctx: &mut BuildContext<'_>) -> Result<(), BuildError> {
        check_tag(element, Self::TYPE_NAME);
        self.shape.update(this, element, ctx, Self::TYPE_NAME)?;
        read_attribute(element, "X", &mut self.x)?;
        read_attribute(element, "Y", &mut self.y)?;
        read_attribute(element, "Width", &mut self.width)?;
        read_attribute(element, "Height", &mut self.height)
    }

    fn render(&self, ctx: &RenderContext<'_>) -> TreeUnit {
        let mut unit = ctx.element(namespaces::ROI, Self::TYPE_NAME);
        self.shape.render_into(&mut unit, ctx);
        write_attribute(&mut unit, "X", self.x.as_ref());
        write_attribute(&mut unit, "Y", self.y.as_ref());
        write_attribute(&mut unit, "Width", self.width.as_ref());
        write_attribute(&mut unit, "Height", self.height.as_ref());
        unit
    }

    fn try_link(&mut self, link: &mut Link<'_>) -> bool {
        self.shape.try_link(link, Self::LINEAGE)
    }

    fn accept_back_link(&mut self, back: &BackLink) -> bool {
        self.shape.accept_back_link(back)
    }
}

/// Single point
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Point {
    shape: ShapeCore,
    x: Option<f64>,
    y: Option<f64>,
}

impl Point {
    /// Element tag
    pub const TYPE_NAME: &'static str = "Point";
    /// Type chain
    pub const LINEAGE: Lineage = &[Self::TYPE_NAME, SHAPE];

    /// Shared shape fields
    #[inline]
    #[must_use]
    pub fn shape(&self) -> &ShapeCore {
        &self.shape
    }

    /// X coordinate
    #[inline]
    #[must_use]
    pub fn x(&self) -> Option<f64> {
        self.x
    }

    /// Y coordinate
    #[inline]
    #[must_use]
    pub fn y(&self) -> Option<f64> {
        self.y
    }
}

impl ModelObject for Point {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn lineage(&self) -> Lineage {
        Self::LINEAGE
    }

    fn id(&self) -> Option<&str> {
        self.shape.id()
    }

    fn update(&mut self, this: NodeId, element: &TreeUnit, ctx: &mut BuildContext<'_>) -> Result<(), BuildError> {
        check_tag(element, Self::TYPE_NAME);
        self.shape.update(this, element, ctx, Self::TYPE_NAME)?;
        read_attribute(element, "X", &mut self.x)?;
        read_attribute(element, "Y", &mut self.y)
    }

    fn render(&self, ctx: &RenderContext<'_>) -> TreeUnit {
        let mut unit = ctx.element(namespaces::ROI, Self::TYPE_NAME);
        self.shape.render_into(&mut unit, ctx);
        write_attribute(&mut unit, "X", self.x.as_ref());
        write_attribute(&mut unit, "Y", self.y.as_ref());
        unit
    }

    fn try_link(&mut self, link: &mut Link<'_>) -> bool {
        self.shape.try_link(link, Self::LINEAGE)
    }

    fn accept_back_link(&mut self, back: &BackLink) -> bool {
        self.shape.accept_back_link(back)
    }
}

/// Region of interest: a union of shapes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roi {
    id: Option<String>,
    name: Option<String>,
    description: Option<String>,
    union: Option<Vec<NodeId>>,
    annotations: UniqueList<NodeId>,
    images: UniqueList<NodeId>,
}

impl Roi {
    /// Element tag
    pub const TYPE_NAME: &'static str = "ROI";
    /// Type chain
    pub const LINEAGE: Lineage = &[Self::TYPE_NAME];

    fn update_union(&mut self, this: NodeId, union: &TreeUnit, ctx: &mut BuildContext<'_>) -> Result<(), BuildError> {
        let shapes = self.union.get_or_insert_with(Vec::new);
        for child in union.children() {
            let shape = match child.local_name() {
                Rectangle::TYPE_NAME => ctx.build_owned::<Rectangle>(this, Self::LINEAGE, child)?,
                Point::TYPE_NAME => ctx.build_owned::<Point>(this, Self::LINEAGE, child)?,
                other => {
                    debug!("unsupported shape {} in {}, skipped", other, UNION);
                    continue;
                }
            };
            shapes.push(shape);
        }
        Ok(())
    }

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

    /// Owned shapes in document order
    #[must_use]
    pub fn shapes(&self) -> &[NodeId] {
        self.union.as_deref().unwrap_or_default()
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

    /// Images referencing this region
    #[inline]
    #[must_use]
    pub fn images(&self) -> &[NodeId] {
        self.images.as_slice()
    }
}

impl ModelObject for Roi {
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
        if let Some(union) = at_most_one(element, UNION)? {
            self.update_union(this, union, ctx)?;
        }
        ctx.collect_references(this, element, ANNOTATION_REF);
        read_text(element, DESCRIPTION, &mut self.description)
    }

    fn render(&self, ctx: &RenderContext<'_>) -> TreeUnit {
        let mut unit = ctx.element(namespaces::ROI, Self::TYPE_NAME);
        write_attribute(&mut unit, ID_ATTRIBUTE, self.id.as_ref());
        write_attribute(&mut unit, "Name", self.name.as_ref());
        if let Some(shapes) = &self.union {
            let mut union = ctx.element(namespaces::ROI, UNION);
            ctx.render_children(&mut union, shapes);
            unit.append_child(union);
        }
        ctx.render_references(&mut unit, namespaces::SA, ANNOTATION_REF, &self.annotations);
        if let Some(description) = &self.description {
            unit.append_child(ctx.text_element(namespaces::ROI, DESCRIPTION, description));
        }
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
        if back.via == Some(ROI_REF) && back.from_is(super::Image::TYPE_NAME) {
            self.images.add(back.from);
            return true;
        }
        false
    }
}
