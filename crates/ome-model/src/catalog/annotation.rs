//! Structured annotations
//!
//! [`AnnotationCore`] holds what every annotation type shares and keeps the
//! back-references from every node that annotates with it.
//! [`TextAnnotationCore`] adds a text value on top of it.

use super::{ANNOTATION_REF, ANNOTATABLE};
use crate::context::{BuildContext, RenderContext};
use crate::element::{at_most_one, check_tag, read_attribute, read_text, read_text_as, write_attribute, ID_ATTRIBUTE};
use crate::error::BuildError;
use crate::object::{BackLink, Lineage, Link, ModelObject};
use crate::pairs::OrderedPairs;
use ome_registry::{NodeId, UniqueList};
use ome_tree::{namespaces, TreeUnit};
use std::collections::BTreeMap;

/// Abstract annotation type name
pub const ANNOTATION: &str = "Annotation";

/// Abstract text annotation type name
pub const TEXT_ANNOTATION: &str = "TextAnnotation";

const DESCRIPTION: &str = "Description";
const VALUE: &str = "Value";

/// Fields shared by every annotation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationCore {
    id: Option<String>,
    namespace: Option<String>,
    annotator: Option<String>,
    description: Option<String>,
    annotations: UniqueList<NodeId>,
    annotated: BTreeMap<&'static str, UniqueList<NodeId>>,
}

impl AnnotationCore {
    /// Populate shared fields
    ///
    /// # Errors
    /// Missing identifier or repeated `Description`.
    pub fn update(
        &mut self,
        this: NodeId,
        element: &TreeUnit,
        ctx: &mut BuildContext<'_>,
        type_name: &'static str,
    ) -> Result<(), BuildError> {
        read_attribute(element, "Namespace", &mut self.namespace)?;
        ctx.identify(this, element, &mut self.id, type_name)?;
        read_attribute(element, "Annotator", &mut self.annotator)?;
        read_text(element, DESCRIPTION, &mut self.description)?;
        ctx.collect_references(this, element, ANNOTATION_REF);
        Ok(())
    }

    /// Render shared fields into `unit`
    pub fn render_into(&self, unit: &mut TreeUnit, ctx: &RenderContext<'_>) {
        write_attribute(unit, ID_ATTRIBUTE, self.id.as_ref());
        write_attribute(unit, "Namespace", self.namespace.as_ref());
        write_attribute(unit, "Annotator", self.annotator.as_ref());
        if let Some(description) = &self.description {
            unit.append_child(ctx.text_element(namespaces::SA, DESCRIPTION, description));
        }
        ctx.render_references(unit, namespaces::SA, ANNOTATION_REF, &self.annotations);
    }

    /// Claim `AnnotationRef` edges to other annotations
    ///
    /// Annotating an annotation keeps no back-reference on the target.
    pub fn try_link(&mut self, link: &mut Link<'_>) -> bool {
        match link.claim(ANNOTATION_REF, ANNOTATION) {
            Some(target) => {
                self.annotations.add(target);
                true
            }
            None => false,
        }
    }

    /// Record the node that annotates with this annotation
    pub fn accept_back_link(&mut self, back: &BackLink) -> bool {
        if back.via != Some(ANNOTATION_REF) {
            return false;
        }
        let Some(kind) = back.from_lineage.iter().copied().find(|name| ANNOTATABLE.contains(name)) else {
            return false;
        };
        self.annotated.entry(kind).or_default().add(back.from);
        true
    }

    /// Document identifier
    #[inline]
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Namespace of the annotation's meaning
    #[inline]
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Experimenter identifier recorded as annotator
    #[inline]
    #[must_use]
    pub fn annotator(&self) -> Option<&str> {
        self.annotator.as_deref()
    }

    /// Free text description
    #[inline]
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Annotations linked to this annotation
    #[inline]
    #[must_use]
    pub fn linked_annotations(&self) -> &[NodeId] {
        self.annotations.as_slice()
    }

    /// Link another annotation
    pub fn link_annotation(&mut self, annotation: NodeId) -> bool {
        self.annotations.add(annotation)
    }

    /// Unlink another annotation
    pub fn unlink_annotation(&mut self, annotation: NodeId) -> bool {
        self.annotations.remove(&annotation)
    }

    /// Nodes of type `type_name` annotated with this annotation
    #[must_use]
    pub fn annotated(&self, type_name: &str) -> &[NodeId] {
        self.annotated
            .get(type_name)
            .map(UniqueList::as_slice)
            .unwrap_or_default()
    }
}

/// Annotation carrying a text value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextAnnotationCore {
    base: AnnotationCore,
    value: Option<String>,
}

impl TextAnnotationCore {
    /// Populate base fields, then the value
    ///
    /// # Errors
    /// Base errors or repeated `Value`.
    pub fn update(
        &mut self,
        this: NodeId,
        element: &TreeUnit,
        ctx: &mut BuildContext<'_>,
        type_name: &'static str,
    ) -> Result<(), BuildError> {
        self.base.update(this, element, ctx, type_name)?;
        read_text(element, VALUE, &mut self.value)
    }

    /// Render base fields, then the value
    pub fn render_into(&self, unit: &mut TreeUnit, ctx: &RenderContext<'_>) {
        self.base.render_into(unit, ctx);
        if let Some(value) = &self.value {
            unit.append_child(ctx.text_element(namespaces::SA, VALUE, value));
        }
    }

    /// Offer a link to the base level; a text value declares no references
    pub fn try_link(&mut self, link: &mut Link<'_>) -> bool {
        self.base.try_link(link)
    }

    /// Offer a back-reference to the base level
    pub fn accept_back_link(&mut self, back: &BackLink) -> bool {
        self.base.accept_back_link(back)
    }

    /// Text value
    #[inline]
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Shared annotation fields
    #[inline]
    #[must_use]
    pub fn core(&self) -> &AnnotationCore {
        &self.base
    }

    /// Shared annotation fields, mutably
    #[inline]
    pub fn core_mut(&mut self) -> &mut AnnotationCore {
        &mut self.base
    }
}

/// Free-text comment
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommentAnnotation {
    text: TextAnnotationCore,
}

impl CommentAnnotation {
    /// Element tag
    pub const TYPE_NAME: &'static str = "CommentAnnotation";
    /// Type chain
    pub const LINEAGE: Lineage = &[Self::TYPE_NAME, TEXT_ANNOTATION, ANNOTATION];

    /// Comment text
    #[inline]
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.text.value()
    }

    /// Shared annotation fields
    #[inline]
    #[must_use]
    pub fn core(&self) -> &AnnotationCore {
        self.text.core()
    }

    /// Shared annotation fields, mutably
    #[inline]
    pub fn core_mut(&mut self) -> &mut AnnotationCore {
        self.text.core_mut()
    }
}

impl ModelObject for CommentAnnotation {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn lineage(&self) -> Lineage {
        Self::LINEAGE
    }

    fn id(&self) -> Option<&str> {
        self.core().id()
    }

    fn update(&mut self, this: NodeId, element: &TreeUnit, ctx: &mut BuildContext<'_>) -> Result<(), BuildError> {
        check_tag(element, Self::TYPE_NAME);
        self.text.update(this, element, ctx, Self::TYPE_NAME)
    }

    fn render(&self, ctx: &RenderContext<'_>) -> TreeUnit {
        let mut unit = ctx.element(namespaces::SA, Self::TYPE_NAME);
        self.text.render_into(&mut unit, ctx);
        unit
    }

    fn try_link(&mut self, link: &mut Link<'_>) -> bool {
        self.text.try_link(link)
    }

    fn accept_back_link(&mut self, back: &BackLink) -> bool {
        self.text.accept_back_link(back)
    }
}

/// Short label
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagAnnotation {
    text: TextAnnotationCore,
}

impl TagAnnotation {
    /// Element tag
    pub const TYPE_NAME: &'static str = "TagAnnotation";
    /// Type chain
    pub const LINEAGE: Lineage = &[Self::TYPE_NAME, TEXT_ANNOTATION, ANNOTATION];

    /// Tag text
    #[inline]
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.text.value()
    }

    /// Shared annotation fields
    #[inline]
    #[must_use]
    pub fn core(&self) -> &AnnotationCore {
        self.text.core()
    }

    /// Shared annotation fields, mutably
    #[inline]
    pub fn core_mut(&mut self) -> &mut AnnotationCore {
        self.text.core_mut()
    }
}

impl ModelObject for TagAnnotation {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn lineage(&self) -> Lineage {
        Self::LINEAGE
    }

    fn id(&self) -> Option<&str> {
        self.core().id()
    }

    fn update(&mut self, this: NodeId, element: &TreeUnit, ctx: &mut BuildContext<'_>) -> Result<(), BuildError> {
        check_tag(element, Self::TYPE_NAME);
        self.text.update(this, element, ctx, Self::TYPE_NAME)
    }

    fn render(&self, ctx: &RenderContext<'_>) -> TreeUnit {
        let mut unit = ctx.element(namespaces::SA, Self::TYPE_NAME);
        self.text.render_into(&mut unit, ctx);
        unit
    }

    fn try_link(&mut self, link: &mut Link<'_>) -> bool {
        self.text.try_link(link)
    }

    fn accept_back_link(&mut self, back: &BackLink) -> bool {
        self.text.accept_back_link(back)
    }
}

/// Integer-valued annotation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LongAnnotation {
    base: AnnotationCore,
    value: Option<i64>,
}

impl LongAnnotation {
    /// Element tag
    pub const TYPE_NAME: &'static str = "LongAnnotation";
    /// Type chain
    pub const LINEAGE: Lineage = &[Self::TYPE_NAME, ANNOTATION];

    /// Integer value
    #[inline]
    #[must_use]
    pub fn value(&self) -> Option<i64> {
        self.value
    }

    /// Shared annotation fields
    #[inline]
    #[must_use]
    pub fn core(&self) -> &AnnotationCore {
        &self.base
    }

    /// Shared annotation fields, mutably
    #[inline]
    pub fn core_mut(&mut self) -> &mut AnnotationCore {
        &mut self.base
    }
}

impl ModelObject for LongAnnotation {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn lineage(&self) -> Lineage {
        Self::LINEAGE
    }

    fn id(&self) -> Option<&str> {
        self.base.id()
    }

    fn update(&mut self, this: NodeId, element: &TreeUnit, ctx: &mut BuildContext<'_>) -> Result<(), BuildError> {
        check_tag(element, Self::TYPE_NAME);
        self.base.update(this, element, ctx, Self::TYPE_NAME)?;
        read_text_as(element, VALUE, &mut self.value)
    }

    fn render(&self, ctx: &RenderContext<'_>) -> TreeUnit {
        let mut unit = ctx.element(namespaces::SA, Self::TYPE_NAME);
        self.base.render_into(&mut unit, ctx);
        if let Some(value) = self.value {
            unit.append_child(ctx.text_element(namespaces::SA, VALUE, &value.to_string()));
        }
        unit
    }

    fn try_link(&mut self, link: &mut Link<'_>) -> bool {
        self.base.try_link(link)
    }

    fn accept_back_link(&mut self, back: &BackLink) -> bool {
        self.base.accept_back_link(back)
    }
}

/// Annotation holding ordered key/value pairs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapAnnotation {
    base: AnnotationCore,
    value: Option<OrderedPairs>,
}

impl MapAnnotation {
    /// Element tag
    pub const TYPE_NAME: &'static str = "MapAnnotation";
    /// Type chain
    pub const LINEAGE: Lineage = &[Self::TYPE_NAME, ANNOTATION];

    /// Pair list
    #[inline]
    #[must_use]
    pub fn value(&self) -> Option<&OrderedPairs> {
        self.value.as_ref()
    }

    /// Shared annotation fields
    #[inline]
    #[must_use]
    pub fn core(&self) -> &AnnotationCore {
        &self.base
    }

    /// Shared annotation fields, mutably
    #[inline]
    pub fn core_mut(&mut self) -> &mut AnnotationCore {
        &mut self.base
    }
}

impl ModelObject for MapAnnotation {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn lineage(&self) -> Lineage {
        Self::LINEAGE
    }

    fn id(&self) -> Option<&str> {
        self.base.id()
    }

    fn update(&mut self, this: NodeId, element: &TreeUnit, ctx: &mut BuildContext<'_>) -> Result<(), BuildError> {
        check_tag(element, Self::TYPE_NAME);
        self.base.update(this, element, ctx, Self::TYPE_NAME)?;
        if let Some(unit) = at_most_one(element, VALUE)? {
            self.value = Some(OrderedPairs::from_element(unit));
        }
        Ok(())
    }

    fn render(&self, ctx: &RenderContext<'_>) -> TreeUnit {
        let mut unit = ctx.element(namespaces::SA, Self::TYPE_NAME);
        self.base.render_into(&mut unit, ctx);
        if let Some(pairs) = &self.value {
            let mut value = ctx.element(namespaces::SA, VALUE);
            pairs.render_into(&mut value, ctx.factory());
            unit.append_child(value);
        }
        unit
    }

    fn try_link(&mut self, link: &mut Link<'_>) -> bool {
        self.base.try_link(link)
    }

    fn accept_back_link(&mut self, back: &BackLink) -> bool {
        self.base.accept_back_link(back)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::LinkTarget;
    use ome_registry::Reference;

    const IMAGE_LINEAGE: Lineage = &["Image"];

    #[test]
    fn text_level_passes_links_to_base() {
        let reference = Reference::new(ANNOTATION_REF, "Annotation:1");
        let target = LinkTarget {
            id: NodeId::from_index(1),
            lineage: TagAnnotation::LINEAGE,
        };
        let mut link = Link::new(NodeId::from_index(0), &reference, target);

        let mut comment = CommentAnnotation::default();
        assert!(comment.try_link(&mut link));
        assert_eq!(comment.core().linked_annotations(), &[NodeId::from_index(1)]);
        assert!(link.into_back_links().is_empty());
    }

    #[test]
    fn text_level_passes_back_links_to_base() {
        let back = BackLink {
            holder: NodeId::from_index(1),
            from: NodeId::from_index(7),
            from_lineage: IMAGE_LINEAGE,
            via: Some(ANNOTATION_REF),
        };

        let mut text = TextAnnotationCore::default();
        assert!(text.accept_back_link(&back));
        assert_eq!(text.core().annotated("Image"), &[NodeId::from_index(7)]);

        let owner = BackLink::owner(NodeId::from_index(1), NodeId::from_index(7), IMAGE_LINEAGE);
        assert!(!text.accept_back_link(&owner));
    }

    #[test]
    fn core_mut_reaches_shared_fields() {
        let mut comment = CommentAnnotation::default();
        assert!(comment.core_mut().link_annotation(NodeId::from_index(3)));
        assert!(!comment.core_mut().link_annotation(NodeId::from_index(3)));

        let mut long = LongAnnotation::default();
        long.core_mut().link_annotation(NodeId::from_index(3));
        assert_eq!(long.core().linked_annotations(), &[NodeId::from_index(3)]);
    }
}
