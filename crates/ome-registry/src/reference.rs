//! Reference descriptors
//!
//! A [`Reference`] is the typed edge produced during the tree walk wherever
//! a document encodes a cross-reference (`<AnnotationRef ID="..."/>`). It
//! holds only the target identifier and the reference category; the target
//! node is looked up after the whole document has been walked.

use serde::{Serialize, Serializer};
use std::fmt::{self, Display, Formatter};

/// Reference category tag
///
/// Categories are named after the element that encodes them
/// (`AnnotationRef`, `ImageRef`, ...). Node types define their own
/// categories as constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReferenceKind(&'static str);

impl ReferenceKind {
    /// Create category from its element name
    #[inline]
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// Element name of this category
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.0
    }
}

impl Serialize for ReferenceKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0)
    }
}

impl Display for ReferenceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Pending cross-reference: category plus target identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    kind: ReferenceKind,
    target: String,
}

impl Reference {
    /// Create descriptor
    #[inline]
    #[must_use]
    pub fn new(kind: ReferenceKind, target: impl Into<String>) -> Self {
        Self {
            kind,
            target: target.into(),
        }
    }

    /// Reference category
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ReferenceKind {
        self.kind
    }

    /// Check the category
    #[inline]
    #[must_use]
    pub fn is(&self, kind: ReferenceKind) -> bool {
        self.kind == kind
    }

    /// Document identifier of the target
    #[inline]
    #[must_use]
    pub fn target_id(&self) -> &str {
        &self.target
    }
}

impl Display for Reference {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.kind, self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANNOTATION_REF: ReferenceKind = ReferenceKind::new("AnnotationRef");
    const IMAGE_REF: ReferenceKind = ReferenceKind::new("ImageRef");

    #[test]
    fn reference_accessors() {
        let r = Reference::new(ANNOTATION_REF, "Annotation:1");
        assert_eq!(r.kind(), ANNOTATION_REF);
        assert_eq!(r.target_id(), "Annotation:1");
        assert!(r.is(ANNOTATION_REF));
        assert!(!r.is(IMAGE_REF));
    }

    #[test]
    fn reference_display() {
        let r = Reference::new(IMAGE_REF, "Image:0");
        assert_eq!(r.to_string(), "ImageRef -> Image:0");
    }
}
