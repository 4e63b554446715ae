//! Testing utilities for the OME object-graph workspace
//!
//! Shared fixture documents. Every unit is built in the order and namespace
//! the model renders it, so a resolved document re-renders unchanged.

#![allow(missing_docs)]

use ome_tree::namespaces::{OME, ROI, SA};
use ome_tree::TreeUnit;

pub fn element(namespace: &str, tag: &str) -> TreeUnit {
    TreeUnit::with_namespace(namespace, tag)
}

pub fn text(namespace: &str, tag: &str, value: &str) -> TreeUnit {
    element(namespace, tag).with_text(value)
}

pub fn reference(namespace: &str, tag: &str, id: &str) -> TreeUnit {
    element(namespace, tag).with_attribute("ID", id)
}

pub fn annotation_ref(id: &str) -> TreeUnit {
    reference(SA, "AnnotationRef", id)
}

pub fn pair(key: &str, value: &str) -> TreeUnit {
    text(OME, "M", value).with_attribute("K", key)
}

/// Empty document root
pub fn ome() -> TreeUnit {
    element(OME, "OME")
}

/// Document exercising every node type and reference kind
///
/// Contains forward references, references across unrelated subtrees and
/// an annotation annotating another annotation. All 13 references resolve.
pub fn full_document() -> TreeUnit {
    ome()
        .with_attribute("UUID", "urn:uuid:0f6c1b2e-7d0a-4a35-9f5e-3c2b1a000001")
        .with_attribute("Creator", "omegraph")
        .with_child(dataset())
        .with_child(experimenter())
        .with_child(first_image())
        .with_child(element(OME, "Image").with_attribute("ID", "Image:1").with_attribute("Name", "background").with_child(
            reference(OME, "ExperimenterRef", "Experimenter:0"),
        ))
        .with_child(structured_annotations())
        .with_child(roi())
}

fn dataset() -> TreeUnit {
    element(OME, "Dataset")
        .with_attribute("ID", "Dataset:0")
        .with_attribute("Name", "Plate scans")
        .with_child(text(OME, "Description", "first batch"))
        .with_child(reference(OME, "ImageRef", "Image:0"))
        .with_child(reference(OME, "ImageRef", "Image:1"))
        .with_child(annotation_ref("Annotation:0"))
}

fn experimenter() -> TreeUnit {
    element(OME, "Experimenter")
        .with_attribute("ID", "Experimenter:0")
        .with_attribute("FirstName", "Ada")
        .with_attribute("LastName", "Byron")
        .with_attribute("Email", "ada@example.org")
        .with_child(annotation_ref("Annotation:1"))
}

fn first_image() -> TreeUnit {
    let pixels = element(OME, "Pixels")
        .with_attribute("ID", "Pixels:0")
        .with_attribute("DimensionOrder", "XYZCT")
        .with_attribute("Type", "uint16")
        .with_attribute("SizeX", "512")
        .with_attribute("SizeY", "512")
        .with_attribute("SizeZ", "1")
        .with_attribute("SizeC", "2")
        .with_attribute("SizeT", "1")
        .with_child(
            element(OME, "Channel")
                .with_attribute("ID", "Channel:0:0")
                .with_attribute("Name", "DAPI")
                .with_attribute("SamplesPerPixel", "1"),
        )
        .with_child(
            element(OME, "Channel")
                .with_attribute("ID", "Channel:0:1")
                .with_attribute("Name", "GFP")
                .with_attribute("SamplesPerPixel", "1")
                .with_child(annotation_ref("Annotation:2")),
        );

    element(OME, "Image")
        .with_attribute("ID", "Image:0")
        .with_attribute("Name", "cells")
        .with_child(text(OME, "AcquisitionDate", "2015-01-20T10:00:00"))
        .with_child(reference(OME, "ExperimenterRef", "Experimenter:0"))
        .with_child(text(OME, "Description", "two channel stack"))
        .with_child(pixels)
        .with_child(reference(ROI, "ROIRef", "ROI:0"))
        .with_child(annotation_ref("Annotation:0"))
        .with_child(annotation_ref("Annotation:2"))
}

fn structured_annotations() -> TreeUnit {
    element(SA, "StructuredAnnotations")
        .with_child(
            element(SA, "CommentAnnotation")
                .with_attribute("ID", "Annotation:0")
                .with_attribute("Namespace", "openmicroscopy.org/comment")
                .with_child(text(SA, "Value", "looks good")),
        )
        .with_child(
            element(SA, "TagAnnotation")
                .with_attribute("ID", "Annotation:1")
                .with_child(text(SA, "Description", "who reviewed"))
                .with_child(text(SA, "Value", "reviewer")),
        )
        .with_child(
            element(SA, "LongAnnotation")
                .with_attribute("ID", "Annotation:2")
                .with_attribute("Annotator", "Experimenter:0")
                .with_child(text(SA, "Value", "42")),
        )
        .with_child(
            element(SA, "MapAnnotation")
                .with_attribute("ID", "Annotation:3")
                .with_child(annotation_ref("Annotation:1"))
                .with_child(
                    element(SA, "Value")
                        .with_child(pair("stain", "DAPI"))
                        .with_child(pair("objective", "63x"))
                        .with_child(pair("stain", "GFP")),
                ),
        )
}

fn roi() -> TreeUnit {
    let union = element(ROI, "Union")
        .with_child(
            element(ROI, "Rectangle")
                .with_attribute("ID", "Shape:0")
                .with_attribute("TheZ", "0")
                .with_attribute("TheT", "0")
                .with_attribute("X", "10")
                .with_attribute("Y", "20")
                .with_attribute("Width", "30.5")
                .with_attribute("Height", "40")
                .with_child(annotation_ref("Annotation:1")),
        )
        .with_child(
            element(ROI, "Point")
                .with_attribute("ID", "Shape:1")
                .with_attribute("Locked", "false")
                .with_attribute("Text", "centre")
                .with_attribute("X", "5")
                .with_attribute("Y", "6"),
        );

    element(ROI, "ROI")
        .with_attribute("ID", "ROI:0")
        .with_attribute("Name", "nucleus")
        .with_child(union)
        .with_child(annotation_ref("Annotation:3"))
        .with_child(text(ROI, "Description", "segmented"))
}

/// `full_document` with every reference unit removed
pub fn structural_document() -> TreeUnit {
    without_references(&full_document())
}

/// Copy of `unit` without any `*Ref` descendants
pub fn without_references(unit: &TreeUnit) -> TreeUnit {
    let mut copy = match unit.namespace() {
        Some(namespace) => TreeUnit::with_namespace(namespace, unit.name()),
        None => TreeUnit::new(unit.name()),
    };
    for (name, value) in unit.attributes() {
        copy.set_attribute(name, value);
    }
    if let Some(text) = unit.text() {
        copy.set_text(text);
    }
    for child in unit.children() {
        if !child.local_name().ends_with("Ref") {
            copy.append_child(without_references(child));
        }
    }
    copy
}

/// Single image with an `ROIRef` to `target` and nothing else
pub fn dangling_document(target: &str) -> TreeUnit {
    ome().with_child(
        element(OME, "Image")
            .with_attribute("ID", "Image:0")
            .with_child(reference(ROI, "ROIRef", target)),
    )
}

/// Two images registering the same identifier, referenced by one dataset
pub fn duplicate_id_document() -> TreeUnit {
    ome()
        .with_child(
            element(OME, "Dataset")
                .with_attribute("ID", "Dataset:0")
                .with_child(reference(OME, "ImageRef", "A")),
        )
        .with_child(element(OME, "Image").with_attribute("ID", "A").with_attribute("Name", "first"))
        .with_child(element(OME, "Image").with_attribute("ID", "A").with_attribute("Name", "second"))
}
