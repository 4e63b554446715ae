//! Materialize and resolve scenarios over whole documents

use ome_model::catalog::{
    Channel, CommentAnnotation, Dataset, Experimenter, Image, LongAnnotation, MapAnnotation, Pixels, Point,
    Rectangle, Roi, StructuredAnnotations, TagAnnotation,
};
use ome_model::{materialize, BuildError, Model, ModelConfig, ModelError, ModelObject, ResolveError};
use ome_registry::NodeId;
use ome_test_utils::{
    dangling_document, duplicate_id_document, element, full_document, ome, reference, structural_document, text,
};
use ome_tree::codec;
use ome_tree::namespaces::{OME, ROI, SA};

fn node<T: ModelObject>(model: &Model, id: &str) -> (NodeId, T)
where
    T: Clone,
{
    let (handle, found) = model.find_by_id::<T>(id).unwrap();
    (handle, found.clone())
}

#[test]
fn document_without_references_resolves_completely() {
    let (model, report) = materialize(&structural_document()).unwrap();

    assert_eq!(report.unresolved_count, 0);
    assert_eq!(report.linked, 0);
    assert!(report.dangling.is_empty());
    assert!(model.root().is_some());
}

#[test]
fn every_reference_of_full_document_links() {
    let (_, report) = materialize(&full_document()).unwrap();

    assert_eq!(report.unresolved_count, 0);
    assert_eq!(report.linked, 13);
}

#[test]
fn forward_references_set_links_and_back_references() {
    let (model, _) = materialize(&full_document()).unwrap();

    let (dataset_id, dataset) = node::<Dataset>(&model, "Dataset:0");
    let (image0, image) = node::<Image>(&model, "Image:0");
    let (image1, second) = node::<Image>(&model, "Image:1");
    let (experimenter_id, experimenter) = node::<Experimenter>(&model, "Experimenter:0");
    let (roi_id, roi) = node::<Roi>(&model, "ROI:0");

    assert_eq!(dataset.linked_images(), &[image0, image1]);
    assert_eq!(image.datasets(), &[dataset_id]);
    assert_eq!(second.datasets(), &[dataset_id]);

    assert_eq!(image.linked_experimenter(), Some(experimenter_id));
    assert_eq!(second.linked_experimenter(), Some(experimenter_id));
    assert_eq!(experimenter.images(), &[image0, image1]);

    assert_eq!(image.linked_rois(), &[roi_id]);
    assert_eq!(roi.images(), &[image0]);
}

#[test]
fn annotation_links_record_annotated_nodes_by_type() {
    let (model, _) = materialize(&full_document()).unwrap();

    let (comment_id, comment) = node::<CommentAnnotation>(&model, "Annotation:0");
    let (tag_id, tag) = node::<TagAnnotation>(&model, "Annotation:1");
    let (long_id, long) = node::<LongAnnotation>(&model, "Annotation:2");
    let (map_id, map) = node::<MapAnnotation>(&model, "Annotation:3");
    let (dataset_id, _) = node::<Dataset>(&model, "Dataset:0");
    let (image_id, image) = node::<Image>(&model, "Image:0");
    let (experimenter_id, _) = node::<Experimenter>(&model, "Experimenter:0");
    let (channel_id, channel) = node::<Channel>(&model, "Channel:0:1");
    let (rect_id, rect) = node::<Rectangle>(&model, "Shape:0");
    let (roi_id, roi) = node::<Roi>(&model, "ROI:0");

    assert_eq!(image.linked_annotations(), &[comment_id, long_id]);
    assert_eq!(comment.core().annotated("Dataset"), &[dataset_id]);
    assert_eq!(comment.core().annotated("Image"), &[image_id]);

    assert_eq!(channel.linked_annotations(), &[long_id]);
    assert_eq!(long.core().annotated("Channel"), &[channel_id]);

    // Shapes are recorded under their abstract type
    assert_eq!(rect.shape().linked_annotations(), &[tag_id]);
    assert_eq!(tag.core().annotated("Shape"), &[rect_id]);
    assert_eq!(tag.core().annotated("Experimenter"), &[experimenter_id]);
    assert!(tag.core().annotated("Rectangle").is_empty());

    assert_eq!(roi.linked_annotations(), &[map_id]);
    assert_eq!(map.core().annotated("ROI"), &[roi_id]);

    // Annotation to annotation: forward link only
    assert_eq!(map.core().linked_annotations(), &[tag_id]);
    assert!(tag.core().annotated("Annotation").is_empty());
}

#[test]
fn owned_children_point_back_at_owner() {
    let (model, _) = materialize(&full_document()).unwrap();

    let (pixels_id, pixels) = node::<Pixels>(&model, "Pixels:0");
    assert_eq!(pixels.channels().len(), 2);
    for &channel in pixels.channels() {
        let channel = model.graph().downcast::<Channel>(channel).unwrap();
        assert_eq!(channel.pixels(), Some(pixels_id));
    }

    let (roi_id, roi) = node::<Roi>(&model, "ROI:0");
    assert_eq!(roi.shapes().len(), 2);
    let (_, point) = node::<Point>(&model, "Shape:1");
    assert_eq!(point.shape().roi(), Some(roi_id));
    assert_eq!(point.shape().locked(), Some(false));
    assert_eq!(point.shape().text(), Some("centre"));
}

#[test]
fn scalar_fields_are_typed() {
    let (model, _) = materialize(&full_document()).unwrap();

    let (_, pixels) = node::<Pixels>(&model, "Pixels:0");
    assert_eq!(pixels.size_x(), Some(512));
    assert_eq!(pixels.size_c(), Some(2));
    assert_eq!(pixels.dimension_order(), Some("XYZCT"));

    let (_, rect) = node::<Rectangle>(&model, "Shape:0");
    assert_eq!(rect.width(), Some(30.5));
    assert_eq!(rect.shape().the_z(), Some(0));

    let (_, long) = node::<LongAnnotation>(&model, "Annotation:2");
    assert_eq!(long.value(), Some(42));
    assert_eq!(long.core().annotator(), Some("Experimenter:0"));

    let (_, map) = node::<MapAnnotation>(&model, "Annotation:3");
    let pairs = map.value().unwrap();
    assert_eq!(pairs.len(), 3);
    assert_eq!(pairs.get("stain"), Some("DAPI"));
}

#[test]
fn root_owns_top_level_nodes_in_document_order() {
    let (model, _) = materialize(&full_document()).unwrap();
    let root = model.root().unwrap();

    assert_eq!(root.creator(), Some("omegraph"));
    assert_eq!(root.datasets().len(), 1);
    assert_eq!(root.experimenters().len(), 1);
    assert_eq!(root.images().len(), 2);
    assert_eq!(root.rois().len(), 1);

    let annotations = root.structured_annotations().unwrap();
    let container = model.graph().downcast::<StructuredAnnotations>(annotations).unwrap();
    let types: Vec<&str> = container
        .annotations()
        .iter()
        .map(|&id| model.graph().get(id).unwrap().type_name())
        .collect();
    assert_eq!(types, vec!["CommentAnnotation", "TagAnnotation", "LongAnnotation", "MapAnnotation"]);
}

#[test]
fn dangling_reference_leaves_link_empty() {
    let (model, report) = materialize(&dangling_document("X")).unwrap();

    assert_eq!(report.unresolved_count, 1);
    assert_eq!(report.dangling.len(), 1);
    assert_eq!(report.dangling[0].target_id, "X");
    assert_eq!(report.dangling[0].source_type, "Image");
    assert_eq!(report.dangling[0].source_id.as_deref(), Some("Image:0"));

    let (_, image) = node::<Image>(&model, "Image:0");
    assert!(image.linked_rois().is_empty());
}

#[test]
fn duplicate_identifier_last_registration_wins() {
    let (model, report) = materialize(&duplicate_id_document()).unwrap();
    assert_eq!(report.unresolved_count, 0);

    let root = model.root().unwrap();
    let second = root.images()[1];
    let (_, dataset) = node::<Dataset>(&model, "Dataset:0");

    assert_eq!(dataset.linked_images(), &[second]);
    let linked = model.graph().downcast::<Image>(second).unwrap();
    assert_eq!(linked.name(), Some("second"));
    assert_eq!(linked.datasets().len(), 1);
}

#[test]
fn repeated_reference_links_once() {
    let document = ome()
        .with_child(
            element(OME, "Dataset")
                .with_attribute("ID", "Dataset:0")
                .with_child(reference(OME, "ImageRef", "Image:0"))
                .with_child(reference(OME, "ImageRef", "Image:0")),
        )
        .with_child(element(OME, "Image").with_attribute("ID", "Image:0"));

    let (model, report) = materialize(&document).unwrap();

    assert_eq!(report.linked, 2);
    let (_, dataset) = node::<Dataset>(&model, "Dataset:0");
    let (_, image) = node::<Image>(&model, "Image:0");
    assert_eq!(dataset.linked_images().len(), 1);
    assert_eq!(image.datasets().len(), 1);
}

#[test]
fn reference_to_wrong_type_is_found_but_not_counted() {
    let document = ome()
        .with_child(element(OME, "Dataset").with_attribute("ID", "Dataset:0"))
        .with_child(
            element(OME, "Image")
                .with_attribute("ID", "Image:0")
                .with_child(reference(ROI, "ROIRef", "Dataset:0")),
        );

    let (model, report) = materialize(&document).unwrap();

    assert_eq!(report.unresolved_count, 0);
    assert_eq!(report.linked, 0);
    let (_, image) = node::<Image>(&model, "Image:0");
    assert!(image.linked_rois().is_empty());
}

#[test]
fn reference_without_id_is_skipped() {
    let document = ome().with_child(
        element(OME, "Image")
            .with_attribute("ID", "Image:0")
            .with_child(element(SA, "AnnotationRef")),
    );

    let (_, report) = materialize(&document).unwrap();
    assert_eq!(report, ome_model::ResolutionReport::default());
}

#[test]
fn missing_required_identifier_fails() {
    let document = ome().with_child(element(OME, "Image").with_attribute("Name", "anonymous"));

    let err = materialize(&document).unwrap_err();
    assert_eq!(err, BuildError::MissingRequiredIdentifier("Image"));
}

#[test]
fn nested_missing_identifier_unwinds_whole_build() {
    let document = ome().with_child(
        element(OME, "Image")
            .with_attribute("ID", "Image:0")
            .with_child(element(OME, "Pixels").with_attribute("ID", "Pixels:0").with_child(element(OME, "Channel"))),
    );

    let err = materialize(&document).unwrap_err();
    assert_eq!(err, BuildError::MissingRequiredIdentifier("Channel"));
}

#[test]
fn repeated_single_field_fails() {
    let document = ome().with_child(
        element(OME, "Image")
            .with_attribute("ID", "Image:0")
            .with_child(text(OME, "Description", "one"))
            .with_child(text(OME, "Description", "two")),
    );

    let err = materialize(&document).unwrap_err();
    assert_eq!(err.to_string(), "Description node list size 2 != 1");
}

#[test]
fn repeated_single_reference_fails() {
    let document = ome().with_child(
        element(OME, "Image")
            .with_attribute("ID", "Image:0")
            .with_child(reference(OME, "ExperimenterRef", "Experimenter:0"))
            .with_child(reference(OME, "ExperimenterRef", "Experimenter:1")),
    );

    let err = materialize(&document).unwrap_err();
    assert_eq!(err, BuildError::multiple("ExperimenterRef", 2));
}

#[test]
fn malformed_scalar_fails() {
    let document = ome().with_child(
        element(OME, "Image").with_attribute("ID", "Image:0").with_child(
            element(OME, "Pixels")
                .with_attribute("ID", "Pixels:0")
                .with_attribute("SizeX", "wide"),
        ),
    );

    let err = materialize(&document).unwrap_err();
    assert_eq!(err, BuildError::malformed("SizeX", "wide"));
}

#[test]
fn unknown_content_and_tag_mismatch_are_tolerated() {
    let document = element(OME, "ome:OMEx")
        .with_attribute("Stray", "yes")
        .with_child(element(OME, "Plate").with_attribute("ID", "Plate:0"))
        .with_child(
            element(OME, "Image")
                .with_attribute("ID", "Image:0")
                .with_child(element(OME, "StageLabel")),
        );

    let (model, report) = materialize(&document).unwrap();
    assert!(report.is_complete());
    assert_eq!(model.root().unwrap().images().len(), 1);
    assert!(model.find_by_id::<Image>("Plate:0").is_none());
}

#[test]
fn strict_loading_rejects_dangling_references() {
    let config = ModelConfig::new().with_strict_references(true);

    let err = Model::load(&dangling_document("X"), &config).unwrap_err();
    assert!(matches!(err, ModelError::Resolve(ResolveError::Unresolved { count: 1 })));

    let (_, report) = Model::load(&dangling_document("X"), &ModelConfig::new()).unwrap();
    assert_eq!(report.unresolved_count, 1);

    assert!(Model::load(&full_document(), &config).is_ok());
}

#[test]
fn flags_accept_numeric_schema_forms() {
    let document = ome().with_child(
        element(ROI, "ROI").with_attribute("ID", "ROI:0").with_child(
            element(ROI, "Union")
                .with_child(element(ROI, "Point").with_attribute("ID", "Shape:0").with_attribute("Locked", "1"))
                .with_child(
                    element(ROI, "Rectangle")
                        .with_attribute("ID", "Shape:1")
                        .with_attribute("Locked", "0"),
                ),
        ),
    );

    let (model, _) = materialize(&document).unwrap();

    let (_, point) = node::<Point>(&model, "Shape:0");
    assert_eq!(point.shape().locked(), Some(true));
    let (_, rect) = node::<Rectangle>(&model, "Shape:1");
    assert_eq!(rect.shape().locked(), Some(false));
}

#[test]
fn string_attributes_are_read_verbatim() {
    let document = ome().with_child(
        element(OME, "Image")
            .with_attribute("ID", "Image:0")
            .with_attribute("Name", "  cells "),
    );

    let (model, _) = materialize(&document).unwrap();
    let (_, image) = node::<Image>(&model, "Image:0");
    assert_eq!(image.name(), Some("  cells "));
}

#[test]
fn read_loads_document_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("full.yaml");
    codec::write(&full_document(), &path).unwrap();

    let (model, report) = Model::read(&path, &ModelConfig::new()).unwrap();
    assert_eq!(report.linked, 13);
    assert!(model.find_by_id::<Image>("Image:0").is_some());
}

#[test]
fn read_reports_unreadable_document_as_tree_error() {
    let dir = tempfile::TempDir::new().unwrap();

    let err = Model::read(dir.path().join("missing.json"), &ModelConfig::new()).unwrap_err();
    assert!(matches!(err, ModelError::Tree(_)));

    let err = Model::read(dir.path().join("document.xml"), &ModelConfig::new()).unwrap_err();
    assert!(matches!(err, ModelError::Tree(_)));
}
