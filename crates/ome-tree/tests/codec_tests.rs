//! Codec tests - whole documents through JSON, YAML and the filesystem

use ome_tree::codec::{self, DocumentFormat};
use ome_tree::TreeUnit;
use pretty_assertions::assert_eq;

fn sample() -> TreeUnit {
    TreeUnit::new("OME")
        .with_child(
            TreeUnit::new("Image")
                .with_attribute("ID", "Image:0")
                .with_attribute("Name", "first")
                .with_child(TreeUnit::new("Description").with_text("a cell")),
        )
        .with_child(TreeUnit::new("SA:StructuredAnnotations"))
}

#[test]
fn json_string_preserves_tree() {
    let text = codec::to_string(&sample(), DocumentFormat::Json).unwrap();
    let back = codec::from_str(&text, DocumentFormat::Json).unwrap();
    assert_eq!(back, sample());
}

#[test]
fn yaml_string_preserves_tree() {
    let text = codec::to_string(&sample(), DocumentFormat::Yaml).unwrap();
    let back = codec::from_str(&text, DocumentFormat::Yaml).unwrap();
    assert_eq!(back, sample());
}

#[test]
fn file_write_then_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.json");

    codec::write(&sample(), &path).unwrap();
    let back = codec::read(&path).unwrap();
    assert_eq!(back, sample());
}

#[test]
fn read_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = codec::read(dir.path().join("absent.yaml"));
    assert!(matches!(result, Err(codec::TreeError::Io { .. })));
}
