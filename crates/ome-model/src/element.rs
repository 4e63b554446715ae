//! Field readers and writers shared by node types

use crate::error::BuildError;
use ome_tree::TreeUnit;
use std::fmt::Display;
use tracing::debug;

/// Attribute carrying a node's document identifier
pub const ID_ATTRIBUTE: &str = "ID";

/// Log a tag mismatch; never fatal
pub(crate) fn check_tag(element: &TreeUnit, expected: &str) {
    let tag = element.local_name();
    if tag != expected {
        debug!("expecting node name of {} got {}", expected, tag);
    }
}

/// The single child named `field`, if any
///
/// # Errors
/// [`BuildError::MultipleElementsWhereOneExpected`] if more than one child
/// carries the name.
pub(crate) fn at_most_one<'a>(element: &'a TreeUnit, field: &'a str) -> Result<Option<&'a TreeUnit>, BuildError> {
    let mut matches = element.children_named(field);
    let first = matches.next();
    let rest = matches.count();
    if rest > 0 {
        return Err(BuildError::multiple(field, rest + 1));
    }
    Ok(first)
}

/// Overwrite `slot` with the text of the single `field` child, if present
pub(crate) fn read_text(element: &TreeUnit, field: &'static str, slot: &mut Option<String>) -> Result<(), BuildError> {
    if let Some(unit) = at_most_one(element, field)? {
        *slot = Some(unit.text_or_empty().to_string());
    }
    Ok(())
}

/// Value readable from an attribute or from text content
///
/// Strings are taken verbatim. Numbers and flags ignore surrounding
/// whitespace.
pub(crate) trait Scalar: Sized {
    /// Parse `raw`, `None` if it is not a valid value
    fn read(raw: &str) -> Option<Self>;
}

impl Scalar for String {
    fn read(raw: &str) -> Option<Self> {
        Some(raw.to_string())
    }
}

/// Schema boolean: `true`, `false`, `1` or `0`
impl Scalar for bool {
    fn read(raw: &str) -> Option<Self> {
        match raw.trim() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        }
    }
}

macro_rules! numeric_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Scalar for $ty {
                fn read(raw: &str) -> Option<Self> {
                    raw.trim().parse().ok()
                }
            }
        )*
    };
}

numeric_scalar!(u32, i64, f64);

/// Overwrite `slot` with the parsed text of the single `field` child
pub(crate) fn read_text_as<T: Scalar>(
    element: &TreeUnit,
    field: &'static str,
    slot: &mut Option<T>,
) -> Result<(), BuildError> {
    if let Some(unit) = at_most_one(element, field)? {
        *slot = Some(parse(field, unit.text_or_empty())?);
    }
    Ok(())
}

/// Overwrite `slot` with the parsed attribute `name`, if present
pub(crate) fn read_attribute<T: Scalar>(element: &TreeUnit, name: &str, slot: &mut Option<T>) -> Result<(), BuildError> {
    if let Some(raw) = element.attribute(name) {
        *slot = Some(parse(name, raw)?);
    }
    Ok(())
}

fn parse<T: Scalar>(field: &str, raw: &str) -> Result<T, BuildError> {
    T::read(raw).ok_or_else(|| BuildError::malformed(field, raw))
}

/// Set attribute `name` unless the value is absent
pub(crate) fn write_attribute<T: Display>(unit: &mut TreeUnit, name: &str, value: Option<&T>) {
    if let Some(value) = value {
        unit.set_attribute(name, value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image() -> TreeUnit {
        TreeUnit::new("Image")
            .with_attribute("SizeX", "512")
            .with_attribute("Locked", "maybe")
            .with_child(TreeUnit::new("Description").with_text("first"))
    }

    #[test]
    fn at_most_one_counts_matches() {
        let unit = image();
        assert!(at_most_one(&unit, "Description").unwrap().is_some());
        assert!(at_most_one(&unit, "Pixels").unwrap().is_none());

        let twice = unit.with_child(TreeUnit::new("ome:Description"));
        let err = at_most_one(&twice, "Description").unwrap_err();
        assert_eq!(err, BuildError::multiple("Description", 2));
    }

    #[test]
    fn read_attribute_parses_or_fails() {
        let unit = image();

        let mut size: Option<u32> = None;
        read_attribute(&unit, "SizeX", &mut size).unwrap();
        assert_eq!(size, Some(512));

        let mut locked: Option<bool> = None;
        let err = read_attribute(&unit, "Locked", &mut locked).unwrap_err();
        assert_eq!(err, BuildError::malformed("Locked", "maybe"));
    }

    #[test]
    fn string_attributes_keep_whitespace() {
        let unit = TreeUnit::new("Image")
            .with_attribute("Name", "  cells ")
            .with_attribute("SizeX", " 64 ");

        let mut name: Option<String> = None;
        read_attribute(&unit, "Name", &mut name).unwrap();
        assert_eq!(name.as_deref(), Some("  cells "));

        let mut size: Option<u32> = None;
        read_attribute(&unit, "SizeX", &mut size).unwrap();
        assert_eq!(size, Some(64));
    }

    #[test]
    fn flags_accept_schema_boolean_forms() {
        for (raw, expected) in [("true", true), ("1", true), ("false", false), ("0", false)] {
            let unit = TreeUnit::new("Point").with_attribute("Locked", raw);
            let mut locked: Option<bool> = None;
            read_attribute(&unit, "Locked", &mut locked).unwrap();
            assert_eq!(locked, Some(expected), "Locked={raw}");
        }

        let unit = TreeUnit::new("Point").with_attribute("Locked", "yes");
        let mut locked: Option<bool> = None;
        let err = read_attribute(&unit, "Locked", &mut locked).unwrap_err();
        assert_eq!(err, BuildError::malformed("Locked", "yes"));
    }

    #[test]
    fn absent_values_leave_slot_untouched() {
        let unit = image();

        let mut name = Some("kept".to_string());
        read_attribute(&unit, "Name", &mut name).unwrap();
        assert_eq!(name.as_deref(), Some("kept"));

        let mut date = Some("2015-01-01".to_string());
        read_text(&unit, "AcquisitionDate", &mut date).unwrap();
        assert_eq!(date.as_deref(), Some("2015-01-01"));
    }

    #[test]
    fn write_attribute_skips_none() {
        let mut unit = TreeUnit::new("Pixels");
        write_attribute(&mut unit, "SizeX", Some(&4u32));
        write_attribute::<u32>(&mut unit, "SizeY", None);

        assert_eq!(unit.attribute("SizeX"), Some("4"));
        assert!(!unit.has_attribute("SizeY"));
    }
}
