//! Error types for the object graph
//!
//! Provides error handling for:
//! - Build operations (tree → graph), which abort the whole materialize call
//! - Resolution outcomes that a caller chose to treat as fatal

use ome_tree::TreeError;

/// Hard failures while building nodes from a tree
///
/// Every variant unwinds the whole materialize call; there is no partial
/// graph.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// Node type declares a required identifier but none was supplied
    #[error("{0} missing required ID property")]
    MissingRequiredIdentifier(&'static str),

    /// Field declared as occurring at most once occurs more than once
    #[error("{field} node list size {count} != 1")]
    MultipleElementsWhereOneExpected {
        /// Local tag of the repeated child
        field: String,
        /// Number of occurrences found
        count: usize,
    },

    /// Numeric or boolean value failed to parse
    #[error("malformed value for {field}: '{raw}'")]
    MalformedScalar {
        /// Attribute or child carrying the value
        field: String,
        /// Value as written
        raw: String,
    },
}

impl BuildError {
    /// Create cardinality error for field
    pub fn multiple(field: impl Into<String>, count: usize) -> Self {
        Self::MultipleElementsWhereOneExpected {
            field: field.into(),
            count,
        }
    }

    /// Create scalar parse error for field
    pub fn malformed(field: impl Into<String>, raw: impl Into<String>) -> Self {
        Self::MalformedScalar {
            field: field.into(),
            raw: raw.into(),
        }
    }
}

/// Resolution outcomes a caller asked to treat as errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// One or more references could not be resolved
    #[error("{count} unresolved reference(s)")]
    Unresolved {
        /// Number of unresolved edges
        count: u32,
    },
}

/// Combined object graph error
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Tree could not be built into a graph
    #[error("build error: {0}")]
    Build(#[from] BuildError),

    /// Resolution left references a caller treats as fatal
    #[error("resolve error: {0}")]
    Resolve(#[from] ResolveError),

    /// Document could not be read or written
    #[error("tree error: {0}")]
    Tree(#[from] TreeError),
}

/// Result type alias for object graph operations
pub type ModelResult<T> = Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_error_display() {
        let err = BuildError::MissingRequiredIdentifier("Image");
        assert_eq!(err.to_string(), "Image missing required ID property");

        let err = BuildError::multiple("Description", 2);
        assert_eq!(err.to_string(), "Description node list size 2 != 1");

        let err = BuildError::malformed("SizeX", "ten");
        assert_eq!(err.to_string(), "malformed value for SizeX: 'ten'");
    }

    #[test]
    fn resolve_error_display() {
        let err = ResolveError::Unresolved { count: 3 };
        assert_eq!(err.to_string(), "3 unresolved reference(s)");
    }

    #[test]
    fn error_conversions() {
        let err: ModelError = BuildError::MissingRequiredIdentifier("Image").into();
        assert!(matches!(err, ModelError::Build(_)));

        let err: ModelError = ResolveError::Unresolved { count: 1 }.into();
        assert!(matches!(err, ModelError::Resolve(_)));
    }
}
