//! omegraph command implementations
//!
//! The binary only parses arguments and sets up logging; everything it
//! runs lives here so it can be exercised from tests.

#![warn(missing_docs)]

use anyhow::{Context, Result};
use ome_model::{serialize_with, DanglingReference, Model, ModelConfig, ResolutionReport};
use ome_tree::codec::{self, DocumentFormat};
use ome_tree::TreeUnit;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;
use tracing::info;

/// Load configuration from a JSON or YAML file, or use defaults
///
/// # Errors
/// Unreadable file, unknown extension or malformed content.
pub fn load_config(path: Option<&Path>) -> Result<ModelConfig> {
    let Some(path) = path else {
        return Ok(ModelConfig::default());
    };
    let content = std::fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
    let config = match DocumentFormat::from_path(path)? {
        DocumentFormat::Json => serde_json::from_str(&content)?,
        DocumentFormat::Yaml => serde_yaml::from_str(&content)?,
    };
    info!(path = %path.display(), "loaded configuration");
    Ok(config)
}

/// What `inspect` reports about one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectSummary {
    /// Installed nodes
    pub nodes: usize,
    /// Document identifiers, sorted
    pub identified: Vec<String>,
    /// Claimed reference edges
    pub linked: u32,
    /// Edges left unresolved
    pub unresolved_count: u32,
    /// Dangling edges
    pub dangling: Vec<DanglingReference>,
}

impl InspectSummary {
    /// Plain text rendering
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "nodes:       {}", self.nodes);
        let _ = writeln!(out, "identified:  {}", self.identified.len());
        let _ = writeln!(out, "linked:      {}", self.linked);
        let _ = writeln!(out, "unresolved:  {}", self.unresolved_count);
        for dangling in &self.dangling {
            let _ = writeln!(
                out,
                "  {} {} -> {} ({})",
                dangling.source_type,
                dangling.source_id.as_deref().unwrap_or("?"),
                dangling.target_id,
                dangling.kind
            );
        }
        out
    }
}

/// Read and materialize a document file
///
/// # Errors
/// Codec, build, or (under strict configuration) resolution errors.
pub fn load(document: &Path, config: &ModelConfig) -> Result<(Model, ResolutionReport)> {
    Model::read(document, config).with_context(|| format!("materializing {}", document.display()))
}

/// Materialize a document and summarize the graph
///
/// # Errors
/// See [`load`].
pub fn inspect(document: &Path, config: &ModelConfig) -> Result<InspectSummary> {
    let (model, report) = load(document, config)?;

    let mut identified: Vec<String> = model
        .graph()
        .iter()
        .filter_map(|(_, node)| node.id().map(str::to_string))
        .collect();
    identified.sort();
    identified.dedup();

    Ok(InspectSummary {
        nodes: model.graph().len(),
        identified,
        linked: report.linked,
        unresolved_count: report.unresolved_count,
        dangling: report.dangling,
    })
}

/// Materialize a document and render it back to a tree
///
/// # Errors
/// See [`load`].
pub fn roundtrip(document: &Path, config: &ModelConfig) -> Result<TreeUnit> {
    let (model, _) = load(document, config)?;
    Ok(serialize_with(&model, config.render))
}

/// Write a rendered tree to `output`, or return it as JSON text
///
/// # Errors
/// Codec or IO errors.
pub fn emit(tree: &TreeUnit, output: Option<&Path>) -> Result<Option<String>> {
    match output {
        Some(path) => {
            codec::write(tree, path)?;
            info!(path = %path.display(), "wrote document");
            Ok(None)
        }
        None => Ok(Some(codec::to_string(tree, DocumentFormat::Json)?)),
    }
}
