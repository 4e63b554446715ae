//! Materialization and rendering configuration

use serde::{Deserialize, Serialize};

/// Object graph configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Treat any unresolved reference as an error in [`Model::load`]
    ///
    /// [`Model::load`]: crate::Model::load
    pub strict_references: bool,
    /// Record a diagnostic entry for every dangling reference
    pub collect_diagnostics: bool,
    /// Rendering options
    pub render: RenderConfig,
}

impl ModelConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With strict reference checking
    #[inline]
    #[must_use]
    pub fn with_strict_references(mut self, strict: bool) -> Self {
        self.strict_references = strict;
        self
    }

    /// With dangling-reference diagnostics on or off
    #[inline]
    #[must_use]
    pub fn with_diagnostics(mut self, collect: bool) -> Self {
        self.collect_diagnostics = collect;
        self
    }

    /// With rendering options
    #[inline]
    #[must_use]
    pub fn with_render(mut self, render: RenderConfig) -> Self {
        self.render = render;
        self
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            strict_references: false,
            collect_diagnostics: true,
            render: RenderConfig::default(),
        }
    }
}

/// Rendering options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Re-emit resolved forward references as `<XRef ID=".."/>` children
    ///
    /// Off by default: reference edges are derived state and are not
    /// rendered. Back-references are never rendered.
    pub emit_references: bool,
}

impl RenderConfig {
    /// With reference emission on or off
    #[inline]
    #[must_use]
    pub fn with_references(mut self, emit: bool) -> Self {
        self.emit_references = emit;
        self
    }
}
