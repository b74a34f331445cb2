//! Boundary to the design tool: variable lookup and node export.

use futures::future::{self, BoxFuture};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;

/// Render format requested from the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExportFormat {
    Png { scale: f64, exclude_children: bool },
    Svg,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExportError {
    #[error("Node '{0}' cannot be exported")]
    NotFound(String),

    #[error("Export of '{node_id}' failed: {message}")]
    Failed { node_id: String, message: String },
}

/// Services the design tool provides to a compilation pass.
///
/// Exports are slow on real hosts, so callers memoize them per node.
pub trait DesignHost: Send + Sync {
    /// Name of the color variable with this id, if it still exists
    fn resolve_variable(&self, id: &str) -> Option<String>;

    /// Render a node to PNG or SVG bytes
    fn export_node<'a>(
        &'a self,
        node_id: &'a str,
        format: ExportFormat,
    ) -> BoxFuture<'a, Result<Vec<u8>, ExportError>>;
}

/// Host backed by in-memory tables. Used by the CLI and tests.
#[derive(Debug, Default)]
pub struct MemoryHost {
    variables: HashMap<String, String>,
    pngs: HashMap<String, Vec<u8>>,
    svgs: HashMap<String, String>,
    export_calls: AtomicUsize,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_variable(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.variables.insert(id.into(), name.into());
        self
    }

    pub fn with_png(mut self, node_id: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.pngs.insert(node_id.into(), bytes);
        self
    }

    pub fn with_svg(mut self, node_id: impl Into<String>, markup: impl Into<String>) -> Self {
        self.svgs.insert(node_id.into(), markup.into());
        self
    }

    /// Number of `export_node` calls served so far
    pub fn export_calls(&self) -> usize {
        self.export_calls.load(Ordering::SeqCst)
    }
}

impl DesignHost for MemoryHost {
    fn resolve_variable(&self, id: &str) -> Option<String> {
        self.variables.get(id).cloned()
    }

    fn export_node<'a>(
        &'a self,
        node_id: &'a str,
        format: ExportFormat,
    ) -> BoxFuture<'a, Result<Vec<u8>, ExportError>> {
        self.export_calls.fetch_add(1, Ordering::SeqCst);
        let result = match format {
            ExportFormat::Png { .. } => self.pngs.get(node_id).cloned(),
            ExportFormat::Svg => self.svgs.get(node_id).map(|s| s.clone().into_bytes()),
        }
        .ok_or_else(|| ExportError::NotFound(node_id.to_string()));
        Box::pin(future::ready(result))
    }
}
