//! # Figwind Normalizer
//!
//! Turns the design host's node tree into the intermediate tree the
//! compiler works on.
//!
//! Besides the one-to-one kind mapping this is where:
//!
//! - layer-name tags (`#slot:img:hero`, `#ignore`, ...) are parsed once
//! - bound color variables are resolved to names
//! - vector-only subtrees are flattened into SVG artifacts when
//!   `embedVectors` is on
//! - hidden layers are dropped (instruction layers excepted)
//!
//! Per-node problems become warnings. Only malformed input aborts the pass.

pub mod host;
pub mod ir;
mod normalizer;
pub mod scene;
pub mod tag;

pub use host::{DesignHost, ExportError, ExportFormat, MemoryHost};
pub use ir::*;
pub use normalizer::{normalize, Normalized, MAX_DEPTH};
pub use scene::SceneNode;
pub use tag::{parse_tag, SlotKind, SpecialTag, UnknownTag};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NormalizeError {
    #[error("Node '{node_id}' has non-finite geometry")]
    InvalidGeometry { node_id: String },

    #[error("Node '{node_id}' is nested deeper than {max} levels")]
    TooDeep { node_id: String, max: usize },
}
