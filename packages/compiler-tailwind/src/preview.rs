//! HTML preview of the selection, rendered next to the code.

use crate::emitter::{Emitter, ImageMode};
use figwind_assets::AssetPipeline;
use figwind_common::{GenerationMode, Rect, Settings};
use figwind_normalizer::{DesignHost, IrNode, SpecialTag};
use serde::Serialize;
use tracing::instrument;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PreviewSize {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Preview {
    /// Bounding box of the selection roots
    pub size: PreviewSize,
    pub content: String,
}

/// Render `nodes` as plain HTML with every image inlined.
///
/// AI instructions are dropped, class prefixes and layer names are not
/// applied, and warnings are discarded.
#[instrument(skip_all, fields(roots = nodes.len()))]
pub async fn render_preview(
    nodes: &[IrNode],
    settings: &Settings,
    host: &dyn DesignHost,
    assets: &AssetPipeline,
) -> Preview {
    let mut preview_settings = settings.clone();
    preview_settings.generation_mode = GenerationMode::Html;
    preview_settings.custom_class_prefix = String::new();
    preview_settings.show_layer_names = false;

    let roots: Vec<IrNode> = nodes
        .iter()
        .filter(|node| !matches!(node.tag, SpecialTag::AiInstruction { .. }))
        .map(IrNode::without_instructions)
        .collect();

    let fragment = Emitter::new(&preview_settings, host, assets, ImageMode::Preview)
        .emit(&roots)
        .await;

    Preview {
        size: bounding_size(nodes),
        content: fragment.markup.trim_start_matches('\n').to_string(),
    }
}

fn bounding_size(nodes: &[IrNode]) -> PreviewSize {
    nodes
        .iter()
        .map(|node| node.geometry.rect())
        .reduce(|a, b| a.union(&b))
        .map(|rect: Rect| PreviewSize {
            width: rect.width,
            height: rect.height,
        })
        .unwrap_or_default()
}
