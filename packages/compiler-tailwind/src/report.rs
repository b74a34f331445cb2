//! Secondary reports returned next to the generated code.

use crate::resolve::color::color_value;
use figwind_common::{contrast_ratio, nearest_named_color, Rgba, Settings};
use figwind_normalizer::{Fill, IrNode, SolidFill, SpecialTag};
use serde::Serialize;
use std::collections::HashSet;

/// One solid color used in the selection
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorEntry {
    /// `#3B82F6`
    pub hex: String,
    /// Nearest palette name
    pub name: String,
    /// Color part of the emitted token
    pub token: String,
    pub contrast_white: f64,
    pub contrast_black: f64,
}

/// Classes of one styled text segment, in emission order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyleEntry {
    pub text: String,
    pub classes: Vec<String>,
}

/// Every solid color in fills, strokes, gradient stops and text runs.
///
/// Deduplicated by token and sorted by hex.
pub fn colors_report(nodes: &[IrNode], settings: &Settings) -> Vec<ColorEntry> {
    let mut fills: Vec<&SolidFill> = Vec::new();
    for root in nodes {
        root.walk(&mut |node| {
            if matches!(node.tag, SpecialTag::Ignore | SpecialTag::AiInstruction { .. }) {
                return;
            }
            for fill in node.style.fills.iter().chain(&node.style.strokes) {
                match fill {
                    Fill::Solid(solid) => fills.push(solid),
                    Fill::LinearGradient(gradient) => {
                        fills.extend(gradient.stops.iter().map(|s| &s.fill))
                    }
                    Fill::Image { .. } => {}
                }
            }
            if let Some(text) = node.text() {
                fills.extend(text.runs.iter().filter_map(|r| r.style.color.as_ref()));
            }
        });
    }

    let mut seen = HashSet::new();
    let mut entries: Vec<ColorEntry> = fills
        .into_iter()
        .filter_map(|fill| {
            let token = color_value(fill, settings);
            seen.insert(token.clone()).then(|| entry(&fill.color, token))
        })
        .collect();
    entries.sort_by(|a, b| a.hex.cmp(&b.hex));
    entries
}

fn entry(color: &Rgba, token: String) -> ColorEntry {
    let round = |ratio: f64| (ratio * 100.0).round() / 100.0;
    ColorEntry {
        hex: color.to_hex().to_uppercase(),
        name: nearest_named_color(color).name.clone(),
        token,
        contrast_white: round(contrast_ratio(color, &Rgba::WHITE)),
        contrast_black: round(contrast_ratio(color, &Rgba::BLACK)),
    }
}

/// `// text` followed by one class per line, entries separated by `---`
pub fn render_text_styles(entries: &[TextStyleEntry]) -> String {
    entries
        .iter()
        .map(|entry| {
            let mut block = format!("// {}", entry.text.replace('\n', " ").trim());
            for class in &entry.classes {
                block.push('\n');
                block.push_str(class);
            }
            block
        })
        .collect::<Vec<_>>()
        .join("\n---\n")
}
