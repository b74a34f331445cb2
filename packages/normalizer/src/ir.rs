//! Intermediate node tree consumed by the style resolvers and emitter.

use crate::host::{DesignHost, ExportFormat};
use crate::scene::{
    AxisAlign, LayoutSizing, SpacingValue, TextAlignHorizontal, TextAlignVertical,
    TextAutoResize, TextCase, TextDecoration,
};
use crate::tag::SpecialTag;
use figwind_common::{Rect, Rgba};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Scale used for every bitmap export
pub const EXPORT_SCALE: f64 = 2.0;

#[derive(Debug, Clone)]
pub struct IrNode {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
    pub geometry: Geometry,
    pub visible: bool,
    pub tag: SpecialTag,
    pub style: NodeStyle,
    /// Present when the node lays out its children itself
    pub layout: Option<AutoLayout>,
    pub placement: Placement,
    pub children: Vec<IrNode>,
    /// Pre-rendered vector output, set during normalization
    pub artifact: Option<Artifact>,
    pub exports: ExportMemo,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Rectangle,
    Ellipse,
    Group,
    Frame,
    Text(TextContent),
    Line,
    Section,
    Vector,
    /// Native kind with no handling; carries the native type name
    Unsupported(String),
}

impl NodeKind {
    pub fn from_native(node_type: &str) -> Self {
        match node_type {
            "RECTANGLE" => NodeKind::Rectangle,
            "ELLIPSE" => NodeKind::Ellipse,
            "GROUP" => NodeKind::Group,
            "FRAME" | "COMPONENT" | "INSTANCE" | "COMPONENT_SET" => NodeKind::Frame,
            // Text content is filled in by the normalizer
            "TEXT" => NodeKind::Text(TextContent::default()),
            "LINE" => NodeKind::Line,
            "SECTION" => NodeKind::Section,
            "VECTOR" | "STAR" | "POLYGON" | "BOOLEAN_OPERATION" => NodeKind::Vector,
            other => NodeKind::Unsupported(other.to_string()),
        }
    }
}

/// Position relative to the parent plus size, in host pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Geometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
}

impl Geometry {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn is_finite(&self) -> bool {
        self.rect().is_finite() && self.rotation.is_finite()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeStyle {
    /// Visible fills, bottom to top
    pub fills: Vec<Fill>,
    pub strokes: Vec<Fill>,
    pub stroke_weight: f64,
    pub corners: CornerRadii,
    pub opacity: f64,
    pub clips_content: bool,
}

impl NodeStyle {
    pub fn has_image_fill(&self) -> bool {
        self.fills.iter().any(|f| matches!(f, Fill::Image { .. }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CornerRadii {
    pub top_left: f64,
    pub top_right: f64,
    pub bottom_right: f64,
    pub bottom_left: f64,
}

impl CornerRadii {
    /// The shared radius when all four corners agree
    pub fn as_uniform(&self) -> Option<f64> {
        let r = self.top_left;
        (self.top_right == r && self.bottom_right == r && self.bottom_left == r).then_some(r)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolidFill {
    /// Paint opacity already folded into alpha
    pub color: Rgba,
    /// Resolved color variable name, when variables are in use
    pub variable: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GradientStop {
    pub position: f64,
    pub fill: SolidFill,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    /// Direction in degrees, 0 pointing right and 90 pointing down
    pub angle: f64,
    pub stops: Vec<GradientStop>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Fill {
    Solid(SolidFill),
    Image { image_hash: Option<String> },
    LinearGradient(LinearGradient),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutDirection {
    Row,
    Column,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AutoLayout {
    pub direction: LayoutDirection,
    pub primary_align: AxisAlign,
    pub counter_align: AxisAlign,
    pub gap: f64,
    pub padding: Padding,
    pub wrap: bool,
}

/// How a node sits inside its parent
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Placement {
    /// Positioned by coordinates rather than by the parent's flow
    pub absolute: bool,
    pub horizontal: LayoutSizing,
    pub vertical: LayoutSizing,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextContent {
    pub characters: String,
    /// Runs in character order; adjacent runs may share a style
    pub runs: Vec<TextRun>,
    pub align_horizontal: TextAlignHorizontal,
    pub align_vertical: TextAlignVertical,
    pub auto_resize: TextAutoResize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub style: TextRunStyle,
}

/// Style of one text run. `None` fields were not reported by the host.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextRunStyle {
    pub font_size: Option<f64>,
    pub font_family: Option<String>,
    pub font_weight: Option<u16>,
    pub italic: bool,
    pub decoration: TextDecoration,
    pub case: TextCase,
    pub letter_spacing: Option<SpacingValue>,
    pub line_height: Option<SpacingValue>,
    pub color: Option<SolidFill>,
    pub subscript: bool,
    pub superscript: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Artifact {
    /// Inline SVG markup
    Svg(String),
    /// Uploaded vector
    Remote { url: String },
}

type ExportCell = OnceCell<Option<Arc<[u8]>>>;

/// Per-node memo of PNG exports, one slot per variant.
///
/// Clones share the memo, so a copy of the tree made for another pass
/// reuses exports. A failed export is memoized as `None` and not retried.
#[derive(Debug, Clone, Default)]
pub struct ExportMemo {
    with_children: Arc<ExportCell>,
    without_children: Arc<ExportCell>,
}

impl IrNode {
    /// PNG bytes of this node, exported once per variant.
    pub async fn bitmap(&self, host: &dyn DesignHost, exclude_children: bool) -> Option<Arc<[u8]>> {
        let cell = if exclude_children {
            &self.exports.without_children
        } else {
            &self.exports.with_children
        };
        cell.get_or_init(|| async {
            let format = ExportFormat::Png {
                scale: EXPORT_SCALE,
                exclude_children,
            };
            match host.export_node(&self.id, format).await {
                Ok(bytes) => Some(Arc::from(bytes)),
                Err(e) => {
                    tracing::debug!(node_id = %self.id, error = %e, "Bitmap export failed");
                    None
                }
            }
        })
        .await
        .clone()
    }

    pub fn text(&self) -> Option<&TextContent> {
        match &self.kind {
            NodeKind::Text(content) => Some(content),
            _ => None,
        }
    }

    /// Depth-first walk, parents before children
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a IrNode)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// Copy of this subtree without ai-instruction nodes
    pub fn without_instructions(&self) -> IrNode {
        let mut copy = self.clone();
        copy.children = self
            .children
            .iter()
            .filter(|c| !matches!(c.tag, SpecialTag::AiInstruction { .. }))
            .map(IrNode::without_instructions)
            .collect();
        copy
    }
}
