use crate::host::{DesignHost, ExportFormat};
use crate::ir::{
    Artifact, AutoLayout, CornerRadii, ExportMemo, Fill, Geometry, GradientStop, IrNode,
    LayoutDirection, LinearGradient, NodeKind, NodeStyle, Padding, Placement, SolidFill,
    TextContent, TextRun, TextRunStyle,
};
use crate::scene::{
    BoundVariables, LayoutMode, LayoutPositioning, LayoutWrap, Paint, SceneNode,
    StyledTextSegment,
};
use crate::tag::{parse_tag, SpecialTag};
use crate::NormalizeError;
use figwind_assets::{AssetKind, AssetPipeline};
use figwind_common::{Rgba, Settings};
use futures::future::{join_all, BoxFuture, FutureExt};

/// Deepest nesting accepted before the pass is aborted
pub const MAX_DEPTH: usize = 256;

/// Result of normalizing one selection
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub nodes: Vec<IrNode>,
    pub warnings: Vec<String>,
}

/// Normalize the selection roots into intermediate nodes.
///
/// Siblings are converted concurrently and reassembled in declaration order.
/// Only malformed input (non-finite geometry, runaway nesting) is fatal.
#[tracing::instrument(skip_all, fields(roots = roots.len()))]
pub async fn normalize(
    roots: &[SceneNode],
    settings: &Settings,
    host: &dyn DesignHost,
    assets: &AssetPipeline,
) -> Result<Normalized, NormalizeError> {
    let normalizer = Normalizer {
        settings,
        host,
        assets,
    };
    let converted = normalizer.convert_all(roots, 0, Origin::default()).await?;

    let mut result = Normalized::default();
    for (node, warnings) in converted {
        result.nodes.push(node);
        result.warnings.extend(warnings);
    }
    tracing::debug!(
        nodes = result.nodes.len(),
        warnings = result.warnings.len(),
        "Normalized selection"
    );
    Ok(result)
}

type Converted = (IrNode, Vec<String>);

/// Host coordinates of the IR parent's top-left corner.
///
/// Group children are reported in the group's parent space, so they are
/// rebased onto the group.
#[derive(Debug, Clone, Copy, Default)]
struct Origin {
    x: f64,
    y: f64,
}

struct Normalizer<'a> {
    settings: &'a Settings,
    host: &'a dyn DesignHost,
    assets: &'a AssetPipeline,
}

impl Normalizer<'_> {
    async fn convert_all<'b>(
        &'b self,
        nodes: &'b [SceneNode],
        depth: usize,
        origin: Origin,
    ) -> Result<Vec<Converted>, NormalizeError> {
        let results = join_all(nodes.iter().map(|n| self.convert(n, depth, origin))).await;
        let mut converted = Vec::with_capacity(results.len());
        for result in results {
            if let Some(entry) = result? {
                converted.push(entry);
            }
        }
        Ok(converted)
    }

    fn convert<'b>(
        &'b self,
        node: &'b SceneNode,
        depth: usize,
        origin: Origin,
    ) -> BoxFuture<'b, Result<Option<Converted>, NormalizeError>> {
        async move {
            if depth > MAX_DEPTH {
                return Err(NormalizeError::TooDeep {
                    node_id: node.id.clone(),
                    max: MAX_DEPTH,
                });
            }

            let geometry = Geometry {
                x: node.x - origin.x,
                y: node.y - origin.y,
                width: node.width,
                height: node.height,
                rotation: node.rotation,
            };
            if !geometry.is_finite() || !node.opacity.is_finite() {
                return Err(NormalizeError::InvalidGeometry {
                    node_id: node.id.clone(),
                });
            }

            let mut warnings = Vec::new();
            let tag = match parse_tag(&node.name) {
                Ok(tag) => tag,
                Err(unknown) => {
                    warnings.push(format!(
                        "{} on layer \"{}\"; treated as a regular layer",
                        unknown, node.name
                    ));
                    SpecialTag::None
                }
            };

            if !node.visible && !matches!(tag, SpecialTag::AiInstruction { .. }) {
                return Ok(None);
            }

            let mut kind = NodeKind::from_native(&node.node_type);
            if let NodeKind::Text(content) = &mut kind {
                *content = self.text_content(node, &mut warnings);
            }

            let mut ir = IrNode {
                id: node.id.clone(),
                name: node.name.clone(),
                kind,
                geometry,
                visible: node.visible,
                tag,
                style: NodeStyle {
                    fills: self.fills(&node.fills, &mut warnings),
                    strokes: self.fills(&node.strokes, &mut warnings),
                    stroke_weight: node.stroke_weight,
                    corners: corners(node),
                    opacity: node.opacity,
                    clips_content: node.clips_content,
                },
                layout: auto_layout(node),
                placement: Placement {
                    absolute: node.layout_positioning == LayoutPositioning::Absolute,
                    horizontal: node.layout_sizing_horizontal,
                    vertical: node.layout_sizing_vertical,
                },
                children: Vec::new(),
                artifact: None,
                exports: ExportMemo::default(),
            };

            if let SpecialTag::AiInstruction { instruction } = &ir.tag {
                let instruction = instruction_text(node, instruction);
                ir.tag = SpecialTag::AiInstruction { instruction };
            }
            if matches!(ir.tag, SpecialTag::Ignore | SpecialTag::AiInstruction { .. }) {
                return Ok(Some((ir, warnings)));
            }

            if matches!(ir.kind, NodeKind::Unsupported(_) | NodeKind::Text(_) | NodeKind::Line) {
                return Ok(Some((ir, warnings)));
            }

            if self.settings.embed_vectors && ir.tag.is_none() && is_flattenable(node) {
                ir.artifact = self.vector_artifact(node).await;
                if ir.artifact.is_some() {
                    return Ok(Some((ir, warnings)));
                }
            }

            let child_origin = match ir.kind {
                NodeKind::Group => Origin {
                    x: node.x,
                    y: node.y,
                },
                _ => Origin::default(),
            };
            let children = self.convert_all(&node.children, depth + 1, child_origin).await?;
            for (child, child_warnings) in children {
                ir.children.push(child);
                warnings.extend(child_warnings);
            }
            Ok(Some((ir, warnings)))
        }
        .boxed()
    }

    async fn vector_artifact(&self, node: &SceneNode) -> Option<Artifact> {
        let svg = match self.host.export_node(&node.id, ExportFormat::Svg).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::debug!(node_id = %node.id, error = %e, "Vector export failed");
                return None;
            }
        };

        let upload = &self.settings.asset_upload;
        if upload.uploads_vectors() {
            if let Some(url) = self.assets.get_or_upload(&svg, AssetKind::Svg, upload).await {
                return Some(Artifact::Remote { url });
            }
        }
        Some(Artifact::Svg(String::from_utf8_lossy(&svg).into_owned()))
    }

    fn fills(&self, paints: &[Paint], warnings: &mut Vec<String>) -> Vec<Fill> {
        paints
            .iter()
            .filter(|p| p.is_visible())
            .filter_map(|paint| match paint {
                Paint::Solid(solid) => Some(Fill::Solid(self.solid(
                    solid.color.with_alpha(solid.color.a * solid.opacity),
                    &solid.bound_variables,
                    warnings,
                ))),
                Paint::Image(image) => Some(Fill::Image {
                    image_hash: image.image_hash.clone(),
                }),
                Paint::GradientLinear(gradient) => {
                    let stops = gradient
                        .gradient_stops
                        .iter()
                        .map(|stop| GradientStop {
                            position: stop.position,
                            fill: self.solid(
                                stop.color.with_alpha(stop.color.a * gradient.opacity),
                                &stop.bound_variables,
                                warnings,
                            ),
                        })
                        .collect();
                    Some(Fill::LinearGradient(LinearGradient {
                        angle: gradient_angle(&gradient.gradient_transform),
                        stops,
                    }))
                }
                Paint::Unsupported => None,
            })
            .collect()
    }

    fn solid(&self, color: Rgba, bound: &BoundVariables, warnings: &mut Vec<String>) -> SolidFill {
        let variable = match (&bound.color, self.settings.use_color_variables) {
            (Some(alias), true) => match self.host.resolve_variable(&alias.id) {
                Some(name) => Some(variable_token(&name)),
                None => {
                    warnings.push(format!(
                        "Color variable \"{}\" could not be resolved; using the literal color",
                        alias.id
                    ));
                    None
                }
            },
            _ => None,
        };
        SolidFill { color, variable }
    }

    fn text_content(&self, node: &SceneNode, warnings: &mut Vec<String>) -> TextContent {
        let characters = node.characters.clone().unwrap_or_default();
        let node_color = self.text_color(&node.fills, warnings);

        let runs = if node.text_segments.is_empty() {
            vec![TextRun {
                text: characters.clone(),
                style: TextRunStyle {
                    color: node_color,
                    ..Default::default()
                },
            }]
        } else {
            node.text_segments
                .iter()
                .map(|segment| self.text_run(segment, node_color.as_ref(), warnings))
                .collect()
        };

        TextContent {
            characters,
            runs,
            align_horizontal: node.text_align_horizontal,
            align_vertical: node.text_align_vertical,
            auto_resize: node.text_auto_resize,
        }
    }

    fn text_run(
        &self,
        segment: &StyledTextSegment,
        fallback_color: Option<&SolidFill>,
        warnings: &mut Vec<String>,
    ) -> TextRun {
        let italic = segment
            .font_name
            .as_ref()
            .is_some_and(|f| f.style.to_ascii_lowercase().contains("italic"));
        let feature = |name: &str| segment.open_type_features.get(name).copied().unwrap_or(false);

        let color = if segment.fills.is_empty() {
            fallback_color.cloned()
        } else {
            self.text_color(&segment.fills, warnings)
        };

        TextRun {
            text: segment.characters.clone(),
            style: TextRunStyle {
                font_size: segment.font_size,
                font_family: segment.font_name.as_ref().map(|f| f.family.clone()),
                font_weight: segment.font_weight,
                italic,
                decoration: segment.text_decoration,
                case: segment.text_case,
                letter_spacing: segment.letter_spacing,
                line_height: segment.line_height,
                color,
                subscript: feature("SUBS"),
                superscript: feature("SUPS"),
            },
        }
    }

    fn text_color(&self, paints: &[Paint], warnings: &mut Vec<String>) -> Option<SolidFill> {
        self.fills(paints, warnings)
            .into_iter()
            .rev()
            .find_map(|fill| match fill {
                Fill::Solid(solid) => Some(solid),
                _ => None,
            })
    }
}

fn corners(node: &SceneNode) -> CornerRadii {
    let base = node.corner_radius;
    CornerRadii {
        top_left: node.top_left_radius.unwrap_or(base),
        top_right: node.top_right_radius.unwrap_or(base),
        bottom_right: node.bottom_right_radius.unwrap_or(base),
        bottom_left: node.bottom_left_radius.unwrap_or(base),
    }
}

fn auto_layout(node: &SceneNode) -> Option<AutoLayout> {
    let direction = match node.layout_mode {
        LayoutMode::None => return None,
        LayoutMode::Horizontal => LayoutDirection::Row,
        LayoutMode::Vertical => LayoutDirection::Column,
    };
    Some(AutoLayout {
        direction,
        primary_align: node.primary_axis_align_items,
        counter_align: node.counter_axis_align_items,
        gap: node.item_spacing,
        padding: Padding {
            top: node.padding_top,
            right: node.padding_right,
            bottom: node.padding_bottom,
            left: node.padding_left,
        },
        wrap: node.layout_wrap == LayoutWrap::Wrap,
    })
}

/// Vector kinds, and groups or frames made only of vector kinds.
fn is_flattenable(node: &SceneNode) -> bool {
    match NodeKind::from_native(&node.node_type) {
        NodeKind::Vector => true,
        NodeKind::Group | NodeKind::Frame => {
            let mut visible = node.children.iter().filter(|c| c.visible).peekable();
            visible.peek().is_some() && visible.all(is_flattenable)
        }
        _ => false,
    }
}

/// Instruction text for an ai-instruction node: its own characters, else
/// the first text descendant, else what followed the tag in the layer name.
fn instruction_text(node: &SceneNode, from_name: &str) -> String {
    fn first_text(node: &SceneNode) -> Option<&str> {
        if let Some(text) = node.characters.as_deref().filter(|t| !t.trim().is_empty()) {
            return Some(text);
        }
        node.children.iter().find_map(first_text)
    }
    first_text(node)
        .map(|t| t.trim().to_string())
        .unwrap_or_else(|| from_name.to_string())
}

/// Direction of a linear gradient from its transform, in degrees.
fn gradient_angle(transform: &[[f64; 3]; 2]) -> f64 {
    let [[a, _, _], [d, _, _]] = *transform;
    let angle = d.atan2(a).to_degrees();
    if angle < 0.0 {
        angle + 360.0
    } else {
        angle
    }
}

/// `Brand/Primary 500` -> `brand-primary-500`
fn variable_token(name: &str) -> String {
    name.split(|c: char| c.is_whitespace() || c == '/')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}
