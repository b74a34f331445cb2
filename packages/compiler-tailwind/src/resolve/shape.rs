use super::color::color_token;
use super::scale::{opacity_token, radius_token};
use super::StyleResolution;
use figwind_common::{format_number, format_px, Settings};
use figwind_normalizer::{Fill, IrNode, NodeKind};

pub fn resolve_corners(node: &IrNode, settings: &Settings, out: &mut StyleResolution) {
    if matches!(node.kind, NodeKind::Ellipse) {
        out.add("rounded-full");
        return;
    }

    let corners = &node.style.corners;
    match corners.as_uniform() {
        Some(radius) if radius > 0.0 => out.add(radius_token(radius, settings)),
        Some(_) => {}
        None => {
            let sides = [
                ("tl", corners.top_left),
                ("tr", corners.top_right),
                ("br", corners.bottom_right),
                ("bl", corners.bottom_left),
            ];
            for (side, radius) in sides {
                if radius > 0.0 {
                    out.add(format!("rounded-{}-[{}]", side, format_px(radius)));
                }
            }
        }
    }
}

/// Border from the top solid stroke. Lines draw a top border instead.
pub fn resolve_stroke(node: &IrNode, settings: &Settings, out: &mut StyleResolution) {
    let weight = node.style.stroke_weight;
    let Some(Fill::Solid(stroke)) = node.style.strokes.last() else {
        return;
    };
    if weight <= 0.0 {
        return;
    }

    let side = if matches!(node.kind, NodeKind::Line) {
        "border-t"
    } else {
        "border"
    };
    let width = match weight {
        w if w == 1.0 => side.to_string(),
        w if w == 2.0 || w == 4.0 || w == 8.0 => format!("{}-{}", side, w as u32),
        w => format!("{}-[{}]", side, format_px(w)),
    };
    out.add(width);
    out.add(color_token("border", stroke, settings));
}

/// Opacity, rotation and clipping
pub fn resolve_effects(node: &IrNode, settings: &Settings, out: &mut StyleResolution) {
    if node.style.opacity < 1.0 {
        out.add(opacity_token(node.style.opacity.max(0.0), settings));
    }
    let rotation = node.geometry.rotation;
    if rotation.abs() >= 0.01 {
        // host rotation is counter-clockwise
        out.add(format!("rotate-[{}deg]", format_number(-rotation)));
    }
    if node.style.clips_content && !node.children.is_empty() {
        out.add("overflow-hidden");
    }
}
