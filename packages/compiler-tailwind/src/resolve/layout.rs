//! Position, size and auto-layout.

use super::scale::spacing_token;
use super::StyleResolution;
use figwind_common::Settings;
use figwind_normalizer::scene::{AxisAlign, LayoutSizing, TextAutoResize};
use figwind_normalizer::{AutoLayout, IrNode, LayoutDirection, NodeKind, Padding};

/// What a node needs to know about the element it is emitted into
#[derive(Debug, Clone, Copy, Default)]
pub struct ParentContext<'a> {
    pub layout: Option<&'a AutoLayout>,
    pub is_root: bool,
}

impl<'a> ParentContext<'a> {
    pub fn root() -> Self {
        Self {
            layout: None,
            is_root: true,
        }
    }

    pub fn of(node: &'a IrNode) -> Self {
        Self {
            layout: node.layout.as_ref(),
            is_root: false,
        }
    }
}

/// Whether `node` is placed by coordinates inside its parent.
/// Selection roots never are.
pub fn is_absolute(node: &IrNode, parent: ParentContext<'_>) -> bool {
    !parent.is_root && (parent.layout.is_none() || node.placement.absolute)
}

/// Whether any child of `node` is positioned by coordinates
pub fn has_absolute_children(node: &IrNode) -> bool {
    let context = ParentContext::of(node);
    node.children.iter().any(|child| is_absolute(child, context))
}

pub fn resolve_position(
    node: &IrNode,
    parent: ParentContext<'_>,
    settings: &Settings,
    out: &mut StyleResolution,
) {
    if !is_absolute(node, parent) {
        return;
    }
    out.add("absolute");
    out.add(spacing_token("left", node.geometry.x, settings));
    out.add(spacing_token("top", node.geometry.y, settings));
}

pub fn resolve_size(
    node: &IrNode,
    parent: ParentContext<'_>,
    settings: &Settings,
    out: &mut StyleResolution,
) {
    let (mut width, mut height) = (true, true);
    if let Some(text) = node.text() {
        match text.auto_resize {
            TextAutoResize::WidthAndHeight => (width, height) = (false, false),
            TextAutoResize::Height => height = false,
            TextAutoResize::None | TextAutoResize::Truncate => {}
        }
    }
    if matches!(node.kind, NodeKind::Line) {
        height = false;
    }

    if width {
        axis_size(
            node.placement.horizontal,
            LayoutDirection::Row,
            ("w", node.geometry.width),
            parent,
            settings,
            out,
        );
    }
    if height {
        axis_size(
            node.placement.vertical,
            LayoutDirection::Column,
            ("h", node.geometry.height),
            parent,
            settings,
            out,
        );
    }
}

fn axis_size(
    sizing: LayoutSizing,
    axis: LayoutDirection,
    (prefix, value): (&str, f64),
    parent: ParentContext<'_>,
    settings: &Settings,
    out: &mut StyleResolution,
) {
    match (sizing, parent.layout) {
        (LayoutSizing::Hug, _) => {}
        (LayoutSizing::Fill, Some(layout)) if layout.direction == axis => out.add("flex-1"),
        (LayoutSizing::Fill, Some(_)) => out.add(format!("{}-full", prefix)),
        _ => out.add(spacing_token(prefix, value.max(0.0), settings)),
    }
}

/// Flex tokens for a container that lays out its own children
pub fn resolve_auto_layout(layout: &AutoLayout, settings: &Settings, out: &mut StyleResolution) {
    out.add("flex");
    if layout.direction == LayoutDirection::Column {
        out.add("flex-col");
    }
    if layout.wrap {
        out.add("flex-wrap");
    }

    match layout.primary_align {
        AxisAlign::Center => out.add("justify-center"),
        AxisAlign::Max => out.add("justify-end"),
        AxisAlign::SpaceBetween => out.add("justify-between"),
        AxisAlign::Min | AxisAlign::Baseline => {}
    }
    match layout.counter_align {
        AxisAlign::Min => out.add("items-start"),
        AxisAlign::Center => out.add("items-center"),
        AxisAlign::Max => out.add("items-end"),
        AxisAlign::Baseline => out.add("items-baseline"),
        AxisAlign::SpaceBetween => {}
    }

    if layout.gap > 0.0 && layout.primary_align != AxisAlign::SpaceBetween {
        out.add(spacing_token("gap", layout.gap, settings));
    }
    resolve_padding(&layout.padding, settings, out);
}

/// `p-4`, `px-2 py-1`, or one token per non-zero side
pub fn resolve_padding(padding: &Padding, settings: &Settings, out: &mut StyleResolution) {
    let Padding {
        top,
        right,
        bottom,
        left,
    } = *padding;

    if top == bottom && left == right {
        if top == left {
            if top > 0.0 {
                out.add(spacing_token("p", top, settings));
            }
            return;
        }
        if left > 0.0 {
            out.add(spacing_token("px", left, settings));
        }
        if top > 0.0 {
            out.add(spacing_token("py", top, settings));
        }
        return;
    }

    for (prefix, value) in [("pt", top), ("pr", right), ("pb", bottom), ("pl", left)] {
        if value > 0.0 {
            out.add(spacing_token(prefix, value, settings));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        let mut settings = Settings::default();
        settings.rounding.values = false;
        settings
    }

    fn layout(direction: LayoutDirection) -> AutoLayout {
        AutoLayout {
            direction,
            primary_align: AxisAlign::SpaceBetween,
            counter_align: AxisAlign::Center,
            gap: 8.0,
            padding: Padding::default(),
            wrap: false,
        }
    }

    #[test]
    fn test_auto_layout_tokens() {
        let mut out = StyleResolution::new(&settings());
        resolve_auto_layout(&layout(LayoutDirection::Column), &settings(), &mut out);
        assert_eq!(out.class_string(), "flex flex-col justify-between items-center");

        let mut row = layout(LayoutDirection::Row);
        row.primary_align = AxisAlign::Min;
        let mut out = StyleResolution::new(&settings());
        resolve_auto_layout(&row, &Settings::default(), &mut out);
        assert_eq!(out.class_string(), "flex items-center gap-2");
    }

    #[test]
    fn test_padding_collapse() {
        let s = settings();
        let cases = [
            (Padding { top: 8.0, right: 8.0, bottom: 8.0, left: 8.0 }, "p-[8px]"),
            (Padding { top: 4.0, right: 8.0, bottom: 4.0, left: 8.0 }, "px-[8px] py-[4px]"),
            (Padding { top: 0.0, right: 8.0, bottom: 0.0, left: 8.0 }, "px-[8px]"),
            (Padding { top: 1.0, right: 2.0, bottom: 3.0, left: 0.0 }, "pt-[1px] pr-[2px] pb-[3px]"),
        ];
        for (padding, expected) in cases {
            let mut out = StyleResolution::new(&s);
            resolve_padding(&padding, &s, &mut out);
            assert_eq!(out.class_string(), expected);
        }
    }
}
