//! Text alignment, run styles and segmentation.

use super::color::color_token;
use super::scale::font_size_token;
use super::StyleResolution;
use figwind_common::{format_number, format_px, Settings};
use figwind_normalizer::scene::{
    SpacingUnit, SpacingValue, TextAlignHorizontal, TextAlignVertical, TextCase, TextDecoration,
};
use figwind_normalizer::{TextContent, TextRunStyle};

/// Contiguous characters sharing one style
#[derive(Debug, Clone, PartialEq)]
pub struct Segment<'a> {
    pub text: String,
    pub style: &'a TextRunStyle,
}

/// Merge adjacent runs with identical styles. Equal styles that are not
/// adjacent stay separate.
pub fn segments(content: &TextContent) -> Vec<Segment<'_>> {
    let mut segments: Vec<Segment<'_>> = Vec::new();
    for run in &content.runs {
        if let Some(last) = segments.last_mut().filter(|last| *last.style == run.style) {
            last.text.push_str(&run.text);
            continue;
        }
        segments.push(Segment {
            text: run.text.clone(),
            style: &run.style,
        });
    }
    segments
}

/// Block-level alignment of the text element
pub fn resolve_alignment(content: &TextContent, out: &mut StyleResolution) {
    match content.align_horizontal {
        TextAlignHorizontal::Center => out.add("text-center"),
        TextAlignHorizontal::Right => out.add("text-right"),
        TextAlignHorizontal::Justified => out.add("text-justify"),
        TextAlignHorizontal::Left => {}
    }
    match content.align_vertical {
        TextAlignVertical::Top => {}
        TextAlignVertical::Center => {
            out.add("flex");
            out.add("flex-col");
            out.add("justify-center");
        }
        TextAlignVertical::Bottom => {
            out.add("flex");
            out.add("flex-col");
            out.add("justify-end");
        }
    }
}

pub fn resolve_run(style: &TextRunStyle, settings: &Settings, out: &mut StyleResolution) {
    if let Some(size) = style.font_size {
        out.add(font_size_token(size, settings));
    }
    if let Some(weight) = style.font_weight {
        if let Some(token) = weight_token(weight) {
            out.add(token);
        }
    }
    if style.italic {
        out.add("italic");
    }
    if let Some(family) = &style.font_family {
        if let Some(token) = family_token(family, settings) {
            out.add(token);
        }
    }

    match style.decoration {
        TextDecoration::Underline => out.add("underline"),
        TextDecoration::Strikethrough => out.add("line-through"),
        TextDecoration::None => {}
    }
    match style.case {
        TextCase::Upper => out.add("uppercase"),
        TextCase::Lower => out.add("lowercase"),
        TextCase::Title => out.add("capitalize"),
        TextCase::Original | TextCase::SmallCaps | TextCase::SmallCapsForced => {}
    }

    if let Some(spacing) = style.letter_spacing {
        if let Some(value) = tracking_value(spacing) {
            out.add(format!("tracking-[{}]", value));
        }
    }
    if let Some(line_height) = style.line_height {
        if let Some(value) = leading_value(line_height) {
            out.add(format!("leading-[{}]", value));
        }
    }
    if let Some(color) = &style.color {
        out.add(color_token("text", color, settings));
    }
}

fn weight_token(weight: u16) -> Option<String> {
    let name = match weight {
        400 => return None,
        100 => "thin",
        200 => "extralight",
        300 => "light",
        500 => "medium",
        600 => "semibold",
        700 => "bold",
        800 => "extrabold",
        900 => "black",
        other => return Some(format!("font-[{}]", other)),
    };
    Some(format!("font-{}", name))
}

/// `font-display` from the custom config, `font-['Open_Sans']` otherwise.
/// The base family needs no token.
fn family_token(family: &str, settings: &Settings) -> Option<String> {
    if family.eq_ignore_ascii_case(settings.base_font_family.trim()) {
        return None;
    }
    let configured = settings
        .font_family_custom_config
        .iter()
        .find(|(_, families)| families.iter().any(|f| f.eq_ignore_ascii_case(family)));
    Some(match configured {
        Some((key, _)) => format!("font-{}", key),
        None => format!("font-['{}']", family.replace(' ', "_")),
    })
}

fn tracking_value(spacing: SpacingValue) -> Option<String> {
    if spacing.value == 0.0 {
        return None;
    }
    match spacing.unit {
        SpacingUnit::Pixels => Some(format_px(spacing.value)),
        SpacingUnit::Percent => Some(format!("{}em", format_number(spacing.value / 100.0))),
        SpacingUnit::Auto => None,
    }
}

fn leading_value(line_height: SpacingValue) -> Option<String> {
    match line_height.unit {
        SpacingUnit::Pixels if line_height.value > 0.0 => Some(format_px(line_height.value)),
        SpacingUnit::Percent if line_height.value > 0.0 => {
            Some(format_number(line_height.value / 100.0))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figwind_normalizer::TextRun;

    fn run(text: &str, style: TextRunStyle) -> TextRun {
        TextRun {
            text: text.to_string(),
            style,
        }
    }

    fn bold() -> TextRunStyle {
        TextRunStyle {
            font_weight: Some(700),
            ..Default::default()
        }
    }

    #[test]
    fn test_adjacent_runs_merge() {
        let content = TextContent {
            runs: vec![
                run("Hel", bold()),
                run("lo", bold()),
                run(" ", TextRunStyle::default()),
                run("world", bold()),
            ],
            ..Default::default()
        };
        let texts: Vec<_> = segments(&content).into_iter().map(|s| s.text).collect();
        assert_eq!(texts, ["Hello", " ", "world"]);
    }

    #[test]
    fn test_run_tokens() {
        let mut settings = Settings::default();
        settings.base_font_family = "Inter".to_string();
        settings
            .font_family_custom_config
            .insert("display".to_string(), vec!["Poppins".to_string()]);

        let style = TextRunStyle {
            font_size: Some(24.0),
            font_weight: Some(600),
            italic: true,
            font_family: Some("Poppins".to_string()),
            decoration: TextDecoration::Underline,
            case: TextCase::Upper,
            letter_spacing: Some(SpacingValue {
                value: 5.0,
                unit: SpacingUnit::Percent,
            }),
            line_height: Some(SpacingValue {
                value: 32.0,
                unit: SpacingUnit::Pixels,
            }),
            ..Default::default()
        };
        let mut out = StyleResolution::new(&settings);
        resolve_run(&style, &settings, &mut out);
        assert_eq!(
            out.class_string(),
            "text-2xl font-semibold italic font-display underline uppercase tracking-[0.05em] leading-[32px]"
        );
    }

    #[test]
    fn test_family_tokens() {
        let mut settings = Settings::default();
        settings.base_font_family = "Inter".to_string();
        assert_eq!(family_token("Inter", &settings), None);
        assert_eq!(
            family_token("Open Sans", &settings),
            Some("font-['Open_Sans']".to_string())
        );
    }
}
