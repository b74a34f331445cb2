//! Markup building blocks shared by the code and preview passes.
//!
//! Every rendered fragment starts with a newline; nesting indents by two
//! spaces. The caller strips the leading newline of the final output.

use crate::resolve::StyleResolution;
use figwind_common::GenerationMode;

const INDENT: &str = "  ";

#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// Quoted string
    Text(String),
    /// `{value}` in JSX, quoted in HTML
    Expr(String),
    /// Bare attribute name
    Flag,
}

#[derive(Debug, Clone, PartialEq)]
enum Content {
    Empty,
    /// Escaped inline content
    Inline(String),
    /// Rendered child fragments
    Children(Vec<String>),
    /// Pre-formatted block such as SVG markup
    Block(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: String,
    attributes: Vec<(String, AttrValue)>,
    content: Content,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            content: Content::Empty,
        }
    }

    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attributes
            .push((name.to_string(), AttrValue::Text(value.into())));
        self
    }

    pub fn expr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attributes
            .push((name.to_string(), AttrValue::Expr(value.into())));
        self
    }

    pub fn flag(mut self, name: &str) -> Self {
        self.attributes.push((name.to_string(), AttrValue::Flag));
        self
    }

    /// Class and style attributes from a resolution, omitted when empty
    pub fn styled(mut self, resolution: &StyleResolution, mode: GenerationMode) -> Self {
        if !resolution.classes().is_empty() {
            let name = if mode.is_jsx() { "className" } else { "class" };
            self = self.attr(name, resolution.class_string());
        }
        if !resolution.styles().is_empty() {
            self.attributes
                .push(("style".to_string(), style_attribute(resolution.styles(), mode)));
        }
        self
    }

    pub fn inline(mut self, escaped: impl Into<String>) -> Self {
        self.content = Content::Inline(escaped.into());
        self
    }

    pub fn children(mut self, fragments: Vec<String>) -> Self {
        self.content = Content::Children(fragments);
        self
    }

    pub fn block(mut self, text: impl Into<String>) -> Self {
        self.content = Content::Block(text.into());
        self
    }

    pub fn render(&self, mode: GenerationMode) -> String {
        let mut out = format!("\n<{}", self.tag);
        for (name, value) in &self.attributes {
            out.push(' ');
            out.push_str(name);
            match value {
                AttrValue::Text(text) => {
                    out.push_str(&format!("=\"{}\"", escape_html(text)));
                }
                AttrValue::Expr(expr) if mode.is_jsx() => out.push_str(&format!("={{{}}}", expr)),
                AttrValue::Expr(expr) => out.push_str(&format!("=\"{}\"", escape_html(expr))),
                AttrValue::Flag => {}
            }
        }

        match &self.content {
            Content::Empty if is_self_closing(&self.tag, mode) => out.push_str(" />"),
            Content::Empty => out.push_str(&format!("></{}>", self.tag)),
            Content::Inline(text) => out.push_str(&format!(">{}</{}>", text, self.tag)),
            Content::Children(fragments) => {
                out.push('>');
                out.push_str(&indent(&fragments.concat()));
                out.push_str(&format!("\n</{}>", self.tag));
            }
            Content::Block(text) => {
                out.push('>');
                let lines: String = text
                    .lines()
                    .filter(|line| !line.trim().is_empty())
                    .map(|line| format!("\n{}", line))
                    .collect();
                out.push_str(&indent(&lines));
                out.push_str(&format!("\n</{}>", self.tag));
            }
        }
        out
    }
}

fn style_attribute(styles: &[(String, String)], mode: GenerationMode) -> AttrValue {
    if mode.is_jsx() {
        let body = styles
            .iter()
            .map(|(property, value)| format!("{}: \"{}\"", camel_case(property), value))
            .collect::<Vec<_>>()
            .join(", ");
        AttrValue::Expr(format!("{{{}}}", body))
    } else {
        let body = styles
            .iter()
            .map(|(property, value)| format!("{}: {}", property, value))
            .collect::<Vec<_>>()
            .join("; ");
        AttrValue::Text(body)
    }
}

/// `background-image` -> `backgroundImage`
fn camel_case(property: &str) -> String {
    let mut out = String::with_capacity(property.len());
    let mut upper = false;
    for c in property.chars() {
        if c == '-' {
            upper = true;
        } else if upper {
            out.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Indent every line of a fragment by one level
pub fn indent(fragment: &str) -> String {
    fragment.replace('\n', &format!("\n{}", INDENT))
}

pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Escape text content; line breaks become `<br/>`.
pub fn escape_text(text: &str, mode: GenerationMode) -> String {
    text.split('\n')
        .map(|line| {
            let escaped = line
                .replace('&', "&amp;")
                .replace('<', "&lt;")
                .replace('>', "&gt;");
            if mode.is_jsx() {
                escaped.replace('{', "&#123;").replace('}', "&#125;")
            } else {
                escaped
            }
        })
        .collect::<Vec<_>>()
        .join("<br/>")
}

/// Comment fragment; terminators inside `text` are broken up.
pub fn comment(text: &str, mode: GenerationMode) -> String {
    if mode.is_jsx() {
        format!("\n{{/* {} */}}", text.replace("*/", "* /"))
    } else {
        format!("\n<!-- {} -->", text.replace("-->", "-- >"))
    }
}

/// Whether an element without content closes itself.
///
/// JSX closes every empty element; HTML only its void elements.
pub fn is_self_closing(tag: &str, mode: GenerationMode) -> bool {
    mode.is_jsx()
        || matches!(
            tag,
            "img"
                | "input"
                | "br"
                | "hr"
                | "meta"
                | "link"
                | "area"
                | "base"
                | "col"
                | "embed"
                | "param"
                | "source"
                | "track"
                | "wbr"
        )
}
