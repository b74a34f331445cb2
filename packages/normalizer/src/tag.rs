//! Layer-name annotations.
//!
//! Grammar: a name starting with `#` carries a tag. The keyword is the first
//! whitespace-delimited word; arguments follow as `:`-separated segments.
//!
//! ```text
//! #ignore
//! #prompt make this a carousel
//! #slot:img:hero
//! #list:products
//! #static
//! #canvas:chart
//! ```

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SlotKind {
    Image,
    Text,
    Video,
    Lottie,
    Svga,
    Unity,
    Color,
    Generic,
}

impl SlotKind {
    pub fn from_subtype(subtype: &str) -> Self {
        match subtype.to_ascii_lowercase().as_str() {
            "img" | "image" => SlotKind::Image,
            "text" => SlotKind::Text,
            "video" => SlotKind::Video,
            "lottie" => SlotKind::Lottie,
            "svga" => SlotKind::Svga,
            "unity" => SlotKind::Unity,
            "color" => SlotKind::Color,
            _ => SlotKind::Generic,
        }
    }

    /// Component suffix: `Image` in `SlotImage`, empty for generic slots
    pub fn component_suffix(&self) -> &'static str {
        match self {
            SlotKind::Image => "Image",
            SlotKind::Text => "Text",
            SlotKind::Video => "Video",
            SlotKind::Lottie => "Lottie",
            SlotKind::Svga => "Svga",
            SlotKind::Unity => "Unity",
            SlotKind::Color => "Color",
            SlotKind::Generic => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub enum SpecialTag {
    #[default]
    None,
    Ignore,
    AiInstruction {
        instruction: String,
    },
    Slot {
        kind: SlotKind,
        subtype: String,
        id: String,
    },
    List {
        id: String,
    },
    StaticOverride,
    Canvas {
        id: String,
    },
}

impl SpecialTag {
    pub fn is_none(&self) -> bool {
        matches!(self, SpecialTag::None)
    }
}

/// A `#keyword` that is not part of the tag grammar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTag(pub String);

impl fmt::Display for UnknownTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown tag '{}'", self.0)
    }
}

/// Parse a layer name into a tag.
///
/// Missing argument segments become empty strings. Names without a leading
/// `#` are untagged.
pub fn parse_tag(name: &str) -> Result<SpecialTag, UnknownTag> {
    let name = name.trim();
    if !name.starts_with('#') {
        return Ok(SpecialTag::None);
    }

    let mut segments = name.split(':');
    let head = segments.next().unwrap_or_default();
    let keyword = head.split_whitespace().next().unwrap_or_default();
    let args: Vec<&str> = segments.map(str::trim).collect();
    let arg = |index: usize| args.get(index).copied().unwrap_or_default().to_string();

    match keyword.to_ascii_lowercase().as_str() {
        "#ignore" => Ok(SpecialTag::Ignore),
        "#static" => Ok(SpecialTag::StaticOverride),
        "#prompt" => Ok(SpecialTag::AiInstruction {
            instruction: name[keyword.len()..]
                .trim_start_matches(':')
                .trim()
                .to_string(),
        }),
        "#slot" => {
            let subtype = arg(0);
            Ok(SpecialTag::Slot {
                kind: SlotKind::from_subtype(&subtype),
                subtype,
                id: arg(1),
            })
        }
        "#list" => Ok(SpecialTag::List { id: arg(0) }),
        "#canvas" => Ok(SpecialTag::Canvas { id: arg(0) }),
        _ => Err(UnknownTag(keyword.to_string())),
    }
}
