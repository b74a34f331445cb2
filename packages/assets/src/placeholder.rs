use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::fmt;

pub const PLACEHOLDER_IMAGE_DOMAIN: &str = "https://placehold.co";

/// Kind of exported asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Png,
    Svg,
}

impl AssetKind {
    pub fn extension(&self) -> &'static str {
        match self {
            AssetKind::Png => "png",
            AssetKind::Svg => "svg",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            AssetKind::Png => "image/png",
            AssetKind::Svg => "image/svg+xml",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Deterministic stand-in image for a `width` x `height` box.
///
/// A negative height reuses the width.
pub fn placeholder_image_url(width: f64, height: f64) -> String {
    let height = if height < 0.0 { width } else { height };
    format!(
        "{}/{:.0}x{:.0}",
        PLACEHOLDER_IMAGE_DOMAIN,
        width.max(0.0).round(),
        height.max(0.0).round()
    )
}

/// Inline `data:` URI for exported bytes
pub fn to_data_uri(bytes: &[u8], kind: AssetKind) -> String {
    format!("data:{};base64,{}", kind.content_type(), STANDARD.encode(bytes))
}
