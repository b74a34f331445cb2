use serde::{Deserialize, Serialize};

fn default_alpha() -> f64 {
    1.0
}

/// Color with channels in the `0.0..=1.0` range, as the design host reports it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default = "default_alpha")]
    pub a: f64,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Rgba = Rgba::rgb(1.0, 1.0, 1.0);

    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Build from a packed `0xRRGGBB` value.
    pub fn from_packed(rgb: u32) -> Self {
        let channel = |shift: u32| ((rgb >> shift) & 0xff) as f64 / 255.0;
        Self::rgb(channel(16), channel(8), channel(0))
    }

    pub fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    /// Channels as 8-bit integers (alpha ignored).
    pub fn to_bytes(&self) -> [u8; 3] {
        [to_byte(self.r), to_byte(self.g), to_byte(self.b)]
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(&self) -> String {
        let [r, g, b] = self.to_bytes();
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }

    pub fn is_opaque(&self) -> bool {
        self.a >= 1.0
    }

    /// Alpha as a whole percentage, clamped to `0..=100`.
    pub fn alpha_percent(&self) -> u32 {
        (self.a.clamp(0.0, 1.0) * 100.0).round() as u32
    }

    /// Squared euclidean distance in 8-bit RGB space.
    pub fn distance_squared(&self, other: &Rgba) -> u32 {
        let a = self.to_bytes();
        let b = other.to_bytes();
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| {
                let d = *x as i32 - *y as i32;
                (d * d) as u32
            })
            .sum()
    }

    /// WCAG relative luminance.
    pub fn relative_luminance(&self) -> f64 {
        let linear = |c: f64| {
            let c = c.clamp(0.0, 1.0);
            if c <= 0.03928 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        };
        0.2126 * linear(self.r) + 0.7152 * linear(self.g) + 0.0722 * linear(self.b)
    }
}

fn to_byte(channel: f64) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// WCAG contrast ratio between two colors, in `1.0..=21.0`.
pub fn contrast_ratio(a: &Rgba, b: &Rgba) -> f64 {
    let la = a.relative_luminance();
    let lb = b.relative_luminance();
    let (light, dark) = if la >= lb { (la, lb) } else { (lb, la) };
    (light + 0.05) / (dark + 0.05)
}

/// Parse `#rgb` or `#rrggbb` (leading `#` optional).
pub fn parse_hex(hex: &str) -> Option<Rgba> {
    let digits = hex.trim().trim_start_matches('#');
    let expanded = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect::<String>(),
        6 => digits.to_string(),
        _ => return None,
    };
    u32::from_str_radix(&expanded, 16).ok().map(Rgba::from_packed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_conversion() {
        assert_eq!(Rgba::rgb(1.0, 0.0, 0.0).to_hex(), "#ff0000");
        assert_eq!(Rgba::rgb(0.2, 0.4, 1.0).to_hex(), "#3366ff");
        assert_eq!(Rgba::from_packed(0x3b82f6).to_hex(), "#3b82f6");
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("#fff").map(|c| c.to_hex()), Some("#ffffff".to_string()));
        assert_eq!(parse_hex("3B82F6").map(|c| c.to_hex()), Some("#3b82f6".to_string()));
        assert!(parse_hex("#12345").is_none());
        assert!(parse_hex("#zzzzzz").is_none());
    }

    #[test]
    fn test_contrast_ratio_extremes() {
        let ratio = contrast_ratio(&Rgba::BLACK, &Rgba::WHITE);
        assert!((ratio - 21.0).abs() < 1e-9);
        assert!((contrast_ratio(&Rgba::WHITE, &Rgba::WHITE) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_contrast_ratio_is_symmetric() {
        let blue = Rgba::from_packed(0x3b82f6);
        assert_eq!(
            contrast_ratio(&blue, &Rgba::WHITE),
            contrast_ratio(&Rgba::WHITE, &blue)
        );
    }

    #[test]
    fn test_alpha_percent() {
        assert_eq!(Rgba::BLACK.with_alpha(0.5).alpha_percent(), 50);
        assert_eq!(Rgba::BLACK.with_alpha(1.4).alpha_percent(), 100);
    }
}
