//! Value scales and the rounding rules that snap onto them.

use figwind_common::{format_number, format_px, snap_to_scale, Settings};

/// px -> spacing key
pub const SPACING: &[(f64, &str)] = &[
    (0.0, "0"),
    (1.0, "px"),
    (2.0, "0.5"),
    (4.0, "1"),
    (6.0, "1.5"),
    (8.0, "2"),
    (10.0, "2.5"),
    (12.0, "3"),
    (14.0, "3.5"),
    (16.0, "4"),
    (20.0, "5"),
    (24.0, "6"),
    (28.0, "7"),
    (32.0, "8"),
    (36.0, "9"),
    (40.0, "10"),
    (44.0, "11"),
    (48.0, "12"),
    (56.0, "14"),
    (64.0, "16"),
    (80.0, "20"),
    (96.0, "24"),
    (112.0, "28"),
    (128.0, "32"),
    (144.0, "36"),
    (160.0, "40"),
    (176.0, "44"),
    (192.0, "48"),
    (208.0, "52"),
    (224.0, "56"),
    (240.0, "60"),
    (256.0, "64"),
    (288.0, "72"),
    (320.0, "80"),
    (384.0, "96"),
];

/// px -> full radius token
pub const RADIUS: &[(f64, &str)] = &[
    (2.0, "rounded-sm"),
    (4.0, "rounded"),
    (6.0, "rounded-md"),
    (8.0, "rounded-lg"),
    (12.0, "rounded-xl"),
    (16.0, "rounded-2xl"),
    (24.0, "rounded-3xl"),
];

/// px at a 16px base -> font size key
pub const FONT_SIZE: &[(f64, &str)] = &[
    (12.0, "xs"),
    (14.0, "sm"),
    (16.0, "base"),
    (18.0, "lg"),
    (20.0, "xl"),
    (24.0, "2xl"),
    (30.0, "3xl"),
    (36.0, "4xl"),
    (48.0, "5xl"),
    (60.0, "6xl"),
    (72.0, "7xl"),
    (96.0, "8xl"),
    (128.0, "9xl"),
];

/// Percent -> opacity key
pub const OPACITY: &[(f64, &str)] = &[
    (0.0, "0"),
    (5.0, "5"),
    (10.0, "10"),
    (15.0, "15"),
    (20.0, "20"),
    (25.0, "25"),
    (30.0, "30"),
    (40.0, "40"),
    (50.0, "50"),
    (60.0, "60"),
    (70.0, "70"),
    (75.0, "75"),
    (80.0, "80"),
    (90.0, "90"),
    (95.0, "95"),
    (100.0, "100"),
];

/// Spacing value for `prefix` tokens such as `w`, `gap` or `pl`.
///
/// Zero is always `0`. Negative values are never rounded.
pub fn spacing(raw: f64, settings: &Settings) -> String {
    if raw == 0.0 {
        return "0".to_string();
    }
    if settings.rounding.values && raw > 0.0 {
        if let Some(key) = snap_to_scale(raw, SPACING, settings.rounding.threshold()) {
            return key.to_string();
        }
    }
    format!("[{}]", format_px(raw))
}

/// `w-24`, `pl-[13px]`
pub fn spacing_token(prefix: &str, raw: f64, settings: &Settings) -> String {
    format!("{}-{}", prefix, spacing(raw, settings))
}

pub fn radius_token(raw: f64, settings: &Settings) -> String {
    if settings.rounding.values {
        if let Some(token) = snap_to_scale(raw, RADIUS, settings.rounding.threshold()) {
            return token.to_string();
        }
    }
    format!("rounded-[{}]", format_px(raw))
}

/// Font size, with the scale stretched by `baseFontSize / 16`.
pub fn font_size_token(raw: f64, settings: &Settings) -> String {
    if settings.rounding.values {
        let factor = settings.base_font_size() / 16.0;
        let scaled: Vec<(f64, &str)> = FONT_SIZE.iter().map(|(px, key)| (px * factor, *key)).collect();
        if let Some(key) = snap_to_scale(raw, &scaled, settings.rounding.threshold()) {
            return format!("text-{}", key);
        }
    }
    format!("text-[{}]", format_px(raw))
}

/// Opacity in `0.0..=1.0`
pub fn opacity_token(opacity: f64, settings: &Settings) -> String {
    let percent = opacity * 100.0;
    let threshold = if settings.rounding.values {
        settings.rounding.threshold()
    } else {
        0.0
    };
    match snap_to_scale(percent, OPACITY, threshold) {
        Some(key) => format!("opacity-{}", key),
        None => format!("opacity-[{}]", format_number(opacity)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rounding(enabled: bool, threshold: f64) -> Settings {
        let mut settings = Settings::default();
        settings.rounding.values = enabled;
        settings.rounding.threshold_percent = threshold;
        settings
    }

    #[test]
    fn test_spacing_rounds_within_threshold() {
        let settings = rounding(true, 15.0);
        assert_eq!(spacing_token("w", 100.0, &settings), "w-24");
        assert_eq!(spacing_token("h", 17.0, &settings), "h-4");
        assert_eq!(spacing_token("w", 1000.0, &settings), "w-[1000px]");
    }

    #[test]
    fn test_spacing_boundary_is_inclusive() {
        // 50 -> 48 is a 4% difference
        assert_eq!(spacing(50.0, &rounding(true, 4.0)), "12");
        assert_eq!(spacing(50.0, &rounding(true, 3.0)), "[50px]");
    }

    #[test]
    fn test_spacing_without_rounding() {
        let settings = rounding(false, 15.0);
        assert_eq!(spacing_token("w", 100.0, &settings), "w-[100px]");
        assert_eq!(spacing_token("w", 0.0, &settings), "w-0");
        assert_eq!(spacing(12.5, &settings), "[12.5px]");
    }

    #[test]
    fn test_negative_values_stay_arbitrary() {
        assert_eq!(spacing_token("left", -8.0, &rounding(true, 50.0)), "left-[-8px]");
    }

    #[test]
    fn test_font_size_scales_with_base() {
        let mut settings = rounding(true, 5.0);
        assert_eq!(font_size_token(24.0, &settings), "text-2xl");
        settings.base_font_size = 20.0;
        assert_eq!(font_size_token(20.0, &settings), "text-base");
        assert_eq!(font_size_token(27.0, &settings), "text-[27px]");
    }

    #[test]
    fn test_radius_and_opacity() {
        let settings = rounding(true, 15.0);
        assert_eq!(radius_token(8.0, &settings), "rounded-lg");
        assert_eq!(radius_token(100.0, &settings), "rounded-[100px]");
        assert_eq!(opacity_token(0.5, &settings), "opacity-50");
        assert_eq!(opacity_token(0.37, &rounding(false, 15.0)), "opacity-[0.37]");
    }
}
