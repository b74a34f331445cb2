use super::StyleResolution;
use figwind_common::{nearest_named_color, Settings};
use figwind_normalizer::{Fill, LinearGradient, SolidFill};

/// Color part of a token: `brand-primary`, `blue-500`, `[#3b82f6]/50`.
///
/// A resolved variable name wins over numeric matching.
pub fn color_value(fill: &SolidFill, settings: &Settings) -> String {
    let color = &fill.color;
    if color.a <= 0.0 {
        return "transparent".to_string();
    }

    let base = match &fill.variable {
        Some(name) => name.clone(),
        None if settings.rounding.colors => nearest_named_color(color).name.clone(),
        None => format!("[{}]", color.to_hex()),
    };
    if color.is_opaque() {
        base
    } else {
        format!("{}/{}", base, color.alpha_percent())
    }
}

/// `bg-blue-500`, `text-[#111111]`
pub fn color_token(kind: &str, fill: &SolidFill, settings: &Settings) -> String {
    format!("{}-{}", kind, color_value(fill, settings))
}

/// Background from the top solid or gradient fill. Image fills are left to
/// the emitter.
pub fn resolve_background(fills: &[Fill], settings: &Settings, out: &mut StyleResolution) {
    match fills.last() {
        Some(Fill::Solid(solid)) => out.add(color_token("bg", solid, settings)),
        Some(Fill::LinearGradient(gradient)) => resolve_gradient(gradient, settings, out),
        Some(Fill::Image { .. }) | None => {}
    }
}

pub fn resolve_gradient(gradient: &LinearGradient, settings: &Settings, out: &mut StyleResolution) {
    let stops = &gradient.stops;
    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return;
    };
    out.add(format!("bg-gradient-to-{}", gradient_direction(gradient.angle)));
    out.add(color_token("from", &first.fill, settings));
    if stops.len() > 2 {
        out.add(color_token("via", &stops[stops.len() / 2].fill, settings));
    }
    out.add(color_token("to", &last.fill, settings));
}

/// Nearest of the eight gradient directions for an angle in degrees
/// (0 = right, 90 = down).
pub fn gradient_direction(angle: f64) -> &'static str {
    const DIRECTIONS: [&str; 8] = ["r", "br", "b", "bl", "l", "tl", "t", "tr"];
    let normalized = angle.rem_euclid(360.0);
    let index = ((normalized + 22.5) / 45.0).floor() as usize % 8;
    DIRECTIONS[index]
}
