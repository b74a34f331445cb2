use serde::{Deserialize, Serialize};

/// Axis-aligned box in host pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Smallest box containing both.
    pub fn union(&self, other: &Rect) -> Rect {
        let left = self.x.min(other.x);
        let top = self.y.min(other.y);
        let right = (self.x + self.width).max(other.x + other.width);
        let bottom = (self.y + self.height).max(other.y + other.height);
        Rect::new(left, top, right - left, bottom - top)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }
}

/// Format a number with at most two decimals and no trailing zeros.
pub fn format_number(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    let mut text = format!("{:.2}", rounded);
    while text.ends_with('0') {
        text.pop();
    }
    if text.ends_with('.') {
        text.pop();
    }
    text
}

/// `12` -> `12px`, `0.5` -> `0.5px`
pub fn format_px(value: f64) -> String {
    format!("{}px", format_number(value))
}

/// Whether `candidate` is close enough to `raw` to replace it.
///
/// The boundary is inclusive: a relative difference of exactly
/// `threshold_percent` still rounds.
pub fn within_threshold(raw: f64, candidate: f64, threshold_percent: f64) -> bool {
    let diff = (raw - candidate).abs();
    if raw == 0.0 {
        return diff == 0.0;
    }
    diff * 100.0 <= threshold_percent * raw.abs()
}

/// Snap `raw` onto an ascending scale of `(value, label)` pairs.
///
/// Picks the nearest entry by absolute difference (ties go to the earlier,
/// smaller entry) and returns its label only if it is within the threshold.
pub fn snap_to_scale<'a, T>(
    raw: f64,
    scale: &'a [(f64, T)],
    threshold_percent: f64,
) -> Option<&'a T> {
    let mut best: Option<&(f64, T)> = None;
    for entry in scale {
        let closer = match best {
            Some(current) => (raw - entry.0).abs() < (raw - current.0).abs(),
            None => true,
        };
        if closer {
            best = Some(entry);
        }
    }
    let (value, label) = best?;
    within_threshold(raw, *value, threshold_percent).then_some(label)
}
