//! The three-tier status rule.
//!
//! Every color on the dashboard (cards, chart bars, run table cells) comes
//! from [`classify`]; call sites only choose the palette.

use serde::Serialize;

/// Lowest relative shortfall still rated [`StatusTier::Warn`].
pub const WARN_FLOOR: f64 = -0.10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTier {
    /// At or above target
    Good,
    /// Below target by at most 10%
    Warn,
    /// More than 10% below target
    Bad,
    /// No value, or no usable target
    Neutral,
}

/// Color set used to render a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    /// Cards and chart bars
    Saturated,
    /// Run table cells
    Pastel,
}

impl Palette {
    pub fn color(self, tier: StatusTier) -> &'static str {
        match (self, tier) {
            (Palette::Saturated, StatusTier::Good) => "#4CAF50",
            (Palette::Saturated, StatusTier::Warn) => "#FFC107",
            (Palette::Saturated, StatusTier::Bad) => "#F44336",
            (Palette::Saturated, StatusTier::Neutral) => "#555555",
            (Palette::Pastel, StatusTier::Good) => "#C8E6C9",
            (Palette::Pastel, StatusTier::Warn) => "#FFF9C4",
            (Palette::Pastel, StatusTier::Bad) => "#FFCDD2",
            (Palette::Pastel, StatusTier::Neutral) => "#E0E0E0",
        }
    }
}

impl StatusTier {
    pub fn color(self, palette: Palette) -> &'static str {
        palette.color(self)
    }
}

fn usable_target(target: Option<f64>) -> Option<f64> {
    target.filter(|t| *t != 0.0)
}

/// Classify a measured value against its target.
pub fn classify(value: Option<f64>, target: Option<f64>) -> StatusTier {
    let (Some(value), Some(target)) = (value, usable_target(target)) else {
        return StatusTier::Neutral;
    };

    let ratio = (value - target) / target;
    if ratio >= 0.0 {
        StatusTier::Good
    } else if ratio >= WARN_FLOOR {
        StatusTier::Warn
    } else {
        StatusTier::Bad
    }
}

/// Percentage difference from target; 0 when either side is missing or the
/// target is zero.
pub fn delta_pct(value: Option<f64>, target: Option<f64>) -> f64 {
    match (value, usable_target(target)) {
        (Some(value), Some(target)) => (value - target) / target * 100.0,
        _ => 0.0,
    }
}

/// Whether `s` is a `#RGB` or `#RRGGBB` hex color.
pub fn is_hex_color(s: &str) -> bool {
    let Some(hex) = s.strip_prefix('#') else {
        return false;
    };
    matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
}

/// Pick a display color, preferring a well-formed upstream color code and
/// falling back to the tier color in `palette`.
pub fn resolve_color(
    upstream: Option<&str>,
    value: Option<f64>,
    target: Option<f64>,
    palette: Palette,
) -> String {
    match upstream.map(str::trim) {
        Some(code) if is_hex_color(code) => code.to_string(),
        _ => classify(value, target).color(palette).to_string(),
    }
}
