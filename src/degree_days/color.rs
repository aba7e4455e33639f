use plotters::style::RGBColor;

use super::types::Severity;

/// Color for an unchanged value.
pub const NEUTRAL: RGBColor = RGBColor(0x66, 0x66, 0x66);

/// Light and dark stops per direction.
const UNFAVORABLE_STOPS: (RGBColor, RGBColor) =
    (RGBColor(0xf4, 0x8c, 0x84), RGBColor(0x8b, 0x00, 0x00));
const FAVORABLE_STOPS: (RGBColor, RGBColor) =
    (RGBColor(0x8f, 0xd1, 0x9e), RGBColor(0x00, 0x64, 0x00));

/// Text color for a percent deviation.
///
/// The magnitude `|pct| / 100` is clamped to `[0, 1]` and interpolated
/// between the light and dark stop for the severity. A magnitude that is not
/// a finite number gets the dark stop.
pub fn color_for_severity(pct: f64, severity: Severity) -> RGBColor {
    let (light, dark) = match severity {
        Severity::Favorable => FAVORABLE_STOPS,
        Severity::Unfavorable => UNFAVORABLE_STOPS,
        Severity::Neutral => return NEUTRAL,
    };

    let magnitude = (pct / 100.0).abs();
    if !magnitude.is_finite() {
        return dark;
    }

    interpolate(light, dark, magnitude.min(1.0))
}

/// Formats a color as a CSS hex string (`#rrggbb`).
pub fn to_hex(color: RGBColor) -> String {
    format!("#{:02x}{:02x}{:02x}", color.0, color.1, color.2)
}

fn interpolate(from: RGBColor, to: RGBColor, t: f64) -> RGBColor {
    let channel = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
    RGBColor(
        channel(from.0, to.0),
        channel(from.1, to.1),
        channel(from.2, to.2),
    )
}
