//! Color utilities for plots

use egui::Color32;

/// Fill and stroke used for the default variables
pub const BEDROOMS: (&str, &str) = ("#4A90E2", "#79b1ff");
pub const STORIES: (&str, &str) = ("#9b59b6", "#b889ff");
pub const BATHROOMS: (&str, &str) = ("#F5A623", "#ffb86a");

pub const SEPARATOR: Color32 = Color32::from_rgb(0xcc, 0xcc, 0xcc);
pub const AXIS_TEXT: Color32 = Color32::from_rgb(0x44, 0x44, 0x44);
pub const BRUSH_FILL: Color32 = Color32::from_rgb(0x77, 0x77, 0x77);

/// Get a categorical color from a palette
pub fn categorical_color(index: usize) -> Color32 {
    const PALETTE: &[Color32] = &[
        Color32::from_rgb(100, 150, 250),  // Blue
        Color32::from_rgb(250, 150, 100),  // Orange
        Color32::from_rgb(150, 250, 100),  // Green
        Color32::from_rgb(250, 100, 150),  // Pink
        Color32::from_rgb(150, 100, 250),  // Purple
    ];
    PALETTE[index % PALETTE.len()]
}

/// Parse `#rgb` or `#rrggbb`
pub fn parse_hex_color(hex: &str) -> Option<Color32> {
    let digits = hex.trim().strip_prefix('#')?;
    if !digits.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match digits.len() {
        6 => Some(Color32::from_rgb(
            channel(&digits[0..2])?,
            channel(&digits[2..4])?,
            channel(&digits[4..6])?,
        )),
        3 => {
            let mut rgb = [0u8; 3];
            for (slot, c) in rgb.iter_mut().zip(digits.chars()) {
                let v = c.to_digit(16)? as u8;
                *slot = v * 17;
            }
            Some(Color32::from_rgb(rgb[0], rgb[1], rgb[2]))
        }
        _ => None,
    }
}

/// Parsed `hex`, or the palette entry for `index` when missing or invalid
pub fn color_or_palette(hex: Option<&str>, index: usize) -> Color32 {
    hex.and_then(parse_hex_color).unwrap_or_else(|| categorical_color(index))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex_color("#4A90E2"), Some(Color32::from_rgb(0x4a, 0x90, 0xe2)));
        assert_eq!(parse_hex_color("#333"), Some(Color32::from_rgb(0x33, 0x33, 0x33)));
        assert_eq!(parse_hex_color("4A90E2"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
    }

    #[test]
    fn test_palette_fallback() {
        assert_eq!(color_or_palette(None, 1), categorical_color(1));
        assert_eq!(color_or_palette(Some("bad"), 6), categorical_color(1));
    }
}
