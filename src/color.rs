//! Hex color parsing and recency blending.
//!
//! Recent records render brighter: the class base color is blended toward
//! white by `1 - intensity`, so a point at the reference instant keeps the
//! pure class color and the oldest points fade most.

/// Parse a "#rrggbb" color into channels. Returns `None` for anything else.
fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

/// Blend a channel toward white by the given amount in [0, 1].
fn blend_channel(channel: u8, amount: f64) -> u8 {
    (channel as f64 + (255.0 - channel as f64) * amount).round() as u8
}

/// Blend a "#rrggbb" color toward white by `1 - intensity`.
///
/// Intensity 1.0 returns the color unchanged; intensity 0.0 returns white.
/// A malformed color is returned unchanged rather than failing — a wrong
/// shade on the map beats no map.
///
/// # Example
/// ```
/// use migration_map::blend_with_white;
///
/// assert_eq!(blend_with_white("#ff6b6b", 1.0), "#ff6b6b");
/// assert_eq!(blend_with_white("#000000", 0.0), "#ffffff");
/// ```
pub fn blend_with_white(base_color: &str, intensity: f64) -> String {
    let Some((r, g, b)) = parse_hex(base_color) else {
        return base_color.to_string();
    };

    let amount = (1.0 - intensity).clamp(0.0, 1.0);
    format!(
        "#{:02x}{:02x}{:02x}",
        blend_channel(r, amount),
        blend_channel(g, amount),
        blend_channel(b, amount)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_intensity_is_identity() {
        assert_eq!(blend_with_white("#ff6b6b", 1.0), "#ff6b6b");
        assert_eq!(blend_with_white("#4ecdc4", 1.0), "#4ecdc4");
    }

    #[test]
    fn test_zero_intensity_is_white() {
        assert_eq!(blend_with_white("#ff6b6b", 0.0), "#ffffff");
        assert_eq!(blend_with_white("#000000", 0.0), "#ffffff");
    }

    #[test]
    fn test_half_blend() {
        // 0x00 blended halfway toward white is 0x80 (127.5 rounds up)
        assert_eq!(blend_with_white("#000000", 0.5), "#808080");
    }

    #[test]
    fn test_uppercase_input() {
        assert_eq!(blend_with_white("#FF6B6B", 1.0), "#ff6b6b");
    }

    #[test]
    fn test_malformed_color_passes_through() {
        assert_eq!(blend_with_white("red", 0.5), "red");
        assert_eq!(blend_with_white("#ff6b", 0.5), "#ff6b");
        assert_eq!(blend_with_white("", 0.5), "");
        // 6 bytes but not 6 ASCII hex digits; must not panic mid-char
        assert_eq!(blend_with_white("#aébcd", 0.5), "#aébcd");
        assert_eq!(blend_with_white("#ggg000", 0.5), "#ggg000");
    }

    #[test]
    fn test_out_of_range_intensity_clamps() {
        assert_eq!(blend_with_white("#ff6b6b", 1.7), "#ff6b6b");
        assert_eq!(blend_with_white("#ff6b6b", -0.5), "#ffffff");
    }
}
