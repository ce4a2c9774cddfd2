//! Colours

use std::fmt;

/// An opaque sRGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    /// Create a colour from its components
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#rrggbb` (or `rrggbb`) hex string
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Lowercase `#rrggbb` form
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Series colours, assigned by position in the selection
pub const PALETTE: [Color; 5] = [
    Color::rgb(0x1f, 0x77, 0xb4),
    Color::rgb(0x2c, 0xa0, 0x2c),
    Color::rgb(0x94, 0x67, 0xbd),
    Color::rgb(0xff, 0x7f, 0x0e),
    Color::rgb(0x17, 0xbe, 0xcf),
];

/// Palette colour for the `index`-th series, cycling
pub fn palette_color(index: usize) -> Color {
    PALETTE[index % PALETTE.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip() {
        let c = Color::from_hex("#9467BD").unwrap();
        assert_eq!(c, Color::rgb(0x94, 0x67, 0xbd));
        assert_eq!(c.to_hex(), "#9467bd");
        assert_eq!(Color::from_hex("17becf"), Some(PALETTE[4]));
    }

    #[test]
    fn test_invalid_hex() {
        assert_eq!(Color::from_hex("#12345"), None);
        assert_eq!(Color::from_hex("#zzzzzz"), None);
        assert_eq!(Color::from_hex("#ééé"), None);
    }

    #[test]
    fn test_palette_cycles() {
        assert_eq!(palette_color(0).to_hex(), "#1f77b4");
        assert_eq!(palette_color(3).to_hex(), "#ff7f0e");
        assert_eq!(palette_color(5), palette_color(0));
        assert_eq!(palette_color(11), palette_color(1));
    }
}
