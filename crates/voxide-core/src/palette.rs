//! Material palette: fill colors, edge colors, and glow flags.

/// Number of material slots in a palette.
pub const MATERIAL_COUNT: usize = 8;

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Create a color from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#rrggbb` hex string (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
        let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
        let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
        Some(Self { r, g, b })
    }

    /// Format as a `#rrggbb` hex string.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// The three parallel material arrays consumed by the color picker and the
/// palette texture: fill color, edge (outline) color, and an emissive glow
/// flag per material slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub colors: [Color; MATERIAL_COUNT],
    pub edge_colors: [Color; MATERIAL_COUNT],
    pub glows: [bool; MATERIAL_COUNT],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: [
                Color::rgb(0xe0, 0xe0, 0xe0),
                Color::rgb(0xf4, 0x43, 0x36),
                Color::rgb(0xff, 0x98, 0x00),
                Color::rgb(0xff, 0xeb, 0x3b),
                Color::rgb(0x4c, 0xaf, 0x50),
                Color::rgb(0x21, 0x96, 0xf3),
                Color::rgb(0x9c, 0x27, 0xb0),
                Color::rgb(0x79, 0x55, 0x48),
            ],
            edge_colors: [
                Color::rgb(0x9e, 0x9e, 0x9e),
                Color::rgb(0xb7, 0x1c, 0x1c),
                Color::rgb(0xe6, 0x51, 0x00),
                Color::rgb(0xf5, 0x7f, 0x17),
                Color::rgb(0x1b, 0x5e, 0x20),
                Color::rgb(0x0d, 0x47, 0xa1),
                Color::rgb(0x4a, 0x14, 0x8c),
                Color::rgb(0x3e, 0x27, 0x23),
            ],
            glows: [false; MATERIAL_COUNT],
        }
    }
}

impl Palette {
    /// Create the default palette.
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_roundtrip() {
        let color = Color::rgb(0x12, 0xab, 0xef);
        assert_eq!(Color::from_hex(&color.to_hex()), Some(color));
    }

    #[test]
    fn test_from_hex_accepts_bare_digits() {
        assert_eq!(Color::from_hex("ff0080"), Some(Color::rgb(255, 0, 128)));
    }

    #[test]
    fn test_from_hex_rejects_malformed() {
        assert_eq!(Color::from_hex(""), None);
        assert_eq!(Color::from_hex("#fff"), None);
        assert_eq!(Color::from_hex("#gg0000"), None);
        assert_eq!(Color::from_hex("#ff00001"), None);
    }

    #[test]
    fn test_default_palette_has_no_glow() {
        let palette = Palette::default();
        assert!(palette.glows.iter().all(|&g| !g));
    }
}
