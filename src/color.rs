//! Hex color helpers for gradient stops

/// An 8-bit RGB triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (leading `#` optional).
    pub fn parse_hex(hex: &str) -> Option<Self> {
        let clean = hex.trim().trim_start_matches('#');
        if clean.len() != 6 {
            return None;
        }
        let value = u32::from_str_radix(clean, 16).ok()?;
        Some(Self::new(
            ((value >> 16) & 0xff) as u8,
            ((value >> 8) & 0xff) as u8,
            (value & 0xff) as u8,
        ))
    }

    /// Parse, treating anything malformed as black
    pub fn from_hex(hex: &str) -> Self {
        Self::parse_hex(hex).unwrap_or_default()
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Add `amount` to every channel, rounding and clamping to [0, 255]
    pub fn lightened(self, amount: f32) -> Self {
        let shift = |c: u8| (c as f32 + amount).round().clamp(0.0, 255.0) as u8;
        Self::new(shift(self.r), shift(self.g), shift(self.b))
    }
}

/// Lighten (or darken, for negative amounts) a `#rrggbb` color
pub fn lighten(hex: &str, amount: f32) -> String {
    Rgb::from_hex(hex).lightened(amount).to_hex()
}

/// Append an alpha byte, producing `#rrggbbaa`
pub fn with_alpha(hex: &str, alpha: u8) -> String {
    format!("{}{:02x}", Rgb::from_hex(hex).to_hex(), alpha)
}
