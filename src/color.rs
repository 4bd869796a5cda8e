//! Color values as they appear in option documents.
//!
//! Opaque colors encode as `#rrggbb`, translucent ones as CSS `rgba(...)`.

use std::fmt;

use crate::error::{Error, Result};
use crate::property::PropertyValue;

/// RGBA color with 8-bit components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba {
    /// Red component (0-255).
    pub r: u8,
    /// Green component (0-255).
    pub g: u8,
    /// Blue component (0-255).
    pub b: u8,
    /// Alpha component (0-255, 255 = fully opaque).
    pub a: u8,
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    /// Opaque red.
    pub const RED: Self = Self::new(255, 0, 0, 255);
    /// Opaque green.
    pub const GREEN: Self = Self::new(0, 255, 0, 255);
    /// Opaque blue.
    pub const BLUE: Self = Self::new(0, 0, 255, 255);

    /// Create a new RGBA color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color (alpha = 255).
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Create a color with modified alpha.
    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (leading `#` optional).
    pub fn from_hex(text: &str) -> Result<Self> {
        let hex = text.strip_prefix('#').unwrap_or(text);
        let invalid = || Error::encoding(format!("invalid color '{text}'"));
        let digit = |i: usize| -> Result<u8> {
            hex.get(i..=i)
                .and_then(|s| u8::from_str_radix(s, 16).ok())
                .ok_or_else(invalid)
        };
        let byte = |i: usize| -> Result<u8> {
            hex.get(i..i + 2)
                .and_then(|s| u8::from_str_radix(s, 16).ok())
                .ok_or_else(invalid)
        };

        match hex.len() {
            3 => Ok(Self::rgb(digit(0)? * 17, digit(1)? * 17, digit(2)? * 17)),
            6 => Ok(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Self::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => Err(invalid()),
        }
    }

    /// CSS form used by the rendering engine.
    #[must_use]
    pub fn to_css(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            let alpha = f64::from(self.a) / 255.0;
            write!(f, "rgba({},{},{},{:.3})", self.r, self.g, self.b, alpha)
        }
    }
}

impl From<Rgba> for PropertyValue {
    fn from(color: Rgba) -> Self {
        PropertyValue::Str(color.to_css())
    }
}

/// Palette used to pad [`crate::components::DefaultColors`] to eleven entries.
pub const DEFAULT_PALETTE: [Rgba; 12] = [
    Rgba::rgb(0x00, 0x00, 0xff),
    Rgba::rgb(0xc2, 0x35, 0x31),
    Rgba::rgb(0x2f, 0x45, 0x54),
    Rgba::rgb(0x61, 0xa0, 0xa8),
    Rgba::rgb(0xd4, 0x82, 0x65),
    Rgba::rgb(0x91, 0xc7, 0xae),
    Rgba::rgb(0x74, 0x9f, 0x83),
    Rgba::rgb(0xca, 0x86, 0x22),
    Rgba::rgb(0xbd, 0xa2, 0x9a),
    Rgba::rgb(0x6e, 0x70, 0x74),
    Rgba::rgb(0x54, 0x65, 0x70),
    Rgba::rgb(0xc4, 0xcc, 0xd3),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_constants() {
        assert_eq!(Rgba::BLACK, Rgba::rgb(0, 0, 0));
        assert_eq!(Rgba::WHITE, Rgba::rgb(255, 255, 255));
        assert_eq!(Rgba::RED.r, 255);
        assert_eq!(Rgba::GREEN.g, 255);
        assert_eq!(Rgba::BLUE.b, 255);
    }

    #[test]
    fn test_opaque_css_is_hex() {
        assert_eq!(Rgba::rgb(0xc2, 0x35, 0x31).to_css(), "#c23531");
        assert_eq!(Rgba::WHITE.to_css(), "#ffffff");
    }

    #[test]
    fn test_translucent_css_is_rgba() {
        let semi = Rgba::RED.with_alpha(0);
        assert_eq!(semi.to_css(), "rgba(255,0,0,0.000)");
        assert_eq!(Rgba::BLUE.with_alpha(255), Rgba::BLUE);
    }

    #[test]
    fn test_from_hex_forms() {
        assert_eq!(Rgba::from_hex("#c23531").unwrap(), Rgba::rgb(0xc2, 0x35, 0x31));
        assert_eq!(Rgba::from_hex("fff").unwrap(), Rgba::WHITE);
        assert_eq!(Rgba::from_hex("#00000080").unwrap(), Rgba::new(0, 0, 0, 0x80));
    }

    #[test]
    fn test_from_hex_rejects_garbage() {
        assert!(Rgba::from_hex("#12").is_err());
        assert!(Rgba::from_hex("#zzzzzz").is_err());
        assert!(Rgba::from_hex("").is_err());
    }

    #[test]
    fn test_into_property_value() {
        let value: PropertyValue = Rgba::BLACK.into();
        assert_eq!(value, PropertyValue::Str("#000000".into()));
    }

    #[test]
    fn test_rgba_default_is_transparent() {
        assert_eq!(Rgba::default(), Rgba::TRANSPARENT);
    }
}
