//! 24-bit RGB colors in `#rrggbb` notation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypesError;

/// An sRGB color with 8 bits per channel.
///
/// Parsed from exactly six hex digits with an optional leading `#`; case is
/// ignored. Always displayed (and serialized) as lowercase `#rrggbb`.
///
/// # Example
///
/// ```
/// use relief_types::HexColor;
///
/// let c: HexColor = "FF8000".parse().unwrap();
/// assert_eq!(c.rgb(), [255, 128, 0]);
/// assert_eq!(c.to_string(), "#ff8000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexColor {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl HexColor {
    /// Pure white.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Create a color from channel values.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels as an array.
    #[must_use]
    pub const fn rgb(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[u8; 3]> for HexColor {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

impl FromStr for HexColor {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(TypesError::InvalidHexColor(s.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| TypesError::InvalidHexColor(s.to_string()))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_with_and_without_hash() {
        let a: HexColor = "#1a2B3c".parse().unwrap();
        let b: HexColor = "1A2b3C".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.rgb(), [0x1a, 0x2b, 0x3c]);
    }

    #[test]
    fn rejects_malformed() {
        for bad in ["", "#", "#12345", "1234567", "#gg0000", "##123456", "#12 456"] {
            assert!(bad.parse::<HexColor>().is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn non_ascii_input_is_rejected_not_panicking() {
        assert!("#ééé".parse::<HexColor>().is_err());
    }

    #[test]
    fn display_is_lowercase_with_hash() {
        assert_eq!(HexColor::new(255, 0, 171).to_string(), "#ff00ab");
        assert_eq!(HexColor::WHITE.to_string(), "#ffffff");
    }

    #[test]
    fn serde_uses_string_form() {
        let json = serde_json::to_string(&HexColor::new(1, 2, 3)).unwrap();
        assert_eq!(json, "\"#010203\"");
        let back: HexColor = serde_json::from_str("\"ABCDEF\"").unwrap();
        assert_eq!(back, HexColor::new(0xab, 0xcd, 0xef));
        assert!(serde_json::from_str::<HexColor>("\"nope\"").is_err());
    }
}
