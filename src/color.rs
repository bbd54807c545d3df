//! Colour values for palettes
//!
//! A palette colour is a 6-digit RGB value written `#RRGGBB`. Input is
//! case-insensitive; the canonical output form is uppercase.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use image::Rgba;
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for colour validation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// Input string was empty
    #[error("empty color string")]
    Empty,
    /// Input doesn't match `#RRGGBB`
    #[error("'{0}' is not a #RRGGBB color")]
    InvalidFormat(String),
}

/// Canonical colour pattern, applied literally: `#fff` shorthand is rejected.
fn hex_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)^#[0-9A-F]{6}$").expect("static pattern compiles"))
}

/// Check a string against the canonical `#RRGGBB` pattern (case-insensitive).
pub fn is_hex_color(s: &str) -> bool {
    hex_pattern().is_match(s)
}

/// An opaque RGB palette colour.
///
/// Serializes as its canonical `#RRGGBB` string and refuses anything else on
/// the way in.
///
/// # Examples
///
/// ```
/// use pixed::color::Colour;
///
/// let c: Colour = "#ff8000".parse().unwrap();
/// assert_eq!(c.to_string(), "#FF8000");
/// assert!("#f80".parse::<Colour>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Colour {
    pub const BLACK: Colour = Colour::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Hex digits without the leading `#`, as used by the bulk palette text.
    pub fn hex_digits(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Fully opaque RGBA pixel for this colour.
    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, 255])
    }

    /// Generate a random colour.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self { r: rng.gen(), g: rng.gen(), b: rng.gen() }
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.hex_digits())
    }
}

impl FromStr for Colour {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ColorError::Empty);
        }
        if !is_hex_color(s) {
            return Err(ColorError::InvalidFormat(s.to_string()));
        }
        // Pattern guarantees 7 ASCII bytes
        let channel = |i: usize| {
            u8::from_str_radix(&s[i..i + 2], 16)
                .map_err(|_| ColorError::InvalidFormat(s.to_string()))
        };
        Ok(Self { r: channel(1)?, g: channel(3)?, b: channel(5)? })
    }
}

impl TryFrom<String> for Colour {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Colour> for String {
    fn from(c: Colour) -> Self {
        c.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_uppercase() {
        let c: Colour = "#FF0080".parse().unwrap();
        assert_eq!(c, Colour::rgb(255, 0, 128));
    }

    #[test]
    fn test_parse_lowercase_canonicalizes() {
        let c: Colour = "#abcdef".parse().unwrap();
        assert_eq!(c.to_string(), "#ABCDEF");
    }

    #[test]
    fn test_shorthand_rejected() {
        assert_eq!("#fff".parse::<Colour>(), Err(ColorError::InvalidFormat("#fff".to_string())));
    }

    #[test]
    fn test_missing_hash_rejected() {
        assert!("FFFFFF".parse::<Colour>().is_err());
    }

    #[test]
    fn test_empty_rejected() {
        assert_eq!("".parse::<Colour>(), Err(ColorError::Empty));
    }

    #[test]
    fn test_non_hex_rejected() {
        assert!("#GGGGGG".parse::<Colour>().is_err());
        assert!("#12345".parse::<Colour>().is_err());
        assert!("#1234567".parse::<Colour>().is_err());
    }

    #[test]
    fn test_hex_digits() {
        assert_eq!(Colour::rgb(1, 2, 255).hex_digits(), "0102FF");
    }

    #[test]
    fn test_serde_string_form() {
        let json = serde_json::to_string(&Colour::rgb(16, 32, 48)).unwrap();
        assert_eq!(json, "\"#102030\"");
        let back: Colour = serde_json::from_str("\"#102030\"").unwrap();
        assert_eq!(back, Colour::rgb(16, 32, 48));
        assert!(serde_json::from_str::<Colour>("\"red\"").is_err());
    }

    #[test]
    fn test_random_is_valid() {
        let mut rng = rand::thread_rng();
        for _ in 0..32 {
            let c = Colour::random(&mut rng);
            assert!(is_hex_color(&c.to_string()));
        }
    }
}
