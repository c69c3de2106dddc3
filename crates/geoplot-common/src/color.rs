//! RGBA colors and color-name parsing.
//!
//! Accepted spellings follow the usual plotting conventions:
//! - Hex strings: `#rgb`, `#rrggbb`, `#rrggbbaa`
//! - Single-letter base colors: `r`, `g`, `b`, `c`, `m`, `y`, `k`, `w`
//! - Tableau colors: `tab:blue`, `tab:orange`, ...
//! - Common CSS names: `red`, `steelblue`, `gray`/`grey`, ...

use crate::error::PlotError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Color value in RGBA format (straight, not premultiplied alpha).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Same color with its alpha scaled by `alpha` (0.0..=1.0).
    pub fn with_alpha(self, alpha: f64) -> Self {
        let a = (self.a as f64 * alpha.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }

    /// Linear interpolation between two colors, `t` clamped to 0..=1.
    pub fn lerp(self, other: Color, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        let lerp_u8 =
            |a: u8, b: u8| -> u8 { ((a as f64) * (1.0 - t) + (b as f64) * t).round() as u8 };
        Color::new(
            lerp_u8(self.r, other.r),
            lerp_u8(self.g, other.g),
            lerp_u8(self.b, other.b),
            lerp_u8(self.a, other.a),
        )
    }

    /// Parse a hex color string ("#RRGGBB", "#RRGGBBAA" or "#RGB").
    pub fn from_hex(hex: &str) -> Option<Color> {
        let hex = hex.strip_prefix('#')?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            3 => {
                let nib = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
                Some(Color::rgb(nib(0)?, nib(1)?, nib(2)?))
            }
            6 => Some(Color::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Color::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }

    /// Look up a color by name.
    pub fn from_name(name: &str) -> Option<Color> {
        let (r, g, b) = match name.trim().to_ascii_lowercase().as_str() {
            "transparent" | "none" => return Some(Color::TRANSPARENT),
            // Single-letter base colors
            "b" => (0, 0, 255),
            "g" => (0, 128, 0),
            "r" => (255, 0, 0),
            "c" => (0, 191, 191),
            "m" => (191, 0, 191),
            "y" => (191, 191, 0),
            "k" => (0, 0, 0),
            "w" => (255, 255, 255),
            // Tableau palette
            "tab:blue" => (31, 119, 180),
            "tab:orange" => (255, 127, 14),
            "tab:green" => (44, 160, 44),
            "tab:red" => (214, 39, 40),
            "tab:purple" => (148, 103, 189),
            "tab:brown" => (140, 86, 75),
            "tab:pink" => (227, 119, 194),
            "tab:gray" | "tab:grey" => (127, 127, 127),
            "tab:olive" => (188, 189, 34),
            "tab:cyan" => (23, 190, 207),
            // CSS names
            "black" => (0, 0, 0),
            "white" => (255, 255, 255),
            "red" => (255, 0, 0),
            "green" => (0, 128, 0),
            "lime" => (0, 255, 0),
            "blue" => (0, 0, 255),
            "navy" => (0, 0, 128),
            "yellow" => (255, 255, 0),
            "gold" => (255, 215, 0),
            "cyan" | "aqua" => (0, 255, 255),
            "magenta" | "fuchsia" => (255, 0, 255),
            "orange" => (255, 165, 0),
            "darkorange" => (255, 140, 0),
            "purple" => (128, 0, 128),
            "violet" => (238, 130, 238),
            "pink" => (255, 192, 203),
            "brown" => (165, 42, 42),
            "maroon" => (128, 0, 0),
            "olive" => (128, 128, 0),
            "teal" => (0, 128, 128),
            "coral" => (255, 127, 80),
            "salmon" => (250, 128, 114),
            "tomato" => (255, 99, 71),
            "crimson" => (220, 20, 60),
            "indigo" => (75, 0, 130),
            "steelblue" => (70, 130, 180),
            "skyblue" => (135, 206, 235),
            "lightblue" => (173, 216, 230),
            "darkblue" => (0, 0, 139),
            "darkgreen" => (0, 100, 0),
            "lightgreen" => (144, 238, 144),
            "darkred" => (139, 0, 0),
            "gray" | "grey" => (128, 128, 128),
            "darkgray" | "darkgrey" => (169, 169, 169),
            "lightgray" | "lightgrey" => (211, 211, 211),
            "silver" => (192, 192, 192),
            "whitesmoke" => (245, 245, 245),
            _ => return None,
        };
        Some(Color::rgb(r, g, b))
    }

    /// Render as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl FromStr for Color {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let parsed = if trimmed.starts_with('#') {
            Color::from_hex(trimmed)
        } else {
            Color::from_name(trimmed)
        };
        parsed.ok_or_else(|| PlotError::InvalidColor(s.to_string()))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
