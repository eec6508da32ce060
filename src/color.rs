//! Colors and the Custom Color Palette
//!
//! Colors are opaque 8-bit sRGB triples, the same model a GDI `COLORREF`
//! uses. The back-buffer stores sRGB bytes and the presenter samples it
//! through an sRGB texture, so no linear conversion happens on the CPU side.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An opaque sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Convert to a `tiny_skia` paint color
    #[inline]
    pub fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, 255)
    }

    /// Read back a pixel from the back-buffer. Every pixel we write is opaque,
    /// so the premultiplied channels equal the straight ones.
    #[inline]
    pub fn from_pixel(pixel: tiny_skia::PremultipliedColorU8) -> Self {
        Self::rgb(pixel.red(), pixel.green(), pixel.blue())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Error returned when a `#rrggbb` string cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color {0:?}, expected #rrggbb")]
pub struct ParseColorError(String);

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().strip_prefix('#').unwrap_or(s.trim());
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(ParseColorError(s.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| ParseColorError(s.to_string()))
        };
        Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl TryFrom<String> for Color {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// Number of slots in the custom color palette
pub const PALETTE_SIZE: usize = 16;

/// The custom colors offered when picking a pen, brush or text color.
///
/// Owned by the input-handling loop and handed to pickers explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: [Color; PALETTE_SIZE],
}

impl Palette {
    pub fn new(colors: [Color; PALETTE_SIZE]) -> Self {
        Self { colors }
    }

    pub fn colors(&self) -> &[Color; PALETTE_SIZE] {
        &self.colors
    }

    /// Color that follows `current` in the palette. A color that is not in
    /// the palette starts the cycle from the first slot.
    pub fn next_after(&self, current: Color) -> Color {
        match self.colors.iter().position(|&c| c == current) {
            Some(index) => self.colors[(index + 1) % PALETTE_SIZE],
            None => self.colors[0],
        }
    }
}

impl Default for Palette {
    /// The 16 classic VGA colors
    fn default() -> Self {
        Self::new([
            Color::rgb(0, 0, 0),
            Color::rgb(128, 0, 0),
            Color::rgb(0, 128, 0),
            Color::rgb(128, 128, 0),
            Color::rgb(0, 0, 128),
            Color::rgb(128, 0, 128),
            Color::rgb(0, 128, 128),
            Color::rgb(192, 192, 192),
            Color::rgb(128, 128, 128),
            Color::rgb(255, 0, 0),
            Color::rgb(0, 255, 0),
            Color::rgb(255, 255, 0),
            Color::rgb(0, 0, 255),
            Color::rgb(255, 0, 255),
            Color::rgb(0, 255, 255),
            Color::rgb(255, 255, 255),
        ])
    }
}
