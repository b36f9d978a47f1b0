// src/color.rs

//! Defines the color types (`NamedColor`, `Color`) used by drawing operations
//! and surfaces.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The handful of named colors the script language refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NamedColor {
    Black,
    White,
    Green,
    Yellow,
}

impl NamedColor {
    /// Returns the RGBA value of this named color.
    pub const fn to_color(self) -> Color {
        match self {
            NamedColor::Black => Color::opaque(0, 0, 0),
            NamedColor::White => Color::opaque(255, 255, 255),
            NamedColor::Green => Color::opaque(0, 255, 0),
            NamedColor::Yellow => Color::opaque(255, 255, 0),
        }
    }
}

/// RGBA color in 32-bit format (8 bits per channel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = NamedColor::Black.to_color();
    pub const WHITE: Color = NamedColor::White.to_color();
    pub const GREEN: Color = NamedColor::Green.to_color();
    pub const YELLOW: Color = NamedColor::Yellow.to_color();

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Convert to RGBA byte array
    pub fn to_bytes(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<NamedColor> for Color {
    fn from(named: NamedColor) -> Self {
        named.to_color()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Color::BLACK => write!(f, "black"),
            Color::WHITE => write!(f, "white"),
            Color::GREEN => write!(f, "green"),
            Color::YELLOW => write!(f, "yellow"),
            Color { r, g, b, a: 255 } => write!(f, "#{:02x}{:02x}{:02x}", r, g, b),
            Color { r, g, b, a } => write!(f, "#{:02x}{:02x}{:02x}{:02x}", r, g, b, a),
        }
    }
}
