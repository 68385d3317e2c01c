//! Brush value records: color, compositing mode, and brush parameters.
//!
//! A brush is a plain value snapshot. The surface copies it at stroke begin
//! so that later edits to the caller's brush never retroactively alter an
//! in-progress stroke.

use serde::{Deserialize, Serialize};

/// An RGBA color with 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Fully transparent.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Create a color from all four channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Parse a `#rrggbb` or `#rrggbbaa` hex color string.
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#')?;
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            6 => Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self::new(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }
}

/// How a stroke's ink combines with ink already on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompositeMode {
    /// Normal painting: new ink layers over existing ink.
    SourceOver,
    /// Eraser: new ink removes existing ink instead of adding color.
    DestinationOut,
}

/// Brush parameters captured by value at stroke begin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brush {
    /// Display name of the brush (e.g. "pen", "eraser").
    pub name: String,
    /// Brush size in surface pixels. A dab at full pressure has diameter
    /// `size`.
    pub size: f64,
    /// Stroke opacity in `[0, 1]`; committed ink shows through when below 1.
    pub opacity: f64,
    /// Ink color.
    pub color: Color,
    /// Compositing mode for the whole stroke.
    pub mode: CompositeMode,
}

impl Brush {
    /// Create an opaque painting brush.
    #[must_use]
    pub fn new(name: impl Into<String>, size: f64, color: Color) -> Self {
        Self {
            name: name.into(),
            size: size.max(0.0),
            opacity: 1.0,
            color,
            mode: CompositeMode::SourceOver,
        }
    }

    /// Create an eraser of the given size.
    #[must_use]
    pub fn eraser(size: f64) -> Self {
        Self {
            name: "eraser".to_string(),
            size: size.max(0.0),
            opacity: 1.0,
            color: Color::BLACK,
            mode: CompositeMode::DestinationOut,
        }
    }

    /// Set the opacity (clamped to `[0, 1]`).
    #[must_use]
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// Set the compositing mode.
    #[must_use]
    pub fn with_mode(mut self, mode: CompositeMode) -> Self {
        self.mode = mode;
        self
    }

    /// Maximum ink radius of this brush: a dab at pressure `p` has radius
    /// `size * p / 2`, so the footprint never exceeds `size / 2`.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.size / 2.0
    }

    /// Whether this brush erases rather than paints.
    #[must_use]
    pub fn is_eraser(&self) -> bool {
        self.mode == CompositeMode::DestinationOut
    }
}
