//! Points and rectangles for the drawing surface.

use serde::{Deserialize, Serialize};

/// A single pointer sample: position plus stylus pressure.
///
/// Immutable once recorded; an ordered sequence of points forms a stroke's
/// path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate in surface pixels.
    pub x: f64,
    /// Y coordinate in surface pixels.
    pub y: f64,
    /// Stylus pressure in `[0, 1]`.
    pub pressure: f64,
}

impl Point {
    /// Create a new point. Pressure is clamped to `[0, 1]`.
    #[must_use]
    pub fn new(x: f64, y: f64, pressure: f64) -> Self {
        Self {
            x,
            y,
            pressure: pressure.clamp(0.0, 1.0),
        }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// An axis-aligned rectangle in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width (non-negative).
    pub width: f64,
    /// Height (non-negative).
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Center of the rectangle.
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Half-extents along each axis.
    #[must_use]
    pub fn half_extents(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }

    /// Whether the rectangle contains the given position.
    ///
    /// Edges are half-open: the left/top edge is inside, the right/bottom
    /// edge belongs to the neighboring rectangle.
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}
