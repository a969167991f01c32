//! Screen geometry primitives for Dock hit-testing.
//!
//! Coordinates use the global top-left-origin space shared by the
//! Accessibility API and `CGEvent` locations, so icon frames read from the
//! Dock can be compared directly against mouse event locations.

use serde::Serialize;

/// A point in global screen coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self { Self { x, y } }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.0}, {:.0})", self.x, self.y)
    }
}

/// An axis-aligned rectangle in global screen coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Check if this rectangle has a usable (positive) area.
    #[must_use]
    pub fn is_valid(&self) -> bool { self.width > 0.0 && self.height > 0.0 }

    /// Check if this rectangle contains a point.
    ///
    /// The left and top edges are inside, the right and bottom edges are not,
    /// so two adjacent icons never both claim a click on their shared edge.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.0}, {:.0}) {:.0}x{:.0}", self.x, self.y, self.width, self.height)
    }
}
