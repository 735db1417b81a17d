//! Page-space geometry in CSS pixels.

use serde::{Deserialize, Serialize};

/// A point in page coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl Point {
    /// Create a new point.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Subtract another point used as a vector.
    pub fn relative_to(self, origin: Point) -> Self {
        Self { x: self.x - origin.x, y: self.y - origin.y }
    }
}

/// Width and height of a rendered box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Box width.
    pub width: f32,
    /// Box height.
    pub height: f32,
}

impl Size {
    /// Create a new size.
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner.
    pub origin: Point,
    /// Dimensions.
    pub size: Size,
}

impl Rect {
    /// Create a rectangle from its top-left corner and size.
    pub const fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// Left edge.
    pub fn left(&self) -> f32 {
        self.origin.x
    }

    /// Top edge.
    pub fn top(&self) -> f32 {
        self.origin.y
    }

    /// Right edge.
    pub fn right(&self) -> f32 {
        self.origin.x + self.size.width
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f32 {
        self.origin.y + self.size.height
    }
}
