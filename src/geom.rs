//! Image-local geometry: points, rectangles, and proximity tests.
//!
//! All coordinates are in canvas pixels, which equal image pixels because the
//! overlay canvas is sized to the displayed photo.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use serde::{Deserialize, Serialize};

/// A point in canvas space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// Rectangle spanned by two opposite corners, in any order.
    ///
    /// `left`/`top` are the per-axis minimums and the size is the absolute
    /// delta, so the result never has a negative extent.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            left: a.x.min(b.x),
            top: a.y.min(b.y),
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    #[must_use]
    pub fn top_left(&self) -> Point {
        Point::new(self.left, self.top)
    }

    #[must_use]
    pub fn top_right(&self) -> Point {
        Point::new(self.right(), self.top)
    }

    #[must_use]
    pub fn bottom_left(&self) -> Point {
        Point::new(self.left, self.bottom())
    }

    #[must_use]
    pub fn bottom_right(&self) -> Point {
        Point::new(self.right(), self.bottom())
    }

    /// Horizontal center of the top edge, where the tag label sits.
    #[must_use]
    pub fn top_center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top)
    }

    /// Whether the rectangle covers no area.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Same rectangle shifted by `(dx, dy)`, then clamped per axis so it stays
    /// inside a `bound_w` x `bound_h` canvas.
    ///
    /// A rectangle larger than the canvas on an axis is pinned to 0 on that axis.
    #[must_use]
    pub fn translated_within(&self, dx: f64, dy: f64, bound_w: f64, bound_h: f64) -> Self {
        let max_left = (bound_w - self.width).max(0.0);
        let max_top = (bound_h - self.height).max(0.0);
        Self {
            left: (self.left + dx).min(max_left).max(0.0),
            top: (self.top + dy).min(max_top).max(0.0),
            ..*self
        }
    }
}

/// Strict containment test: points on the boundary are outside.
#[must_use]
pub fn point_in_rect(x: f64, y: f64, rect: &Rect) -> bool {
    rect.left < x && x < rect.right() && rect.top < y && y < rect.bottom()
}

/// Whether `(x, y)` lies within `radius` of `handle` on both axes.
#[must_use]
pub fn near_handle(x: f64, y: f64, handle: Point, radius: f64) -> bool {
    (x - handle.x).abs() < radius && (y - handle.y).abs() < radius
}
