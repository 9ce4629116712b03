//! Page-space geometry
//!
//! All coordinates are page units (1/72 inch) with the origin at the top-left
//! corner of the page and y growing downwards, which is how text extraction
//! reports word boxes and how the canvas lays them out.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Vector from `other` to `self`
    pub fn delta_from(self, other: Point) -> (f64, f64) {
        (self.x - other.x, self.y - other.y)
    }
}

/// Axis-aligned rectangle stored as its two corners.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Rect {
    pub const fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Build from an origin and a size, the way a scene item is positioned.
    pub fn from_origin_size(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Rectangle spanned by two arbitrary corners, normalized.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self::new(a.x, a.y, b.x, b.y).normalized()
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    pub fn is_normalized(&self) -> bool {
        self.x0 <= self.x1 && self.y0 <= self.y1
    }

    /// Swap edges so that `x0 <= x1` and `y0 <= y1`.
    pub fn normalized(self) -> Self {
        Self {
            x0: self.x0.min(self.x1),
            y0: self.y0.min(self.y1),
            x1: self.x0.max(self.x1),
            y1: self.y0.max(self.y1),
        }
    }

    pub fn translated(self, dx: f64, dy: f64) -> Self {
        Self {
            x0: self.x0 + dx,
            y0: self.y0 + dy,
            x1: self.x1 + dx,
            y1: self.y1 + dy,
        }
    }

    /// Inclusive containment test
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x0 && p.x <= self.x1 && p.y >= self.y0 && p.y <= self.y1
    }

    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Point at a fractional offset inside the rectangle, `(0, 0)` being the
    /// top-left corner and `(1, 1)` the bottom-right one.
    pub fn point_at(&self, fx: f64, fy: f64) -> Point {
        Point {
            x: self.x0 + fx * self.width(),
            y: self.y0 + fy * self.height(),
        }
    }

    /// Square of side `size` centred on `center`.
    pub fn centered_square(center: Point, size: f64) -> Rect {
        let half = size / 2.0;
        Rect::new(center.x - half, center.y - half, center.x + half, center.y + half)
    }

    pub fn approx_eq(&self, other: &Rect, epsilon: f64) -> bool {
        (self.x0 - other.x0).abs() <= epsilon
            && (self.y0 - other.y0).abs() <= epsilon
            && (self.x1 - other.x1).abs() <= epsilon
            && (self.y1 - other.y1).abs() <= epsilon
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_swaps_inverted_edges() {
        let r = Rect::new(10.0, 20.0, 0.0, 5.0).normalized();
        assert_eq!(r, Rect::new(0.0, 5.0, 10.0, 20.0));
        assert!(r.is_normalized());
    }

    #[test]
    fn test_from_origin_size() {
        let r = Rect::from_origin_size(3.0, 4.0, 10.0, 2.0);
        assert_eq!(r, Rect::new(3.0, 4.0, 13.0, 6.0));
        assert_eq!(r.width(), 10.0);
        assert_eq!(r.height(), 2.0);
    }

    #[test]
    fn test_point_at_fractions() {
        let r = Rect::new(0.0, 0.0, 10.0, 20.0);
        assert_eq!(r.point_at(0.5, 0.0), Point::new(5.0, 0.0));
        assert_eq!(r.point_at(1.0, 0.5), Point::new(10.0, 10.0));
    }

    #[test]
    fn test_contains_is_inclusive() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(Point::new(10.0, 0.0)));
        assert!(!r.contains(Point::new(10.1, 5.0)));
    }

    #[test]
    fn test_union() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(12.0, -1.0, 20.0, 9.0);
        assert_eq!(a.union(&b), Rect::new(0.0, -1.0, 20.0, 10.0));
    }
}
