//! Integer points and half-open rectangles.
//!
//! Raster bounds are not required to start at `(0, 0)`: a sub-view of a
//! larger raster keeps the coordinates of its parent, and a filter may move
//! its output anywhere. All geometry therefore works on signed coordinates.
//!
//! ```text
//! min ────────► X
//!  │   ┌──────────┐
//!  │   │  bounds  │
//!  │   └──────────┘ max (exclusive)
//!  ▼
//!  Y
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// A point in raster space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Point {
    /// The origin.
    pub const ZERO: Point = Point { x: 0, y: 0 };

    /// Create a point.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    #[inline]
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    #[inline]
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// A half-open rectangle `[min, max)`.
///
/// # Invariants
///
/// `max.x >= min.x` and `max.y >= min.y`. A rectangle with zero width or
/// height is legal and contains no pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner (inclusive).
    pub min: Point,
    /// Bottom-right corner (exclusive).
    pub max: Point,
}

impl Rect {
    /// The empty rectangle at the origin.
    pub const ZERO: Rect = Rect {
        min: Point::ZERO,
        max: Point::ZERO,
    };

    /// Create a rectangle from two corners, swapping coordinates if needed.
    ///
    /// ```rust
    /// use filterchain::core::geometry::{Point, Rect};
    ///
    /// let r = Rect::new(10, 20, 0, 5);
    /// assert_eq!(r.min, Point::new(0, 5));
    /// assert_eq!(r.max, Point::new(10, 20));
    /// ```
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        let (min_x, max_x) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        let (min_y, max_y) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
        Self {
            min: Point::new(min_x, min_y),
            max: Point::new(max_x, max_y),
        }
    }

    /// A `width` x `height` rectangle anchored at the origin.
    pub fn from_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, width as i32, height as i32)
    }

    /// Width in pixels.
    #[inline]
    pub const fn width(&self) -> i32 {
        self.max.x - self.min.x
    }

    /// Height in pixels.
    #[inline]
    pub const fn height(&self) -> i32 {
        self.max.y - self.min.y
    }

    /// Size as `(width, height)`.
    #[inline]
    pub const fn size(&self) -> (i32, i32) {
        (self.width(), self.height())
    }

    /// Number of pixels covered.
    #[inline]
    pub const fn area(&self) -> u64 {
        if self.is_empty() {
            0
        } else {
            self.width() as u64 * self.height() as u64
        }
    }

    /// Returns `true` if the rectangle covers no pixels.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.min.x >= self.max.x || self.min.y >= self.max.y
    }

    /// Returns `true` if `p` lies inside. Empty rectangles contain nothing.
    #[inline]
    pub const fn contains(&self, p: Point) -> bool {
        self.min.x <= p.x && p.x < self.max.x && self.min.y <= p.y && p.y < self.max.y
    }

    /// Shift by `offset`.
    #[inline]
    pub fn translate(&self, offset: Point) -> Rect {
        Rect {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Same size, moved so that `min == origin`.
    #[inline]
    pub fn moved_to(&self, origin: Point) -> Rect {
        self.translate(origin - self.min)
    }

    /// The largest rectangle contained in both. Disjoint inputs give [`Rect::ZERO`].
    pub fn intersect(&self, other: &Rect) -> Rect {
        let r = Rect {
            min: Point::new(self.min.x.max(other.min.x), self.min.y.max(other.min.y)),
            max: Point::new(self.max.x.min(other.max.x), self.max.y.min(other.max.y)),
        };
        if r.is_empty() {
            Rect::ZERO
        } else {
            r
        }
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_normalizes_corners() {
        let r = Rect::new(5, 9, -3, 2);
        assert_eq!(r.min, Point::new(-3, 2));
        assert_eq!(r.max, Point::new(5, 9));
        assert_eq!(r.size(), (8, 7));
        assert_eq!(r.area(), 56);
    }

    #[test]
    fn test_degenerate_rect_is_empty() {
        let r = Rect::new(4, 4, 4, 10);
        assert!(r.is_empty());
        assert_eq!(r.area(), 0);
        assert!(!r.contains(Point::new(4, 4)));
    }

    #[test]
    fn test_contains_is_half_open() {
        let r = Rect::from_size(10, 10);
        assert!(r.contains(Point::new(0, 0)));
        assert!(r.contains(Point::new(9, 9)));
        assert!(!r.contains(Point::new(10, 5)));
        assert!(!r.contains(Point::new(5, 10)));
        assert!(!r.contains(Point::new(-1, 0)));
    }

    #[test]
    fn test_intersect() {
        let a = Rect::new(0, 0, 100, 100);
        let b = Rect::new(50, -20, 150, 40);
        assert_eq!(a.intersect(&b), Rect::new(50, 0, 100, 40));

        let c = Rect::new(200, 200, 300, 300);
        assert_eq!(a.intersect(&c), Rect::ZERO);

        let touching = Rect::new(100, 0, 120, 10);
        assert!(a.intersect(&touching).is_empty());
    }

    #[test]
    fn test_moved_to_keeps_size() {
        let r = Rect::new(-5, 7, 15, 27);
        let moved = r.moved_to(Point::new(10, 10));
        assert_eq!(moved, Rect::new(10, 10, 30, 30));
        assert_eq!(moved.size(), r.size());
    }

    #[test]
    fn test_display() {
        assert_eq!(Rect::new(1, 2, 3, 4).to_string(), "(1,2)-(3,4)");
    }
}
