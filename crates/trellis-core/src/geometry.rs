//! Integer geometry used by layout and hit-testing.
//!
//! Widget rectangles are measured in whole pixels. Positions are relative to
//! the parent's rectangle origin, so the padded interior of a node starts at
//! `(padding.left, padding.top)` in its own coordinate space.

use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Layout axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Axis {
    /// Left to right.
    #[default]
    Horizontal,
    /// Top to bottom.
    Vertical,
}

impl Axis {
    /// The perpendicular axis.
    #[inline]
    pub fn other(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }
}

/// A 2D integer vector, used both for points and sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Int2 {
    pub x: i32,
    pub y: i32,
}

impl Int2 {
    /// The zero vector.
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Create a new vector.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Component along `axis`.
    #[inline]
    pub fn along(self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    /// Replace the component along `axis`.
    #[inline]
    pub fn set_along(&mut self, axis: Axis, value: i32) {
        match axis {
            Axis::Horizontal => self.x = value,
            Axis::Vertical => self.y = value,
        }
    }

    /// Component-wise maximum.
    #[inline]
    pub fn max(self, other: Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y))
    }
}

impl Add for Int2 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Int2 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Int2 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Int2 {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Neg for Int2 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

/// Four-sided padding, in the order left, top, right, bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Padding {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Padding {
    /// No padding.
    pub const ZERO: Self = Self::new(0, 0, 0, 0);

    /// Create padding from explicit sides.
    #[inline]
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// The same padding on every side.
    #[inline]
    pub const fn uniform(value: i32) -> Self {
        Self::new(value, value, value, value)
    }

    /// Offset of the padded interior from the rectangle origin.
    #[inline]
    pub fn top_left(&self) -> Int2 {
        Int2::new(self.left, self.top)
    }

    /// Total padding along each axis.
    #[inline]
    pub fn total(&self) -> Int2 {
        Int2::new(self.left + self.right, self.top + self.bottom)
    }
}

/// An integer rectangle defined by position and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub pos: Int2,
    pub size: Int2,
}

impl Rect {
    /// Empty rectangle at origin.
    pub const ZERO: Self = Self {
        pos: Int2::ZERO,
        size: Int2::ZERO,
    };

    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            pos: Int2::new(x, y),
            size: Int2::new(width, height),
        }
    }

    /// Create a rectangle from position and size vectors.
    #[inline]
    pub const fn from_pos_size(pos: Int2, size: Int2) -> Self {
        Self { pos, size }
    }

    /// Left edge x coordinate.
    #[inline]
    pub fn left(&self) -> i32 {
        self.pos.x
    }

    /// Top edge y coordinate.
    #[inline]
    pub fn top(&self) -> i32 {
        self.pos.y
    }

    /// Right edge x coordinate (exclusive).
    #[inline]
    pub fn right(&self) -> i32 {
        self.pos.x + self.size.x
    }

    /// Bottom edge y coordinate (exclusive).
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.pos.y + self.size.y
    }

    /// Width of the rectangle.
    #[inline]
    pub fn width(&self) -> i32 {
        self.size.x
    }

    /// Height of the rectangle.
    #[inline]
    pub fn height(&self) -> i32 {
        self.size.y
    }

    /// Whether the rectangle covers no area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size.x <= 0 || self.size.y <= 0
    }

    /// Whether `point` lies inside the rectangle. Right and bottom edges are exclusive.
    #[inline]
    pub fn contains(&self, point: Int2) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.top()
            && point.y < self.bottom()
    }

    /// The smallest rectangle containing both rectangles.
    pub fn union(&self, other: &Rect) -> Rect {
        let left = self.left().min(other.left());
        let top = self.top().min(other.top());
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(left, top, right - left, bottom - top)
    }

    /// The rectangle moved by `delta`.
    #[inline]
    pub fn translated(&self, delta: Int2) -> Rect {
        Rect::from_pos_size(self.pos + delta, self.size)
    }

    /// The rectangle shrunk by `padding` on each side.
    #[inline]
    pub fn shrunk(&self, padding: &Padding) -> Rect {
        Rect::from_pos_size(self.pos + padding.top_left(), self.size - padding.total())
    }

    /// The rectangle grown by `padding` on each side.
    #[inline]
    pub fn grown(&self, padding: &Padding) -> Rect {
        Rect::from_pos_size(self.pos - padding.top_left(), self.size + padding.total())
    }

    /// Center point, rounded toward the origin.
    #[inline]
    pub fn center(&self) -> Int2 {
        Int2::new(self.pos.x + self.size.x / 2, self.pos.y + self.size.y / 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_half_open() {
        let r = Rect::new(10, 10, 20, 20);
        assert!(r.contains(Int2::new(10, 10)));
        assert!(r.contains(Int2::new(29, 29)));
        assert!(!r.contains(Int2::new(30, 10)));
        assert!(!r.contains(Int2::new(10, 30)));
    }

    #[test]
    fn test_union() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 20, 10, 5);
        assert_eq!(a.union(&b), Rect::new(0, 0, 15, 25));
    }

    #[test]
    fn test_padding_shrink_and_grow() {
        let pad = Padding::new(1, 2, 3, 4);
        let r = Rect::new(0, 0, 100, 50);
        let inner = r.shrunk(&pad);
        assert_eq!(inner, Rect::new(1, 2, 96, 44));
        assert_eq!(inner.grown(&pad), r);
    }

    #[test]
    fn test_axis_components() {
        let mut v = Int2::new(3, 4);
        assert_eq!(v.along(Axis::Horizontal), 3);
        assert_eq!(v.along(Axis::Vertical.other()), 3);
        v.set_along(Axis::Vertical, 9);
        assert_eq!(v, Int2::new(3, 9));
    }
}
