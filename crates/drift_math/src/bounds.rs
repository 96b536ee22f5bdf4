//! Bounding shapes for spatial queries and broad-phase culling

use crate::vector::Vec2;

/// Axis-Aligned Bounding Box in screen space.
///
/// `x, y` is the top-left corner, `w, h` the non-negative extents.
/// A box with zero width or height is degenerate and never overlaps anything.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AABB {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl AABB {
    /// Sentinel for "no bounds yet". Overlaps nothing, absorbed by `union`.
    pub const EMPTY: Self = Self {
        x: f32::NEG_INFINITY,
        y: f32::NEG_INFINITY,
        w: 0.0,
        h: 0.0,
    };

    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Create from two opposite corners
    #[inline]
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Self::new(x, y, a.x.max(b.x) - x, a.y.max(b.y) - y)
    }

    /// Create from center and half-extents
    #[inline]
    pub fn from_center_half_extents(center: Vec2, half_w: f32, half_h: f32) -> Self {
        Self::new(center.x - half_w, center.y - half_h, half_w * 2.0, half_h * 2.0)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.right(), self.bottom())
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    /// Zero width or height
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }

    /// Whether this is the `EMPTY` sentinel (or any box anchored at -inf)
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x == f32::NEG_INFINITY || self.y == f32::NEG_INFINITY
    }

    #[inline]
    pub fn has_nan(&self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.w.is_nan() || self.h.is_nan()
    }

    /// Smallest box covering both. `EMPTY` is the identity.
    pub fn union(&self, other: &AABB) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }

        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());

        Self::new(x, y, right - x, bottom - y)
    }

    /// Check if a point lies inside or on the border
    #[inline]
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.x && point.x <= self.right() &&
        point.y >= self.y && point.y <= self.bottom()
    }

    /// Check if another box is fully contained
    #[inline]
    pub fn contains_aabb(&self, other: &AABB) -> bool {
        self.contains_point(other.min()) && self.contains_point(other.max())
    }

    /// Get the closest point on (or in) the box to a given point
    #[inline]
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            crate::clamp(point.x, self.x, self.right()),
            crate::clamp(point.y, self.y, self.bottom()),
        )
    }

    /// Euclidean distance from a point to the nearest edge. Zero if the point is inside.
    pub fn distance_to_point(&self, point: Vec2) -> f32 {
        let dx = (self.x - point.x).max(point.x - self.right()).max(0.0);
        let dy = (self.y - point.y).max(point.y - self.bottom()).max(0.0);
        (dx * dx + dy * dy).sqrt()
    }

    /// Move by an offset
    #[inline]
    pub fn translate(&self, offset: Vec2) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y, self.w, self.h)
    }
}

impl Default for AABB {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Circle given by its center and radius
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Circle {
    pub x: f32,
    pub y: f32,
    pub r: f32,
}

impl Circle {
    #[inline]
    pub const fn new(x: f32, y: f32, r: f32) -> Self {
        Self { x, y, r }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Check if a point is strictly inside
    #[inline]
    pub fn contains_point(&self, point: Vec2) -> bool {
        (point - self.center()).length_squared() < self.r * self.r
    }

    /// The square enclosing the circle
    #[inline]
    pub fn bounds(&self) -> AABB {
        AABB::from_center_half_extents(self.center(), self.r, self.r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_absorbs_empty() {
        let a = AABB::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(AABB::EMPTY.union(&a), a);
        assert_eq!(a.union(&AABB::EMPTY), a);
        assert!(AABB::EMPTY.union(&AABB::EMPTY).is_empty());
    }

    #[test]
    fn test_union_covers_both() {
        let a = AABB::new(0.0, 0.0, 10.0, 10.0);
        let b = AABB::new(20.0, -5.0, 5.0, 5.0);
        assert_eq!(a.union(&b), AABB::new(0.0, -5.0, 25.0, 15.0));
    }

    #[test]
    fn test_distance_to_point() {
        let b = AABB::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(b.distance_to_point(Vec2::new(5.0, 5.0)), 0.0);
        assert_eq!(b.distance_to_point(Vec2::new(-3.0, 5.0)), 3.0);
        assert_eq!(b.distance_to_point(Vec2::new(13.0, 14.0)), 5.0);
    }

    #[test]
    fn test_circle_bounds() {
        let c = Circle::new(5.0, 5.0, 2.0);
        assert_eq!(c.bounds(), AABB::new(3.0, 3.0, 4.0, 4.0));
        assert!(c.contains_point(Vec2::new(6.0, 5.0)));
        assert!(!c.contains_point(Vec2::new(7.0, 5.0)));
    }

    #[test]
    fn test_from_corners() {
        let b = AABB::from_corners(Vec2::new(4.0, 1.0), Vec2::new(0.0, 3.0));
        assert_eq!(b, AABB::new(0.0, 1.0, 4.0, 2.0));
    }
}
