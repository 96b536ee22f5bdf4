//! Trigger area shapes and their geometric predicates

use drift_math::{overlap, overlap_rect_circle, Circle, Vec2, AABB};
use serde::{Deserialize, Serialize};

/// Shape tag of an area trigger
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    #[default]
    Rectangle,
    Circle,
}

/// Geometry of an area trigger
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AreaShape {
    /// Axis-aligned rectangle, `x, y` top-left
    Rectangle(AABB),
    /// Circle, `x, y` center
    Circle(Circle),
}

impl AreaShape {
    /// Create a rectangle area
    pub fn rectangle(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self::Rectangle(AABB::new(x, y, w, h))
    }

    /// Create a circle area
    pub fn circle(x: f32, y: f32, r: f32) -> Self {
        Self::Circle(Circle::new(x, y, r))
    }

    /// Shape tag
    pub fn shape(&self) -> Shape {
        match self {
            Self::Rectangle(_) => Shape::Rectangle,
            Self::Circle(_) => Shape::Circle,
        }
    }

    /// Area overlap with a box. Touching does not count.
    pub fn overlaps(&self, aabb: &AABB) -> bool {
        match self {
            Self::Rectangle(rect) => overlap(rect, aabb),
            Self::Circle(circle) => overlap_rect_circle(aabb, circle),
        }
    }

    /// Axis-aligned bounds of the area
    pub fn bounds(&self) -> AABB {
        match self {
            Self::Rectangle(rect) => *rect,
            Self::Circle(circle) => circle.bounds(),
        }
    }
}

/// Whether the nearest edge of `aabb` is at most `distance` away from `origin`
#[inline]
pub fn within_distance(origin: Vec2, distance: f32, aabb: &AABB) -> bool {
    aabb.distance_to_point(origin) <= distance
}

/// Square of half-size `distance` around `origin`, padded by a few ulps.
///
/// Box overlap is strict while the distance test is inclusive, so the pad
/// keeps boxes exactly `distance` away (and every box touching a zero
/// distance origin) overlapping the bounds.
#[inline]
pub fn distance_bounds(origin: Vec2, distance: f32) -> AABB {
    let magnitude = distance.abs() + origin.x.abs().max(origin.y.abs()) + 1.0;
    let half = distance + magnitude * f32::EPSILON * 4.0;
    AABB::from_center_half_extents(origin, half, half)
}
