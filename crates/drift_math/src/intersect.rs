//! Overlap and intersection tests
//!
//! - AABB vs AABB (strictly positive overlap area)
//! - AABB vs Circle (nearest point, strict)
//! - Infinite line vs infinite line

use crate::bounds::{AABB, Circle};
use crate::consts::PARALLEL_EPSILON;
use crate::vector::Vec2;

/// AABB-AABB overlap.
///
/// True iff the clamped overlap is strictly positive on both axes.
/// Touching edges and degenerate boxes never overlap.
#[inline]
pub fn overlap(a: &AABB, b: &AABB) -> bool {
    let overlap_x = a.right().min(b.right()) - a.x.max(b.x);
    let overlap_y = a.bottom().min(b.bottom()) - a.y.max(b.y);

    overlap_x > 0.0 && overlap_y > 0.0
}

/// AABB-Circle overlap.
///
/// Clamps the circle center into the box to find the nearest point and
/// compares its squared distance against `r^2`. Touching is not overlapping.
#[inline]
pub fn overlap_rect_circle(rect: &AABB, circle: &Circle) -> bool {
    let nearest = rect.closest_point(circle.center());
    (nearest - circle.center()).length_squared() < circle.r * circle.r
}

/// Intersection point of the infinite line through `p0, q0` with the
/// infinite line through `p1, q1`.
///
/// Returns `None` for parallel or near-parallel lines
/// (determinant below `PARALLEL_EPSILON`).
pub fn line_intersection(p0: Vec2, q0: Vec2, p1: Vec2, q1: Vec2) -> Option<Vec2> {
    let d0 = q0 - p0;
    let d1 = q1 - p1;
    let det = d0.perp_dot(d1);

    if det.abs() < PARALLEL_EPSILON {
        return None;
    }

    let t = (p1 - p0).perp_dot(d1) / det;
    Some(p0 + d0 * t)
}
