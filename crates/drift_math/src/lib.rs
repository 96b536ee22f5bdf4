//! # drift_math - 2D Geometry Utilities
//!
//! Small, allocation-free geometry for tile-based 2D games:
//! - `Vec2` points/vectors
//! - `AABB` axis-aligned boxes in `x, y, w, h` form (top-left origin)
//! - `Circle`
//! - Overlap tests and line intersection
//!
//! All overlap tests are area-based: shapes that merely touch do not overlap.

pub mod vector;
pub mod bounds;
pub mod intersect;

pub use vector::*;
pub use bounds::*;
pub use intersect::*;

/// Common math constants
pub mod consts {
    /// Determinant threshold below which two lines are treated as parallel
    pub const PARALLEL_EPSILON: f32 = 1e-3;
}

/// Clamp value between min and max
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    if value < min { min }
    else if value > max { max }
    else { value }
}

pub mod prelude {
    pub use crate::vector::Vec2;
    pub use crate::bounds::{AABB, Circle};
    pub use crate::intersect::{overlap, overlap_rect_circle, line_intersection};
    pub use crate::clamp;
}
