//! Drift Grid - Tile-based Spatial Index
//!
//! Partitions a bounded 2D world into fixed-size tiles and records, for each
//! tracked object, every tile its bounding box overlaps.
//!
//! # Example
//!
//! ```
//! use drift_grid::prelude::*;
//! use drift_math::AABB;
//!
//! let mut grid: Grid2D<u32> = Grid2D::new(GridConfig::default()).unwrap();
//! grid.add([1], |_| AABB::new(0.0, 0.0, 5.0, 5.0));
//! assert_eq!(grid.get_containing_tiles(&1), &[TileCoord::new(0, 0)]);
//! ```

pub mod config;
pub mod error;
pub mod grid;

pub mod prelude {
    pub use crate::config::GridConfig;
    pub use crate::error::{GridError, Result};
    pub use crate::grid::{Grid2D, TileCoord};
}

pub use prelude::*;
