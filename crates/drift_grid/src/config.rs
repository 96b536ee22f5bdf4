//! Grid configuration

use crate::error::{GridError, Result};
use serde::{Deserialize, Serialize};

/// World and tile extents of a [`Grid2D`](crate::Grid2D), in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// World width
    pub width: f32,

    /// World height
    pub height: f32,

    /// Width of a single tile
    pub tile_width: f32,

    /// Height of a single tile
    pub tile_height: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 100.0,
            tile_width: 10.0,
            tile_height: 10.0,
        }
    }
}

impl GridConfig {
    /// Create a configuration
    pub fn new(width: f32, height: f32, tile_width: f32, tile_height: f32) -> Self {
        Self {
            width,
            height,
            tile_width,
            tile_height,
        }
    }

    /// Square tiles of the given size
    pub fn with_tile_size(mut self, size: f32) -> Self {
        self.tile_width = size;
        self.tile_height = size;
        self
    }

    /// Reject non-positive tiles and negative worlds
    pub fn validate(&self) -> Result<()> {
        let tile_ok = |v: f32| v.is_finite() && v > 0.0;
        if !tile_ok(self.tile_width) || !tile_ok(self.tile_height) {
            return Err(GridError::InvalidTileSize {
                width: self.tile_width,
                height: self.tile_height,
            });
        }

        let world_ok = |v: f32| v.is_finite() && v >= 0.0;
        if !world_ok(self.width) || !world_ok(self.height) {
            return Err(GridError::InvalidWorldSize {
                width: self.width,
                height: self.height,
            });
        }

        Ok(())
    }

    /// Number of tile columns, `ceil(width / tile_width)`
    pub fn num_tiles_x(&self) -> u32 {
        (self.width / self.tile_width).ceil() as u32
    }

    /// Number of tile rows, `ceil(height / tile_height)`
    pub fn num_tiles_y(&self) -> u32 {
        (self.height / self.tile_height).ceil() as u32
    }
}
