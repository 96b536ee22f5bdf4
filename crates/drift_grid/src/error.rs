//! Error types for the spatial grid

use thiserror::Error;

/// Grid configuration errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    /// Tile dimensions must be finite and strictly positive
    #[error("Invalid tile size {width}x{height}: tile dimensions must be > 0")]
    InvalidTileSize { width: f32, height: f32 },

    /// World dimensions must be finite and non-negative
    #[error("Invalid world size {width}x{height}: world dimensions must be >= 0")]
    InvalidWorldSize { width: f32, height: f32 },
}

/// Result type for grid operations
pub type Result<T> = std::result::Result<T, GridError>;
