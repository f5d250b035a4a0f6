//! Error types for tiling and stitching.

use densitile_data::Shape3;
use thiserror::Error;

/// Errors that can occur while splitting or stitching a volume.
#[derive(Debug, Error)]
pub enum TilingError {
    #[error("Invalid tile configuration: {0}")]
    InvalidConfig(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("Manifest length mismatch for shape {shape:?}: expected {expected} tiles, got {actual}")]
    ManifestLength {
        shape: Shape3,
        expected: usize,
        actual: usize,
    },

    #[error("Tile {index} has shape {actual:?}, expected {expected:?}")]
    TileShape {
        index: usize,
        expected: Shape3,
        actual: Shape3,
    },

    #[error("Tile at position {position} carries index {index}")]
    TileOrder { position: usize, index: usize },

    #[error("Tile grid for shape {0:?} is too large")]
    GridTooLarge(Shape3),

    #[error("Network failed on tile {index}: {reason}")]
    Network { index: usize, reason: String },
}

pub type Result<T> = std::result::Result<T, TilingError>;
