//! Core data types for density volumes and tiles.
//!
//! A [`Volume`] is a dense `f32` array addressed as `(x, y, z)`.
//! A [`Tile`] is one cube cut from a padded volume, tagged with its
//! position in the tile grid so ordering can be checked downstream.

use glam::UVec3;
use ndarray::{Array3, ArrayBase, Data, Ix3};
use thiserror::Error;
use tracing::warn;

/// Dense 3D array of density samples.
pub type Volume = Array3<f32>;

/// Extent of a volume along `(x, y, z)`.
pub type Shape3 = [usize; 3];

/// Errors raised when building volumes from raw buffers.
#[derive(Debug, Error)]
pub enum VolumeError {
    #[error("Sample count mismatch: shape {shape:?} needs {expected} samples, got {actual}")]
    SampleCount {
        shape: Shape3,
        expected: usize,
        actual: usize,
    },

    #[error("Shape {0:?} overflows the addressable sample count")]
    Overflow(Shape3),
}

/// Shape of any 3D array as `[x, y, z]`.
pub fn shape_of<S: Data>(array: &ArrayBase<S, Ix3>) -> Shape3 {
    let (x, y, z) = array.dim();
    [x, y, z]
}

/// Allocate a zero-filled volume.
pub fn zeros(shape: Shape3) -> Volume {
    Volume::zeros(shape)
}

/// Build a volume from samples laid out in row-major `(x, y, z)` order.
pub fn volume_from_vec(shape: Shape3, samples: Vec<f32>) -> Result<Volume, VolumeError> {
    let expected = shape
        .iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .ok_or(VolumeError::Overflow(shape))?;

    if samples.len() != expected {
        warn!(
            "Rejecting {} samples for shape {:?} (expected {})",
            samples.len(),
            shape,
            expected
        );
        return Err(VolumeError::SampleCount {
            shape,
            expected,
            actual: samples.len(),
        });
    }

    Volume::from_shape_vec(shape, samples).map_err(|_| VolumeError::Overflow(shape))
}

/// A cube of samples cut from a padded volume.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    /// Linear position in the manifest.
    pub index: usize,
    /// Grid cell `(ix, iy, iz)` this tile was cut at.
    pub coord: UVec3,
    /// Sample data, `box_size` on every axis when produced by the splitter.
    pub data: Volume,
}

impl Tile {
    /// Create a new tile.
    pub fn new(index: usize, coord: UVec3, data: Volume) -> Self {
        Self { index, coord, data }
    }

    /// Shape of the tile's data.
    pub fn shape(&self) -> Shape3 {
        shape_of(&self.data)
    }

    /// True if the tile is a cube with the given edge length.
    pub fn is_cube(&self, edge: usize) -> bool {
        self.shape() == [edge; 3]
    }

    /// Replace the sample data, keeping the grid position.
    pub fn with_data(self, data: Volume) -> Self {
        Self {
            index: self.index,
            coord: self.coord,
            data,
        }
    }
}
