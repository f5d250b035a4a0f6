//! Tile grid planning and ordering.
//!
//! Both the splitter and the stitcher walk tiles through [`TileLayout`], so
//! the x-fastest, then y, then z order lives in exactly one place:
//! [`linear_index`] and its inverse [`TileLayout::coord`].

use std::ops::Range;

use densitile_data::Shape3;
use glam::{I64Vec3, UVec3};
use tracing::{debug, warn};

use crate::config::TileConfig;
use crate::error::{Result, TilingError};

/// Round every axis of `shape` up to a multiple of `core_size`.
///
/// A zero-length axis stays zero.
///
/// # Panics
///
/// Panics if a rounded axis does not fit in `usize`. Use
/// [`checked_manifest_dimensions`] or [`TileLayout::new`] for shapes that
/// come from untrusted input.
pub fn get_manifest_dimensions(config: &TileConfig, shape: Shape3) -> Shape3 {
    match checked_manifest_dimensions(config, shape) {
        Some(dims) => dims,
        None => panic!("manifest dimensions of {shape:?} overflow usize"),
    }
}

/// [`get_manifest_dimensions`], returning `None` on overflow.
pub fn checked_manifest_dimensions(config: &TileConfig, shape: Shape3) -> Option<Shape3> {
    let core = config.core_size();
    let mut dims = [0usize; 3];
    for (dim, d) in dims.iter_mut().zip(shape) {
        *dim = d.div_ceil(core).checked_mul(core)?;
    }
    Some(dims)
}

/// Position of grid cell `(ix, iy, iz)` in a manifest with `nx * ny` cells
/// per z-slab.
pub fn linear_index(ix: usize, iy: usize, iz: usize, nx: usize, ny: usize) -> usize {
    ix + iy * nx + iz * nx * ny
}

/// Grid of tiles covering one volume shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileLayout {
    config: TileConfig,
    shape: Shape3,
    dims: Shape3,
    counts: UVec3,
}

impl TileLayout {
    /// Plan the tile grid for a volume of the given shape.
    pub fn new(config: TileConfig, shape: Shape3) -> Result<Self> {
        config.validate()?;

        let dims = checked_manifest_dimensions(&config, shape).ok_or_else(|| {
            warn!("Shape {:?} overflows when padded to whole cores", shape);
            TilingError::GridTooLarge(shape)
        })?;
        let mut counts = [0u32; 3];
        for (count, dim) in counts.iter_mut().zip(dims) {
            *count = u32::try_from(dim / config.core_size())
                .map_err(|_| TilingError::GridTooLarge(shape))?;
        }
        let counts = UVec3::from_array(counts);

        // Total count must be addressable as a linear index
        counts
            .to_array()
            .iter()
            .try_fold(1usize, |acc, &n| acc.checked_mul(n as usize))
            .ok_or(TilingError::GridTooLarge(shape))?;

        debug!(
            "Planned tile grid {:?} for shape {:?} (padded to {:?})",
            counts, shape, dims
        );

        Ok(Self {
            config,
            shape,
            dims,
            counts,
        })
    }

    pub fn config(&self) -> &TileConfig {
        &self.config
    }

    /// Shape of the volume this layout covers.
    pub fn shape(&self) -> Shape3 {
        self.shape
    }

    /// Tiles per axis.
    pub fn counts(&self) -> UVec3 {
        self.counts
    }

    /// Shape rounded up to whole cores on every axis.
    pub fn padded_dims(&self) -> Shape3 {
        self.dims
    }

    /// Number of tiles in the manifest.
    pub fn tile_count(&self) -> usize {
        self.counts
            .to_array()
            .iter()
            .map(|&n| n as usize)
            .product()
    }

    /// Linear manifest index of a grid cell.
    pub fn index(&self, coord: UVec3) -> usize {
        linear_index(
            coord.x as usize,
            coord.y as usize,
            coord.z as usize,
            self.counts.x as usize,
            self.counts.y as usize,
        )
    }

    /// Grid cell at a linear manifest index, if it is in range.
    pub fn coord(&self, index: usize) -> Option<UVec3> {
        if index >= self.tile_count() {
            return None;
        }
        let nx = self.counts.x as usize;
        let ny = self.counts.y as usize;
        let ix = index % nx;
        let iy = (index / nx) % ny;
        let iz = index / (nx * ny);
        Some(UVec3::new(ix as u32, iy as u32, iz as u32))
    }

    /// Grid cells in manifest order.
    pub fn coords(&self) -> impl Iterator<Item = UVec3> + use<> {
        let counts = self.counts;
        (0..counts.z).flat_map(move |iz| {
            (0..counts.y).flat_map(move |iy| (0..counts.x).map(move |ix| UVec3::new(ix, iy, iz)))
        })
    }

    /// Origin of a tile inside the splitter's padded volume.
    ///
    /// The input sits at offset `box_size` in that volume, so the first
    /// origin `start` leaves exactly one margin of padding before sample 0.
    pub fn padded_origin(&self, coord: UVec3) -> Shape3 {
        let start = self.config.start();
        let core = self.config.core_size();
        coord.to_array().map(|i| start + i as usize * core)
    }

    /// Origin of a tile in original volume coordinates. Negative on the
    /// first row of every axis.
    pub fn tile_origin(&self, coord: UVec3) -> I64Vec3 {
        let core = self.config.core_size() as i64;
        let margin = self.config.margin() as i64;
        coord.as_i64vec3() * core - I64Vec3::splat(margin)
    }

    /// Block of the padded output a tile's core is written to.
    pub fn core_region(&self, coord: UVec3) -> [Range<usize>; 3] {
        let core = self.config.core_size();
        coord.to_array().map(|i| {
            let lo = i as usize * core;
            lo..lo + core
        })
    }

    /// Range of samples kept from every tile along each axis.
    pub fn extract_range(&self) -> Range<usize> {
        let margin = self.config.margin();
        margin..margin + self.config.core_size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(shape: Shape3) -> TileLayout {
        TileLayout::new(TileConfig::default(), shape).unwrap()
    }

    #[test]
    fn test_manifest_dimensions_exact_multiple() {
        let config = TileConfig::default();
        assert_eq!(get_manifest_dimensions(&config, [50, 50, 50]), [50, 50, 50]);
        assert_eq!(get_manifest_dimensions(&config, [100, 50, 50]), [100, 50, 50]);
    }

    #[test]
    fn test_manifest_dimensions_rounds_up() {
        let config = TileConfig::default();
        assert_eq!(get_manifest_dimensions(&config, [1, 51, 149]), [50, 100, 150]);
    }

    #[test]
    fn test_manifest_dimensions_zero_axis() {
        let config = TileConfig::default();
        assert_eq!(get_manifest_dimensions(&config, [0, 50, 50]), [0, 50, 50]);
    }

    #[test]
    fn test_linear_index_x_fastest() {
        assert_eq!(linear_index(0, 0, 0, 3, 2), 0);
        assert_eq!(linear_index(1, 0, 0, 3, 2), 1);
        assert_eq!(linear_index(0, 1, 0, 3, 2), 3);
        assert_eq!(linear_index(0, 0, 1, 3, 2), 6);
        assert_eq!(linear_index(2, 1, 1, 3, 2), 11);
    }

    #[test]
    fn test_tile_count() {
        assert_eq!(layout([50, 50, 50]).tile_count(), 1);
        assert_eq!(layout([100, 50, 50]).tile_count(), 2);
        assert_eq!(layout([101, 60, 10]).tile_count(), 3 * 2);
        assert_eq!(layout([0, 50, 50]).tile_count(), 0);
    }

    #[test]
    fn test_coords_follow_linear_index() {
        let l = layout([120, 70, 110]);
        assert_eq!(l.counts(), UVec3::new(3, 2, 3));

        let coords: Vec<UVec3> = l.coords().collect();
        assert_eq!(coords.len(), l.tile_count());
        for (i, coord) in coords.iter().enumerate() {
            assert_eq!(l.index(*coord), i);
            assert_eq!(l.coord(i), Some(*coord));
        }
        assert_eq!(coords[1], UVec3::new(1, 0, 0));
        assert_eq!(coords[3], UVec3::new(0, 1, 0));
        assert_eq!(coords[6], UVec3::new(0, 0, 1));
        assert_eq!(l.coord(l.tile_count()), None);
    }

    #[test]
    fn test_coords_empty_for_zero_axis() {
        assert_eq!(layout([0, 50, 50]).coords().count(), 0);
        assert_eq!(layout([50, 50, 0]).coords().count(), 0);
    }

    #[test]
    fn test_origins() {
        let l = layout([150, 50, 50]);
        assert_eq!(l.padded_origin(UVec3::ZERO), [57, 57, 57]);
        assert_eq!(l.padded_origin(UVec3::new(2, 0, 0)), [157, 57, 57]);
        assert_eq!(l.tile_origin(UVec3::ZERO), I64Vec3::splat(-7));
        assert_eq!(l.tile_origin(UVec3::new(1, 0, 0)), I64Vec3::new(43, -7, -7));
    }

    #[test]
    fn test_core_region_and_extract_range() {
        let l = layout([150, 100, 50]);
        assert_eq!(l.core_region(UVec3::new(2, 1, 0)), [100..150, 50..100, 0..50]);
        assert_eq!(l.extract_range(), 7..57);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = TileConfig::new(9, 4);
        assert!(matches!(config, Err(TilingError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_overflowing_shape() {
        let err = TileLayout::new(TileConfig::default(), [usize::MAX, 0, 0]).unwrap_err();
        assert!(matches!(err, TilingError::GridTooLarge(_)));

        let config = TileConfig::new(8, 4).unwrap();
        let err = TileLayout::new(config, [usize::MAX - 1, 1, 1]).unwrap_err();
        assert!(matches!(err, TilingError::GridTooLarge(_)));
    }

    #[test]
    fn test_checked_manifest_dimensions() {
        let config = TileConfig::default();
        assert_eq!(checked_manifest_dimensions(&config, [1, 51, 0]), Some([50, 100, 0]));
        assert_eq!(checked_manifest_dimensions(&config, [usize::MAX, 1, 1]), None);
    }

    #[test]
    fn test_padded_dims_match_planner() {
        let config = TileConfig::default();
        let l = layout([101, 60, 0]);
        assert_eq!(l.padded_dims(), get_manifest_dimensions(&config, [101, 60, 0]));
    }

    #[test]
    fn test_last_tile_stays_inside_padded_volume() {
        let config = TileConfig::new(8, 4).unwrap();
        for n in 1..20 {
            let l = TileLayout::new(config, [n, n, n]).unwrap();
            let last = l.coord(l.tile_count() - 1).unwrap();
            let origin = l.padded_origin(last);
            assert!(origin[0] + config.box_size() <= n + 2 * config.box_size());
        }
    }
}
