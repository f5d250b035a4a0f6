//! Reassembling tile cores into a volume.

use densitile_data::{Shape3, Tile, Volume, shape_of, zeros};
use ndarray::{ArrayView3, s};
use tracing::{debug, info, warn};

use crate::config::TileConfig;
use crate::error::{Result, TilingError};
use crate::layout::TileLayout;

/// Inverse of [`TileSplitter`](crate::TileSplitter): keeps the central
/// `core_size` cube of every tile and lays the cores side by side.
#[derive(Debug, Clone, Copy)]
pub struct TileStitcher {
    config: TileConfig,
}

impl TileStitcher {
    pub fn new(config: TileConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TileConfig {
        &self.config
    }

    /// Stitch processed tiles into a volume of `original_shape`.
    ///
    /// Tiles are consumed in slice order; each tile's `index` must equal its
    /// position so a reordered manifest is caught rather than silently
    /// scrambled.
    ///
    /// A shape with a zero-length axis has no grid cells on that axis, so it
    /// expects an empty manifest and yields a zero-filled volume of
    /// `original_shape`. Any tile supplied for such a shape fails with
    /// [`TilingError::ManifestLength`].
    #[tracing::instrument(skip_all, fields(shape = ?original_shape, tiles = tiles.len()))]
    pub fn reconstruct_map(&self, tiles: &[Tile], original_shape: Shape3) -> Result<Volume> {
        for (position, tile) in tiles.iter().enumerate() {
            if tile.index != position {
                warn!("Tile at position {} carries index {}", position, tile.index);
                return Err(TilingError::TileOrder {
                    position,
                    index: tile.index,
                });
            }
        }

        self.assemble(tiles.iter().map(|t| t.data.view()), tiles.len(), original_shape)
    }

    /// Stitch bare tile arrays, trusting their order.
    #[tracing::instrument(skip_all, fields(shape = ?original_shape, tiles = tiles.len()))]
    pub fn reconstruct_arrays(&self, tiles: &[Volume], original_shape: Shape3) -> Result<Volume> {
        self.assemble(tiles.iter().map(|t| t.view()), tiles.len(), original_shape)
    }

    fn assemble<'a, I>(&self, tiles: I, len: usize, original_shape: Shape3) -> Result<Volume>
    where
        I: Iterator<Item = ArrayView3<'a, f32>>,
    {
        let layout = TileLayout::new(self.config, original_shape)?;
        let expected = layout.tile_count();
        if len != expected {
            warn!("Expected {} tiles, got {}", expected, len);
            return Err(TilingError::ManifestLength {
                shape: original_shape,
                expected,
                actual: len,
            });
        }

        let padded_dims = layout.padded_dims();
        let mut output = zeros(padded_dims);
        let keep = layout.extract_range();
        let edge = [self.config.box_size(); 3];

        for (index, (coord, tile)) in layout.coords().zip(tiles).enumerate() {
            let actual = shape_of(&tile);
            if actual != edge {
                return Err(TilingError::TileShape {
                    index,
                    expected: edge,
                    actual,
                });
            }

            let [rx, ry, rz] = layout.core_region(coord);
            output
                .slice_mut(s![rx, ry, rz])
                .assign(&tile.slice(s![keep.clone(), keep.clone(), keep.clone()]));
        }
        debug!("Assembled padded output {:?}", padded_dims);

        let [sx, sy, sz] = original_shape;
        let cropped = output.slice(s![..sx, ..sy, ..sz]).to_owned();
        info!("Stitched {} tiles into {:?}", len, original_shape);
        Ok(cropped)
    }
}

impl Default for TileStitcher {
    fn default() -> Self {
        Self {
            config: TileConfig::default(),
        }
    }
}
