//! Cutting a volume into overlapping network-sized cubes.

use densitile_data::{Shape3, Tile, shape_of, zeros};
use ndarray::{ArrayBase, Data, Ix3, s};
use tracing::{debug, info};

use crate::config::TileConfig;
use crate::error::Result;
use crate::layout::TileLayout;
use crate::manifest::Manifest;

/// Pads a volume with zeros and cuts it into `box_size` cubes whose cores
/// tile the original volume without gaps or overlap.
#[derive(Debug, Clone, Copy)]
pub struct TileSplitter {
    config: TileConfig,
}

impl TileSplitter {
    pub fn new(config: TileConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TileConfig {
        &self.config
    }

    /// Number of tiles [`create_manifest`](Self::create_manifest) yields for a shape.
    pub fn tile_count(&self, shape: Shape3) -> Result<usize> {
        Ok(TileLayout::new(self.config, shape)?.tile_count())
    }

    /// Split a volume into an ordered manifest of `box_size` cubes.
    ///
    /// Samples of any real type are widened to `f64` and stored as `f32`.
    /// The input is centred in a zero border `box_size` wide, so cubes that
    /// hang over the volume edge read zeros. A volume with a zero-length
    /// axis yields an empty manifest, which is what
    /// [`TileStitcher::reconstruct_map`](crate::TileStitcher::reconstruct_map)
    /// expects for that shape.
    #[tracing::instrument(skip_all, fields(shape = ?shape_of(volume)))]
    pub fn create_manifest<S, A>(&self, volume: &ArrayBase<S, Ix3>) -> Result<Manifest>
    where
        S: Data<Elem = A>,
        A: Copy + Into<f64>,
    {
        let shape = shape_of(volume);
        let layout = TileLayout::new(self.config, shape)?;
        let count = layout.tile_count();

        if count == 0 {
            debug!("Volume has an empty axis, no tiles to cut");
            return Ok(Manifest::new(layout, Vec::new()));
        }

        let b = self.config.box_size();
        let [sx, sy, sz] = shape;
        let mut padded = zeros([sx + 2 * b, sy + 2 * b, sz + 2 * b]);
        padded
            .slice_mut(s![b..b + sx, b..b + sy, b..b + sz])
            .zip_mut_with(volume, |dst, &src| *dst = Into::<f64>::into(src) as f32);
        debug!("Padded volume to {:?}", shape_of(&padded));

        let mut tiles = Vec::with_capacity(count);
        for coord in layout.coords() {
            let [ox, oy, oz] = layout.padded_origin(coord);
            let data = padded
                .slice(s![ox..ox + b, oy..oy + b, oz..oz + b])
                .to_owned();
            tiles.push(Tile::new(tiles.len(), coord, data));
        }

        info!(
            "Cut {} tiles ({:?} grid) of edge {}",
            tiles.len(),
            layout.counts(),
            b
        );
        Ok(Manifest::new(layout, tiles))
    }
}

impl Default for TileSplitter {
    fn default() -> Self {
        Self {
            config: TileConfig::default(),
        }
    }
}
