//! Split, predict and stitch in one call.

use densitile_data::{Volume, shape_of};
use ndarray::{ArrayBase, Data, Ix3};
use tracing::{debug, info, warn};

use crate::config::TileConfig;
use crate::error::{Result, TilingError};
use crate::manifest::Manifest;
use crate::network::TileNetwork;
use crate::splitter::TileSplitter;
use crate::stitcher::TileStitcher;

/// Runs a volume through a [`TileNetwork`] tile by tile.
#[derive(Debug, Clone, Copy)]
pub struct TilePipeline {
    splitter: TileSplitter,
    stitcher: TileStitcher,
}

impl TilePipeline {
    pub fn new(config: TileConfig) -> Result<Self> {
        Ok(Self {
            splitter: TileSplitter::new(config)?,
            stitcher: TileStitcher::new(config)?,
        })
    }

    pub fn splitter(&self) -> &TileSplitter {
        &self.splitter
    }

    pub fn stitcher(&self) -> &TileStitcher {
        &self.stitcher
    }

    /// Tile `volume`, predict every tile and stitch the predictions.
    #[tracing::instrument(skip_all, fields(shape = ?shape_of(volume)))]
    pub fn run<S, A, N>(&self, volume: &ArrayBase<S, Ix3>, network: &mut N) -> Result<Volume>
    where
        S: Data<Elem = A>,
        A: Copy + Into<f64>,
        N: TileNetwork + ?Sized,
    {
        let manifest = self.splitter.create_manifest(volume)?;
        let predicted = self.predict(manifest, network)?;
        self.stitcher
            .reconstruct_map(predicted.tiles(), predicted.original_shape())
    }

    /// Feed every tile to `network` in manifest order.
    ///
    /// Each prediction must keep the `box_size` cube shape; the first
    /// failure aborts the whole manifest.
    pub fn predict<N>(&self, manifest: Manifest, network: &mut N) -> Result<Manifest>
    where
        N: TileNetwork + ?Sized,
    {
        let edge = [self.splitter.config().box_size(); 3];
        let total = manifest.len();

        let predicted = manifest.try_map(|tile| {
            let output = network
                .predict(tile.index, tile.data.view())
                .map_err(|e| {
                    warn!("Network failed on tile {}: {}", tile.index, e);
                    TilingError::Network {
                        index: tile.index,
                        reason: e.to_string(),
                    }
                })?;

            let actual = shape_of(&output);
            if actual != edge {
                warn!(
                    "Network changed tile {} shape to {:?}",
                    tile.index, actual
                );
                return Err(TilingError::TileShape {
                    index: tile.index,
                    expected: edge,
                    actual,
                });
            }
            debug!("Predicted tile {}/{}", tile.index + 1, total);
            Ok(output)
        })?;

        info!("Network processed {} tiles", total);
        Ok(predicted)
    }
}

impl Default for TilePipeline {
    fn default() -> Self {
        Self {
            splitter: TileSplitter::default(),
            stitcher: TileStitcher::default(),
        }
    }
}
