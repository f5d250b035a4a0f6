//! Ordered tile sequences.

use densitile_data::{Shape3, Tile, Volume};
use glam::I64Vec3;

use crate::error::Result;
use crate::layout::TileLayout;
use crate::stitcher::TileStitcher;

/// Tiles covering one volume, in manifest order.
///
/// The manifest keeps the layout it was cut with, so it can be stitched
/// back without restating the original shape.
#[derive(Debug, Clone)]
pub struct Manifest {
    layout: TileLayout,
    tiles: Vec<Tile>,
}

impl Manifest {
    pub(crate) fn new(layout: TileLayout, tiles: Vec<Tile>) -> Self {
        Self { layout, tiles }
    }

    pub fn layout(&self) -> &TileLayout {
        &self.layout
    }

    /// Shape of the volume the tiles were cut from.
    pub fn original_shape(&self) -> Shape3 {
        self.layout.shape()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tile> {
        self.tiles.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Origin of tile `index` in original volume coordinates.
    pub fn tile_origin(&self, index: usize) -> Option<I64Vec3> {
        self.layout.coord(index).map(|c| self.layout.tile_origin(c))
    }

    /// Take the tiles out, dropping the layout.
    pub fn into_tiles(self) -> Vec<Tile> {
        self.tiles
    }

    /// Replace every tile's data, keeping order and grid positions.
    pub fn try_map<F>(self, mut f: F) -> Result<Self>
    where
        F: FnMut(&Tile) -> Result<Volume>,
    {
        let mut tiles = Vec::with_capacity(self.tiles.len());
        for tile in self.tiles {
            let data = f(&tile)?;
            tiles.push(tile.with_data(data));
        }
        Ok(Self {
            layout: self.layout,
            tiles,
        })
    }

    /// Stitch the tiles back into a volume of the original shape.
    pub fn reconstruct(&self) -> Result<Volume> {
        TileStitcher::new(*self.layout.config())?.reconstruct_map(&self.tiles, self.original_shape())
    }
}

impl<'a> IntoIterator for &'a Manifest {
    type Item = &'a Tile;
    type IntoIter = std::slice::Iter<'a, Tile>;

    fn into_iter(self) -> Self::IntoIter {
        self.tiles.iter()
    }
}
