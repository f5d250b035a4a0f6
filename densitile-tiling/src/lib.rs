//! Densitile Tiling Crate
//!
//! Splits a density volume into overlapping cubes sized for a fixed-input
//! network and stitches the per-cube predictions back into a volume of the
//! original shape. Only the central core of each cube is kept on the way
//! back, so predictions near cube faces never reach the output.
//!
//! ## Modules
//!
//! - [`config`]: Tile edge lengths and their validation
//! - [`layout`]: Grid planning and the shared tile ordering
//! - [`splitter`]: Padding and cutting a volume into a [`Manifest`]
//! - [`stitcher`]: Core-region reassembly
//! - [`network`]: The seam for the external per-tile model
//! - [`pipeline`]: Split, predict and stitch in one call

pub mod config;
pub mod error;
pub mod layout;
pub mod manifest;
pub mod network;
pub mod pipeline;
pub mod splitter;
pub mod stitcher;

pub use config::TileConfig;
pub use error::{Result, TilingError};
pub use layout::{TileLayout, checked_manifest_dimensions, get_manifest_dimensions, linear_index};
pub use manifest::Manifest;
pub use network::{FnNetwork, IdentityNetwork, NetworkError, TileNetwork};
pub use pipeline::TilePipeline;
pub use splitter::TileSplitter;
pub use stitcher::TileStitcher;

pub use densitile_data::{Shape3, Tile, Volume};
