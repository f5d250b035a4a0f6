//! Densitile Data Crate
//!
//! Volume and tile types shared by the tiling pipeline.
//! This crate is network-agnostic and knows nothing about tile geometry;
//! it only describes dense 3D arrays and the cubes cut out of them.

pub mod types;

pub use types::{Shape3, Tile, Volume, VolumeError, shape_of, volume_from_vec, zeros};
