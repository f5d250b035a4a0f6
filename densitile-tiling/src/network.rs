//! The per-tile model seam.
//!
//! The network itself lives outside this crate. Anything that maps one
//! `box_size` cube to another cube of the same shape can stand in for it.

use densitile_data::Volume;
use ndarray::ArrayView3;

/// Error type returned by network implementations.
pub type NetworkError = Box<dyn std::error::Error + Send + Sync>;

/// A model that predicts one output cube per input cube.
pub trait TileNetwork {
    /// Predict the output for the tile at manifest position `index`.
    ///
    /// The returned volume must have the same shape as `tile`.
    fn predict(&mut self, index: usize, tile: ArrayView3<'_, f32>) -> Result<Volume, NetworkError>;
}

/// Returns every tile unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityNetwork;

impl TileNetwork for IdentityNetwork {
    fn predict(&mut self, _index: usize, tile: ArrayView3<'_, f32>) -> Result<Volume, NetworkError> {
        Ok(tile.to_owned())
    }
}

/// Adapts a closure into a [`TileNetwork`].
pub struct FnNetwork<F> {
    f: F,
}

impl<F> FnNetwork<F>
where
    F: FnMut(ArrayView3<'_, f32>) -> Volume,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> TileNetwork for FnNetwork<F>
where
    F: FnMut(ArrayView3<'_, f32>) -> Volume,
{
    fn predict(&mut self, _index: usize, tile: ArrayView3<'_, f32>) -> Result<Volume, NetworkError> {
        Ok((self.f)(tile))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_returns_copy() {
        let tile = Volume::from_elem([2, 2, 2], 4.0);
        let out = IdentityNetwork.predict(0, tile.view()).unwrap();
        assert_eq!(out, tile);
    }

    #[test]
    fn test_fn_network_applies_closure() {
        let mut net = FnNetwork::new(|t: ArrayView3<'_, f32>| t.mapv(|v| v * 2.0));
        let tile = Volume::from_elem([2, 2, 2], 1.5);
        let out = net.predict(3, tile.view()).unwrap();
        assert!(out.iter().all(|&v| v == 3.0));
    }

    #[test]
    fn test_fn_network_keeps_state() {
        let mut calls = 0;
        {
            let mut net = FnNetwork::new(|t: ArrayView3<'_, f32>| {
                calls += 1;
                t.to_owned()
            });
            let tile = Volume::zeros([1, 1, 1]);
            net.predict(0, tile.view()).unwrap();
            net.predict(1, tile.view()).unwrap();
        }
        assert_eq!(calls, 2);
    }
}
