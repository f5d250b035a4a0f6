//! Synthetic density maps.
//!
//! Builds a volume as a sum of isotropic Gaussian "atoms" so the demo has
//! something map-like to tile without reading any files.

use densitile_data::{Shape3, Volume, zeros};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// One Gaussian blob of density.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Atom {
    /// Centre in voxel coordinates.
    pub center: Vec3,
    /// Standard deviation in voxels.
    pub sigma: f32,
    /// Peak density.
    pub weight: f32,
}

/// Scatter `count` atoms uniformly through a volume of `shape`.
///
/// The same seed always yields the same atoms.
pub fn scatter_atoms(shape: Shape3, count: usize, seed: u64) -> Vec<Atom> {
    let mut rng = StdRng::seed_from_u64(seed);
    let extent = Vec3::new(shape[0] as f32, shape[1] as f32, shape[2] as f32);
    (0..count)
        .map(|_| Atom {
            center: Vec3::new(rng.random(), rng.random(), rng.random()) * extent,
            sigma: rng.random_range(1.0..2.5),
            weight: rng.random_range(0.5..1.5),
        })
        .collect()
}

/// Render atoms into a density volume, truncating each blob at 3 sigma.
pub fn render_density(shape: Shape3, atoms: &[Atom]) -> Volume {
    let mut volume = zeros(shape);
    for atom in atoms {
        let reach = atom.sigma * 3.0;
        let lo = (atom.center - Vec3::splat(reach)).max(Vec3::ZERO).as_uvec3();
        let hi = (atom.center + Vec3::splat(reach)).ceil().as_uvec3();
        let inv = 1.0 / (2.0 * atom.sigma * atom.sigma);

        for x in lo.x as usize..(hi.x as usize).min(shape[0]) {
            for y in lo.y as usize..(hi.y as usize).min(shape[1]) {
                for z in lo.z as usize..(hi.z as usize).min(shape[2]) {
                    let p = Vec3::new(x as f32, y as f32, z as f32);
                    let d2 = p.distance_squared(atom.center);
                    volume[[x, y, z]] += atom.weight * (-d2 * inv).exp();
                }
            }
        }
    }
    debug!("Rendered {} atoms into {:?}", atoms.len(), shape);
    volume
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scatter_is_reproducible() {
        let a = scatter_atoms([20, 20, 20], 5, 7);
        let b = scatter_atoms([20, 20, 20], 5, 7);
        assert_eq!(a, b);
        assert!(a.iter().all(|atom| atom.center.cmplt(Vec3::splat(20.0)).all()));
        assert!(a.iter().all(|atom| (1.0..2.5).contains(&atom.sigma)));
        assert!(a.iter().all(|atom| (0.5..1.5).contains(&atom.weight)));
    }

    #[test]
    fn test_scatter_depends_on_seed() {
        let a = scatter_atoms([20, 20, 20], 5, 7);
        let b = scatter_atoms([20, 20, 20], 5, 8);
        assert_ne!(a, b);
    }

    #[test]
    fn test_render_peak_at_center() {
        let atom = Atom {
            center: Vec3::new(5.0, 5.0, 5.0),
            sigma: 1.0,
            weight: 2.0,
        };
        let volume = render_density([10, 10, 10], &[atom]);
        assert!((volume[[5, 5, 5]] - 2.0).abs() < 1e-6);
        assert!(volume[[5, 5, 6]] < volume[[5, 5, 5]]);
        assert_eq!(volume[[0, 0, 0]], 0.0);
    }

    #[test]
    fn test_render_clips_at_edges() {
        let atom = Atom {
            center: Vec3::new(0.0, 9.5, 0.0),
            sigma: 2.0,
            weight: 1.0,
        };
        let volume = render_density([4, 10, 4], &[atom]);
        assert!(volume[[0, 9, 0]] > 0.9);
    }
}
