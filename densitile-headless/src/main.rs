//! Densitile Headless
//!
//! Synthesizes a density map, cuts it into network-sized tiles, runs a
//! built-in stand-in network over every tile and stitches the result.
//! The stitched volume is checked against the same network applied to the
//! whole map, which must agree exactly for pointwise networks.

mod synth;

use std::time::Instant;

use clap::{Parser, ValueEnum};
use densitile_data::{Volume, shape_of};
use densitile_tiling::{IdentityNetwork, NetworkError, TileConfig, TileNetwork, TilePipeline};
use ndarray::{ArrayView3, Zip};
use tracing::{error, info};

/// Stand-in networks available to the demo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum NetworkKind {
    /// Return every tile unchanged
    Identity,
    /// Binary mask of voxels above the density level
    Threshold,
}

/// Headless density map tiling demo
#[derive(Parser, Debug)]
#[command(name = "densitile-headless")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Volume shape (x y z)
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], default_values_t = [120, 90, 75])]
    shape: Vec<usize>,

    /// Edge length of each network input cube
    #[arg(long, default_value_t = densitile_tiling::config::DEFAULT_BOX_SIZE)]
    box_size: usize,

    /// Edge length of the trusted centre of each cube
    #[arg(long, default_value_t = densitile_tiling::config::DEFAULT_CORE_SIZE)]
    core_size: usize,

    /// Number of Gaussian atoms in the synthetic map
    #[arg(long, default_value_t = 400)]
    atoms: usize,

    /// Seed for atom placement
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Stand-in network to run over the tiles
    #[arg(long, value_enum, default_value_t = NetworkKind::Identity)]
    network: NetworkKind,

    /// Density level for the threshold network
    #[arg(long, default_value_t = 0.5)]
    level: f32,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Marks voxels whose density exceeds a level.
struct ThresholdNetwork {
    level: f32,
}

impl ThresholdNetwork {
    fn apply(&self, volume: ArrayView3<'_, f32>) -> Volume {
        volume.mapv(|v| if v > self.level { 1.0 } else { 0.0 })
    }
}

impl TileNetwork for ThresholdNetwork {
    fn predict(&mut self, _index: usize, tile: ArrayView3<'_, f32>) -> Result<Volume, NetworkError> {
        Ok(self.apply(tile))
    }
}

fn init_logging(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_target(false)
        .init();
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let shape = match args.shape.as_slice() {
        &[x, y, z] => [x, y, z],
        _ => return Err("shape needs exactly three values".into()),
    };
    let config = TileConfig::new(args.box_size, args.core_size)?;
    let pipeline = TilePipeline::new(config)?;

    let atoms = synth::scatter_atoms(shape, args.atoms, args.seed);
    let volume = synth::render_density(shape, &atoms);
    info!(
        "Synthesized {:?} map with {} atoms (max density {:.3})",
        shape,
        atoms.len(),
        volume.iter().copied().fold(0.0f32, f32::max)
    );

    let started = Instant::now();
    let (output, expected) = match args.network {
        NetworkKind::Identity => (pipeline.run(&volume, &mut IdentityNetwork)?, volume.clone()),
        NetworkKind::Threshold => {
            let mut network = ThresholdNetwork { level: args.level };
            let expected = network.apply(volume.view());
            (pipeline.run(&volume, &mut network)?, expected)
        }
    };
    let tiles = pipeline.splitter().tile_count(shape)?;
    info!(
        "Ran {:?} network over {} tiles in {:.2?}",
        args.network,
        tiles,
        started.elapsed()
    );

    if shape_of(&output) != shape {
        error!(
            "Stitched volume has shape {:?}, expected {:?}",
            shape_of(&output),
            shape
        );
        return Err("stitched volume has the wrong shape".into());
    }

    let mut mismatched = 0usize;
    Zip::from(&output).and(&expected).for_each(|a, b| {
        if a != b {
            mismatched += 1;
        }
    });
    if mismatched > 0 {
        error!(
            "Stitched volume differs from whole-map prediction in {} voxels",
            mismatched
        );
        return Err("stitched volume does not match".into());
    }

    info!("Stitched volume {:?} matches whole-map prediction", shape);
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logging(&args.log_level);

    if let Err(e) = run(&args) {
        eprintln!("densitile-headless error: {}", e);
        std::process::exit(1);
    }
}
