#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Chunks
//!
//! A chunked voxel world with face-culled meshing and background mesh rebuilds.
//!
//! The world is partitioned into fixed-size chunks, each holding a dense grid of typed
//! blocks. Two partitionings are supported side by side:
//!
//! * [`Column`] chunks are 16x256x16 and keyed by `(x, z)`; the world is bounded
//!   vertically
//! * [`Cubic`] chunks are 16x16x16 and keyed by `(x, y, z)`; the world is unbounded
//!
//! ## Key Modules
//!
//! * `core` - Shared resource container
//! * `config` - World settings, loaded from JSON
//! * `engine_state` - The world handle, voxels, meshing and the rebuild worker
//! * `error` - Error types
//!
//! ## Architecture
//!
//! Writes go through [`World::set_block`]. The owning chunk stores the block, flags
//! itself dirty and flags every loaded chunk that shares a face with the written cell.
//! Dirty chunks are queued once each; the worker started by [`EngineState`] pops them and
//! rebuilds their meshes, reading neighbouring chunks to cull faces across chunk borders.
//!
//! ## Usage
//!
//! ```rust
//! use cgmath::{Point2, Point3};
//! use voxel_chunks::{BlockType, ColumnEngine, WorldConfig};
//!
//! let mut engine = ColumnEngine::new(&WorldConfig::default()).unwrap();
//! engine.set_block(Point3::new(8, 120, 8), BlockType::Wood);
//! assert_eq!(
//!     engine.get_block(Point3::new(8, 120, 8)).map(|voxel| voxel.block_type),
//!     Some(BlockType::Wood)
//! );
//! assert!(engine.get_block(Point3::new(8, 256, 8)).is_none());
//! engine.shutdown();
//! ```

use std::{env, path::PathBuf, thread, time::Duration};

use cgmath::{Point2, Point3};
use log::{info, warn};
use web_time::Instant;

pub mod config;
pub mod core;
pub mod engine_state;
pub mod error;

pub use config::{TerrainOverrides, UnloadedNeighborPolicy, WorldConfig};
pub use engine_state::{
    rendering::{
        meshing::{build_mesh, ChunkNeighborhood, Face, VoxelSource},
        vertex_bytes, MeshVertex,
    },
    task_management::{TaskManager, TaskStats},
    voxels::{
        block::{block_face::BlockFace, block_type::BlockType, texture_cell, TextureCell, Voxel},
        chunk::{
            chunk_generation::{GenerationMethod, TerrainConfig, TerrainGenerator, TerrainPalette},
            geometry::{ChunkGeometry, Column, Cubic},
            Chunk, CHUNK_DIMENSION, COLUMN_HEIGHT,
        },
        raycast::{look_direction, RaycastHit, DEFAULT_REACH},
        world::World,
    },
    ColumnEngine, CubicEngine, EngineState,
};
pub use error::EngineError;

/// Environment variable naming a JSON configuration file for [`run`].
pub const CONFIG_ENV_VAR: &str = "VOXEL_CHUNKS_CONFIG";

/// How long [`run`] waits for the rebuild worker to catch up.
const CONVERGENCE_TIMEOUT: Duration = Duration::from_secs(30);

/// Initializes `env_logger` on stdout, filtered by `RUST_LOG`.
///
/// Calling it again after a logger is installed has no effect.
pub fn init_logger() {
    let mut log_builder = env_logger::Builder::new();
    let _ = log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .try_init();
}

/// The configuration path given as the first program argument or through
/// [`CONFIG_ENV_VAR`].
pub fn config_path() -> Option<PathBuf> {
    env::args_os()
        .nth(1)
        .or_else(|| env::var_os(CONFIG_ENV_VAR))
        .map(PathBuf::from)
}

/// Runs the demo: builds a column world, digs a shaft, waits for the rebuild worker to
/// settle and reports what it built.
pub fn run() -> Result<(), EngineError> {
    init_logger();
    info!("Logger initialized");

    let config = match config_path() {
        Some(path) => WorldConfig::from_path(path)?,
        None => WorldConfig::default(),
    };

    let mut engine = ColumnEngine::new(&config)?;
    let world = engine.world();

    for x in -1..=1 {
        for z in -1..=1 {
            world.chunk(Point2::new(x, z));
        }
    }

    let surface = (0..COLUMN_HEIGHT)
        .rev()
        .find(|&y| {
            world
                .get_block(Point3::new(8, y, 8))
                .is_some_and(|voxel| voxel.is_solid())
        })
        .unwrap_or(0);
    info!("Surface at (8, 8) is y = {}", surface);

    for y in (surface - 10).max(1)..=surface {
        world.set_block(Point3::new(8, y, 8), BlockType::Air);
    }

    let started = Instant::now();
    while world.dirty_count() > 0 || world.pending_count() > 0 {
        if started.elapsed() > CONVERGENCE_TIMEOUT {
            warn!(
                "Rebuilds did not settle: {} dirty, {} pending",
                world.dirty_count(),
                world.pending_count()
            );
            break;
        }
        thread::sleep(Duration::from_millis(10));
    }
    info!("Meshes settled in {:?}", started.elapsed());

    let mut coords = world.loaded_coords();
    coords.sort_by_key(|coord| (coord.x, coord.y));
    for coord in coords {
        if let Some(mesh) = world.chunk_mesh(coord) {
            info!(
                "Chunk {:?}: {} vertices ({} bytes)",
                coord,
                mesh.len(),
                vertex_bytes(&mesh).len()
            );
        }
    }

    let eye = Point3::new(8.5, surface as f32 + 3.0, 8.5);
    match world.raycast(eye, look_direction(0.0, -90.0), 20.0) {
        Some(hit) => info!(
            "Looking down the shaft hits {} at {:?}",
            hit.voxel.block_type, hit.voxel.position
        ),
        None => info!("Looking down the shaft hits nothing"),
    }

    engine.shutdown();
    info!("Rebuild worker: {:?}", engine.task_stats());
    Ok(())
}
