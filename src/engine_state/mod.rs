//! # Engine State Module
//!
//! The core engine module that owns a voxel world and the worker keeping its meshes
//! current.
//!
//! ## Key Components
//!
//! * `EngineState` - The world handle: a `World` plus its rebuild worker
//! * `rendering` - Mesh generation and the vertex format
//! * `task_management` - The background worker
//! * `voxels` - Blocks, chunks, terrain generation and the world
//!
//! ## Architecture
//!
//! `EngineState` is an explicit handle rather than a global. Constructing one starts the
//! rebuild worker; dropping it (or calling `shutdown`) stops and joins the worker. Any
//! number of threads may read and write blocks through a shared reference while the
//! worker rebuilds dirty chunks in the background.

use std::sync::Arc;

use cgmath::Point3;
use log::info;
use task_management::{TaskManager, TaskStats};
use voxels::{
    block::{block_type::BlockType, Voxel},
    chunk::geometry::{ChunkGeometry, Column, Cubic},
    world::World,
};

use crate::{config::WorldConfig, error::EngineError};
use rendering::MeshVertex;

pub mod rendering;
pub mod task_management;
pub mod voxels;

/// An engine over column chunks.
pub type ColumnEngine = EngineState<Column>;
/// An engine over cubic chunks.
pub type CubicEngine = EngineState<Cubic>;

/// A voxel world together with its running rebuild worker.
///
/// # Examples
///
/// ```
/// use cgmath::{Point3, Vector3};
/// use voxel_chunks::{BlockType, CubicEngine, GenerationMethod, WorldConfig};
///
/// let engine = CubicEngine::new(
///     &WorldConfig::default().with_generation(GenerationMethod::Empty),
/// )
/// .unwrap();
///
/// engine.set_block(Point3::new(0, 0, -3), BlockType::Stone);
/// let hit = engine
///     .world()
///     .raycast(Point3::new(0.5, 0.5, 0.5), Vector3::new(0.0, 0.0, -1.0), 5.0)
///     .unwrap();
/// assert_eq!(hit.placement_position(), Some(Point3::new(0, 0, -2)));
/// ```
pub struct EngineState<G: ChunkGeometry> {
    /// The voxel world containing all chunk data
    world: Arc<World<G>>,
    /// The worker rebuilding dirty chunks
    task_manager: TaskManager,
}

impl<G: ChunkGeometry> EngineState<G> {
    /// Creates a world and starts its rebuild worker.
    ///
    /// # Arguments
    ///
    /// * `config` - World and worker settings
    ///
    /// # Returns
    ///
    /// The running engine, or `EngineError::WorkerSpawn` if the worker thread could not
    /// be started.
    pub fn new(config: &WorldConfig) -> Result<Self, EngineError> {
        let world = Arc::new(World::new(config));

        let worker_world = Arc::clone(&world);
        let task_manager = TaskManager::spawn(
            &format!("{}-chunk-rebuild", G::NAME),
            world.rebuild_queue(),
            config.rebuild_interval(),
            move |coord| {
                worker_world.process_rebuild(coord);
            },
        )?;

        info!(
            "Started {} world ({:?} terrain, {:?} unloaded neighbours)",
            G::NAME,
            config.generation,
            config.unloaded_neighbors
        );

        Ok(EngineState {
            world,
            task_manager,
        })
    }

    /// The world, for operations beyond the shortcuts below.
    pub fn world(&self) -> &Arc<World<G>> {
        &self.world
    }

    /// See [`World::get_block`].
    pub fn get_block(&self, position: Point3<i32>) -> Option<Voxel> {
        self.world.get_block(position)
    }

    /// See [`World::set_block`].
    pub fn set_block(&self, position: Point3<i32>, block_type: BlockType) {
        self.world.set_block(position, block_type)
    }

    /// See [`World::chunk_mesh`].
    pub fn chunk_mesh(&self, coord: G::Coord) -> Option<Arc<[MeshVertex]>> {
        self.world.chunk_mesh(coord)
    }

    /// See [`World::is_dirty`].
    pub fn is_dirty(&self, coord: G::Coord) -> bool {
        self.world.is_dirty(coord)
    }

    /// Counters of the rebuild worker.
    pub fn task_stats(&self) -> TaskStats {
        self.task_manager.stats()
    }

    /// Whether the rebuild worker is running.
    pub fn is_running(&self) -> bool {
        self.task_manager.is_running()
    }

    /// Stops the rebuild worker and waits for it to exit.
    ///
    /// The world stays usable; chunks queued afterwards are only rebuilt through
    /// [`World::process_pending`].
    pub fn shutdown(&mut self) {
        self.task_manager.shutdown();
    }
}
