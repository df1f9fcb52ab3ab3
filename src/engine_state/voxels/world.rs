//! # World Module
//!
//! This module provides the `World` struct which manages the collection of chunks in the
//! voxel world. It serves as the central coordinator for chunk creation, world-space block
//! access and the queue of chunks waiting for a mesh rebuild.
//!
//! ## Architecture
//!
//! Chunks are created lazily the first time anything references them and are never
//! unloaded. Creation runs the terrain generator outside of any lock and then races to
//! insert; exactly one chunk wins per coordinate.
//!
//! ## Rebuild queue
//!
//! Coordinates whose mesh went stale are pushed onto an unbounded channel. A companion
//! set keeps each coordinate on the channel at most once, so a burst of edits to one chunk
//! produces a single rebuild. The background worker (or [`World::process_pending`]) pops a
//! coordinate, removes it from the set and rebuilds the chunk if it is still dirty.
//!
//! ## Thread Safety
//!
//! Every method takes `&self`. The world is shared with the rebuild worker behind an `Arc`.

use std::sync::Arc;

use cgmath::Point3;
use crossbeam_channel::{unbounded, Receiver, Sender};
use dashmap::{mapref::entry::Entry, DashMap, DashSet};
use log::{trace, warn};

use super::{
    block::{block_face::BlockFace, block_type::BlockType, Voxel},
    chunk::{
        chunk_generation::TerrainGenerator,
        geometry::ChunkGeometry,
        Chunk,
    },
};
use crate::{
    config::{UnloadedNeighborPolicy, WorldConfig},
    engine_state::rendering::MeshVertex,
};

/// A voxel world partitioned into chunks of geometry `G`.
///
/// # Examples
///
/// ```
/// use cgmath::{Point2, Point3};
/// use voxel_chunks::{BlockType, Column, World, WorldConfig};
///
/// let world: World<Column> = World::new(&WorldConfig::default());
/// world.set_block(Point3::new(3, 100, -5), BlockType::Wood);
///
/// let voxel = world.get_block(Point3::new(3, 100, -5)).unwrap();
/// assert_eq!(voxel.block_type, BlockType::Wood);
/// assert!(world.is_dirty(Point2::new(0, -1)));
/// ```
pub struct World<G: ChunkGeometry> {
    /// Every loaded chunk, keyed by chunk coordinate.
    chunks: DashMap<G::Coord, Arc<Chunk<G>>>,

    /// Coordinates currently waiting on the rebuild channel.
    pending: DashSet<G::Coord>,

    rebuild_sender: Sender<G::Coord>,
    rebuild_receiver: Receiver<G::Coord>,

    generator: TerrainGenerator<G>,

    /// How meshing treats faces that border a chunk which is not loaded.
    unloaded_neighbors: UnloadedNeighborPolicy,
}

impl<G: ChunkGeometry> World<G> {
    /// Creates a new, empty world.
    ///
    /// # Arguments
    ///
    /// * `config` - Generation method, terrain overrides and meshing policy
    pub fn new(config: &WorldConfig) -> Self {
        let (rebuild_sender, rebuild_receiver) = unbounded();
        World {
            chunks: DashMap::new(),
            pending: DashSet::new(),
            rebuild_sender,
            rebuild_receiver,
            generator: TerrainGenerator::new(config.generation, config.terrain_for::<G>()),
            unloaded_neighbors: config.unloaded_neighbors,
        }
    }

    /// The policy applied to faces bordering unloaded chunks.
    pub fn unloaded_neighbors(&self) -> UnloadedNeighborPolicy {
        self.unloaded_neighbors
    }

    /// Retrieves the chunk at the given chunk coordinate, creating and queueing it if it
    /// is not loaded yet.
    pub fn chunk(&self, coord: G::Coord) -> Arc<Chunk<G>> {
        self.get_or_create(coord, true)
    }

    /// Retrieves the chunk at the given chunk coordinate without creating it.
    pub fn loaded_chunk(&self, coord: G::Coord) -> Option<Arc<Chunk<G>>> {
        self.chunks.get(&coord).map(|chunk| Arc::clone(chunk.value()))
    }

    /// Resolves a neighbouring chunk for a visibility query during meshing.
    ///
    /// Under [`UnloadedNeighborPolicy::Generate`] a missing chunk is created but not
    /// queued, so a rebuild only ever pulls in the ring of chunks directly around it.
    pub(crate) fn chunk_for_visibility(&self, coord: G::Coord) -> Option<Arc<Chunk<G>>> {
        match self.unloaded_neighbors {
            UnloadedNeighborPolicy::Generate => Some(self.get_or_create(coord, false)),
            UnloadedNeighborPolicy::Opaque | UnloadedNeighborPolicy::Transparent => {
                self.loaded_chunk(coord)
            }
        }
    }

    fn get_or_create(&self, coord: G::Coord, schedule: bool) -> Arc<Chunk<G>> {
        if let Some(chunk) = self.loaded_chunk(coord) {
            return chunk;
        }

        let generated = Arc::new(Chunk::new(coord, self.generator.generate(coord)));
        let (chunk, created) = match self.chunks.entry(coord) {
            Entry::Occupied(entry) => (Arc::clone(entry.get()), false),
            Entry::Vacant(entry) => {
                entry.insert(Arc::clone(&generated));
                (generated, true)
            }
        };

        if created {
            trace!("Created {} chunk {:?}", G::NAME, coord);
            if schedule {
                self.request_rebuild(coord);
            }
            // Loaded neighbours meshed their shared faces against a missing chunk.
            for face in BlockFace::ALL {
                if let Some(neighbor) = G::neighbor(coord, face) {
                    self.mark_dirty(neighbor);
                }
            }
        }

        chunk
    }

    /// Gets the block at a world position.
    ///
    /// Returns `None` for positions outside the world. The owning chunk is created if
    /// necessary.
    pub fn get_block(&self, position: Point3<i32>) -> Option<Voxel> {
        let (coord, local) = G::locate(position)?;
        self.chunk(coord)
            .get_voxel(local)
            .map(|block_type| Voxel::new(block_type, position))
    }

    /// Writes a block at a world position.
    ///
    /// Positions outside the world are ignored. The owning chunk (created if necessary)
    /// and every loaded chunk sharing a face with the written cell are flagged dirty and
    /// queued for a rebuild.
    pub fn set_block(&self, position: Point3<i32>, block_type: BlockType) {
        let Some((coord, local)) = G::locate(position) else {
            trace!("Ignoring write outside the world at {:?}", position);
            return;
        };
        if self.chunk(coord).set_voxel(self, local, block_type) {
            self.request_rebuild(coord);
        }
    }

    /// Flags a loaded chunk dirty and queues it. Unloaded coordinates are left alone.
    ///
    /// # Returns
    ///
    /// Whether a loaded chunk was found.
    pub fn mark_dirty(&self, coord: G::Coord) -> bool {
        match self.loaded_chunk(coord) {
            Some(chunk) => {
                chunk.mark_dirty();
                self.request_rebuild(coord);
                true
            }
            None => false,
        }
    }

    /// A snapshot of a loaded chunk's mesh. Never creates a chunk.
    pub fn chunk_mesh(&self, coord: G::Coord) -> Option<Arc<[MeshVertex]>> {
        self.loaded_chunk(coord).map(|chunk| chunk.mesh())
    }

    /// Whether the chunk at `coord` is loaded and has a stale mesh.
    pub fn is_dirty(&self, coord: G::Coord) -> bool {
        self.loaded_chunk(coord)
            .is_some_and(|chunk| chunk.is_dirty())
    }

    /// The number of loaded chunks with a stale mesh.
    pub fn dirty_count(&self) -> usize {
        self.chunks
            .iter()
            .filter(|chunk| chunk.value().is_dirty())
            .count()
    }

    /// The number of loaded chunks.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// The coordinates of every loaded chunk, in no particular order.
    pub fn loaded_coords(&self) -> Vec<G::Coord> {
        self.chunks.iter().map(|chunk| *chunk.key()).collect()
    }

    /// The world position of local cell `(0, 0, 0)` of a chunk.
    pub fn chunk_origin(&self, coord: G::Coord) -> Point3<i32> {
        G::origin(coord)
    }

    /// Queues a chunk for a rebuild unless it is already waiting.
    pub fn request_rebuild(&self, coord: G::Coord) {
        if self.pending.insert(coord) {
            trace!("Queued {} chunk {:?} for rebuild", G::NAME, coord);
            if self.rebuild_sender.send(coord).is_err() {
                warn!("Rebuild queue closed, dropping {:?}", coord);
                self.pending.remove(&coord);
            }
        }
    }

    /// The number of chunks waiting for a rebuild.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// The coordinates waiting for a rebuild, in no particular order.
    pub fn pending_coords(&self) -> Vec<G::Coord> {
        self.pending.iter().map(|coord| *coord).collect()
    }

    /// A handle onto the rebuild queue, for the background worker.
    pub fn rebuild_queue(&self) -> Receiver<G::Coord> {
        self.rebuild_receiver.clone()
    }

    /// Handles one coordinate popped from the rebuild queue.
    ///
    /// The coordinate leaves the pending set before the rebuild starts, so a write that
    /// lands during the rebuild queues the chunk again.
    ///
    /// # Returns
    ///
    /// Whether a mesh was rebuilt. A chunk that is no longer dirty is skipped.
    pub fn process_rebuild(&self, coord: G::Coord) -> bool {
        self.pending.remove(&coord);
        match self.loaded_chunk(coord) {
            Some(chunk) if chunk.is_dirty() => {
                chunk.rebuild_mesh(self);
                true
            }
            _ => false,
        }
    }

    /// Drains the rebuild queue on the calling thread.
    ///
    /// Rebuilds that queue further chunks are drained too.
    ///
    /// # Returns
    ///
    /// The number of meshes rebuilt.
    pub fn process_pending(&self) -> usize {
        let mut rebuilt = 0;
        while let Ok(coord) = self.rebuild_receiver.try_recv() {
            if self.process_rebuild(coord) {
                rebuilt += 1;
            }
        }
        rebuilt
    }
}
