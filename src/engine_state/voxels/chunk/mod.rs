//! # Chunk Module
//!
//! This module provides the `Chunk` struct: one fixed-size partition of the voxel
//! world holding a dense grid of block ids, a dirty flag and the mesh built from the
//! grid.
//!
//! ## Storage
//!
//! Blocks are stored as one flat array of compact ids indexed by
//! `(x * HEIGHT + y) * EDGE + z`. Cells are atomics so the mutation thread can write
//! while the rebuild worker reads without a lock. A rebuild racing a write may see a
//! mix of old and new cells; the write flags the chunk dirty again, so the next
//! rebuild converges.
//!
//! ## Dirty tracking
//!
//! Every write bumps a revision counter before setting `dirty`. A rebuild remembers
//! the revision it started from and only leaves the chunk clean if no write landed
//! during the pass. Otherwise the chunk queues itself for another rebuild.

use std::sync::{
    atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering},
    Arc,
};

use cgmath::Point3;
use log::debug;
use web_time::Instant;

use super::{
    block::{block_face::BlockFace, block_type::BlockType},
    world::World,
};
use crate::{
    core::MtResource,
    engine_state::rendering::{
        meshing::{build_mesh, ChunkNeighborhood},
        MeshVertex,
    },
};

use geometry::ChunkGeometry;

pub mod chunk_generation;
pub mod coords;
pub mod geometry;

/// The dimension (width and depth) of a chunk in blocks.
pub const CHUNK_DIMENSION: i32 = 16;
/// The height of a column chunk in blocks.
pub const COLUMN_HEIGHT: i32 = 256;

/// One partition of the voxel world.
///
/// Chunks are shared between the mutation thread, the rebuild worker and renderers
/// behind an `Arc`; every method takes `&self`.
pub struct Chunk<G: ChunkGeometry> {
    /// The position of this chunk in chunk coordinates (not block coordinates).
    position: G::Coord,

    /// Block ids, one per cell.
    blocks: Box<[AtomicU8]>,

    /// Set when the mesh no longer reflects the grid.
    dirty: AtomicBool,

    /// Incremented by every change that makes the chunk dirty.
    revision: AtomicU64,

    /// The triangle list produced by the last rebuild.
    mesh: MtResource<Arc<[MeshVertex]>>,
}

impl<G: ChunkGeometry> Chunk<G> {
    /// Creates a chunk from a generated grid. New chunks start dirty with an empty mesh.
    ///
    /// A grid of the wrong length is truncated or padded with air.
    pub fn new(position: G::Coord, grid: Vec<BlockType>) -> Self {
        let mut blocks: Vec<AtomicU8> = grid
            .into_iter()
            .take(G::volume())
            .map(|block_type| AtomicU8::new(block_type.id()))
            .collect();
        blocks.resize_with(G::volume(), || AtomicU8::new(BlockType::Air.id()));

        Chunk {
            position,
            blocks: blocks.into_boxed_slice(),
            dirty: AtomicBool::new(true),
            revision: AtomicU64::new(0),
            mesh: MtResource::new(Arc::from(Vec::new())),
        }
    }

    /// Creates a chunk filled with air.
    pub fn empty(position: G::Coord) -> Self {
        Self::new(position, vec![BlockType::Air; G::volume()])
    }

    /// The chunk coordinate of this chunk.
    pub fn position(&self) -> G::Coord {
        self.position
    }

    /// Gets the block at chunk-local coordinates, or `None` outside the chunk.
    pub fn get_voxel(&self, local: Point3<i32>) -> Option<BlockType> {
        G::index(local).map(|index| self.block_at_index(index))
    }

    #[inline]
    fn block_at_index(&self, index: usize) -> BlockType {
        BlockType::from_id(self.blocks[index].load(Ordering::Relaxed))
    }

    /// Writes a block at chunk-local coordinates.
    ///
    /// Out-of-range coordinates are ignored and return `false`. Otherwise the chunk
    /// is flagged dirty, and for every face of the chunk the cell touches, the
    /// already-loaded neighbour across that face is flagged dirty through `world`.
    /// Edge and corner neighbours are never touched, and no neighbour is created.
    pub fn set_voxel(&self, world: &World<G>, local: Point3<i32>, block_type: BlockType) -> bool {
        let Some(index) = G::index(local) else {
            return false;
        };

        self.blocks[index].store(block_type.id(), Ordering::Relaxed);
        self.mark_dirty();

        for face in BlockFace::ALL {
            if G::index(local + face.offset()).is_some() {
                continue;
            }
            if let Some(neighbor) = G::neighbor(self.position, face) {
                world.mark_dirty(neighbor);
            }
        }

        true
    }

    /// Whether the mesh is stale.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Flags the mesh as stale without queueing a rebuild.
    ///
    /// Callers outside the crate go through [`World::mark_dirty`], which also queues.
    pub(crate) fn mark_dirty(&self) {
        self.revision.fetch_add(1, Ordering::SeqCst);
        self.dirty.store(true, Ordering::SeqCst);
    }

    /// Number of changes that made this chunk dirty since it was created.
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::SeqCst)
    }

    /// A snapshot of the mesh produced by the last rebuild.
    ///
    /// Positions are chunk-local; translate by [`World::chunk_origin`] when drawing.
    pub fn mesh(&self) -> Arc<[MeshVertex]> {
        self.mesh.get().clone()
    }

    /// Rebuilds the mesh from the current grid and returns its vertex count.
    ///
    /// Faces on the chunk border are decided by looking into the neighbouring chunks
    /// through `world`; how unloaded neighbours are treated depends on the world's
    /// [`UnloadedNeighborPolicy`](crate::config::UnloadedNeighborPolicy).
    ///
    /// If a write lands while the mesh is being built, the chunk stays dirty and is
    /// queued on `world` again, even when the write's own queue entry was already
    /// consumed by another rebuild.
    pub fn rebuild_mesh(&self, world: &World<G>) -> usize {
        let started = Instant::now();
        let revision = self.revision();

        let vertices = build_mesh(&ChunkNeighborhood::new(self, world));
        let vertex_count = self.install_mesh(world, revision, vertices);

        debug!(
            "Rebuilt {} chunk {:?}: {} faces in {:?}",
            G::NAME,
            self.position,
            vertex_count / 6,
            started.elapsed()
        );

        vertex_count
    }

    /// Publishes a mesh built from the grid as of `revision`.
    fn install_mesh(&self, world: &World<G>, revision: u64, vertices: Vec<MeshVertex>) -> usize {
        let vertex_count = vertices.len();
        self.mesh.replace(Arc::from(vertices));

        self.dirty.store(false, Ordering::SeqCst);
        if self.revision() != revision {
            self.dirty.store(true, Ordering::SeqCst);
            world.request_rebuild(self.position);
        }

        vertex_count
    }

    /// Counts the cells holding `block_type`.
    pub fn count(&self, block_type: BlockType) -> usize {
        self.blocks
            .iter()
            .filter(|cell| cell.load(Ordering::Relaxed) == block_type.id())
            .count()
    }
}
