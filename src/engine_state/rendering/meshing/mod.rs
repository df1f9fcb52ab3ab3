//! Mesh generation for voxel chunks.
//!
//! The mesher culls faces between adjacent opaque cells and emits one quad (two
//! triangles) for every remaining face. It reads voxels through the [`VoxelSource`]
//! trait, so it can run over a live chunk with its neighbours ([`ChunkNeighborhood`]) or
//! over a plain grid in tests.
//!
//! # Architecture
//! - `VoxelSource`: Read-only view of a box of cells plus whatever lies beyond its faces
//! - `ChunkNeighborhood`: A chunk and the chunks across its six faces
//! - `mesh/`: Contains the face layouts and the meshing algorithm

use cgmath::Point3;

use crate::engine_state::voxels::block::{block_face::BlockFace, block_type::BlockType};

/// Core mesh generation algorithms and data structures.
mod mesh;
mod neighborhood;

pub use mesh::*;
pub use neighborhood::ChunkNeighborhood;

/// A read-only box of voxels that can be meshed.
pub trait VoxelSource {
    /// Extent of the box along X, Y and Z.
    fn dimensions(&self) -> [i32; 3];

    /// The block at a local position inside the box.
    fn block_at(&self, local: Point3<i32>) -> BlockType;

    /// Whether the cell just outside the box, reached by crossing `face`, hides that face.
    ///
    /// `outside` is expressed in the box's local coordinates and lies one step beyond
    /// its bounds.
    fn is_opaque_across(&self, face: BlockFace, outside: Point3<i32>) -> bool;

    /// Whether a local position lies inside the box.
    fn contains(&self, local: Point3<i32>) -> bool {
        let [width, height, depth] = self.dimensions();
        (0..width).contains(&local.x) && (0..height).contains(&local.y) && (0..depth).contains(&local.z)
    }
}
