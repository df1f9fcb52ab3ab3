//! Face-culling mesh generation.
//!
//! # Architecture
//! - [`Face`]: A single visible block face and the two triangles that draw it
//! - [`build_mesh`]: Walks a [`VoxelSource`](super::VoxelSource) and collects every
//!   visible face

mod face;
mod mesh;

pub use face::Face;
pub use mesh::*;
