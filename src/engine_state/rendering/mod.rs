//! Mesh generation for the voxel engine.
//!
//! This module turns chunk grids into triangle lists. Uploading and drawing them is left
//! to the embedding application; [`vertex_bytes`] hands the data over in GPU layout.

pub mod meshing;
mod vertex;

// Re-export commonly used types
pub use vertex::{vertex_bytes, MeshVertex};
