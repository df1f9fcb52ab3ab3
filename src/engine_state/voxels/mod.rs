//! # Voxel World
//!
//! This module contains the voxel data model: block types, chunks and the world that
//! owns them.
//!
//! ## Architecture
//!
//! The voxel system is organized into several key components:
//!
//! * **Block**: Defines individual voxel types, their faces and texture cells
//! * **Chunk**: Fixed-size 3D grids of blocks, coordinate mapping, chunk geometries and
//!   terrain generation
//! * **World**: Lazily creates chunks and routes world-space reads and writes to them
//! * **Raycast**: Picks the block a view ray points at
//!
//! ## Data Flow
//!
//! 1. World receives requests for block access or modification
//! 2. World delegates to the owning chunk (creating it if necessary)
//! 3. Changes flag the chunk and any touched neighbours dirty and queue them
//! 4. The rebuild worker regenerates the meshes of queued chunks
//!
//! ## Thread Safety
//!
//! * Chunk grids are atomics, so reads never block writes
//! * Chunk lookup and insertion go through a concurrent map
//! * Meshes are swapped in whole behind a read-write lock

pub mod block;
pub mod chunk;
pub mod raycast;
pub mod world;
