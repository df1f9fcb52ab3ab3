//! # Chunk Geometry
//!
//! A world can be partitioned in two ways:
//!
//! * [`Column`]: 16x256x16 chunks keyed by `(x, z)`. The world is bounded vertically
//!   and the Y coordinate indexes the chunk directly.
//! * [`Cubic`]: 16x16x16 chunks keyed by `(x, y, z)`. The world is unbounded on
//!   every axis.
//!
//! Everything that differs between the two lives behind [`ChunkGeometry`]; chunks,
//! the mesher and the world are generic over it.

use std::{fmt::Debug, hash::Hash};

use cgmath::{Point2, Point3};

use super::{
    chunk_generation::TerrainConfig,
    coords::{split, step_chunk, world_coord},
    CHUNK_DIMENSION, COLUMN_HEIGHT,
};
use crate::engine_state::voxels::block::block_face::BlockFace;

/// Describes the shape of a chunk and how chunk coordinates relate to world space.
pub trait ChunkGeometry: Send + Sync + 'static {
    /// The key chunks are stored under.
    type Coord: Copy + Eq + Hash + Debug + Send + Sync + 'static;

    /// Human readable name, used in log output and thread names.
    const NAME: &'static str;

    /// Extent of a chunk along X and Z.
    const EDGE: i32 = CHUNK_DIMENSION;

    /// Extent of a chunk along Y.
    const HEIGHT: i32;

    /// Resolves a world position to its chunk and the local cell inside it.
    ///
    /// Returns `None` when the position lies outside the world (only possible for
    /// vertically bounded geometries).
    fn locate(world: Point3<i32>) -> Option<(Self::Coord, Point3<i32>)>;

    /// The world position of local cell `(0, 0, 0)` of the chunk.
    fn origin(coord: Self::Coord) -> Point3<i32>;

    /// The chunk sharing the given face with `coord`, if the world has one.
    ///
    /// The outermost chunks along X and Z (and Y for cubic chunks) have no neighbour
    /// past the edge of the `i32` world.
    fn neighbor(coord: Self::Coord, face: BlockFace) -> Option<Self::Coord>;

    /// Deterministic terrain seed for a chunk.
    fn terrain_seed(coord: Self::Coord) -> u64;

    /// Terrain parameters used when the configuration does not override them.
    fn default_terrain() -> TerrainConfig;

    /// Number of cells in one chunk.
    fn volume() -> usize {
        (Self::EDGE * Self::HEIGHT * Self::EDGE) as usize
    }

    /// Flat index of a local cell, or `None` if the cell is outside the chunk.
    ///
    /// Cells are laid out as `(x * HEIGHT + y) * EDGE + z`.
    #[inline]
    fn index(local: Point3<i32>) -> Option<usize> {
        if (0..Self::EDGE).contains(&local.x)
            && (0..Self::HEIGHT).contains(&local.y)
            && (0..Self::EDGE).contains(&local.z)
        {
            Some(((local.x * Self::HEIGHT + local.y) * Self::EDGE + local.z) as usize)
        } else {
            None
        }
    }

    /// Wraps a cell that fell just outside a chunk into the neighbouring chunk's
    /// local space.
    #[inline]
    fn wrap(local: Point3<i32>) -> Point3<i32> {
        Point3::new(
            local.x.rem_euclid(Self::EDGE),
            local.y.rem_euclid(Self::HEIGHT),
            local.z.rem_euclid(Self::EDGE),
        )
    }
}

/// Vertically bounded 16x256x16 chunks.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Column;

impl ChunkGeometry for Column {
    type Coord = Point2<i32>;

    const NAME: &'static str = "column";
    const HEIGHT: i32 = COLUMN_HEIGHT;

    fn locate(world: Point3<i32>) -> Option<(Point2<i32>, Point3<i32>)> {
        if !(0..Self::HEIGHT).contains(&world.y) {
            return None;
        }
        let (chunk_x, local_x) = split(world.x, Self::EDGE);
        let (chunk_z, local_z) = split(world.z, Self::EDGE);
        Some((
            Point2::new(chunk_x, chunk_z),
            Point3::new(local_x, world.y, local_z),
        ))
    }

    fn origin(coord: Point2<i32>) -> Point3<i32> {
        Point3::new(
            world_coord(coord.x, 0, Self::EDGE),
            0,
            world_coord(coord.y, 0, Self::EDGE),
        )
    }

    fn neighbor(coord: Point2<i32>, face: BlockFace) -> Option<Point2<i32>> {
        if face.is_vertical() {
            return None;
        }
        let offset = face.offset();
        Some(Point2::new(
            step_chunk(coord.x, offset.x, Self::EDGE)?,
            step_chunk(coord.y, offset.z, Self::EDGE)?,
        ))
    }

    fn terrain_seed(coord: Point2<i32>) -> u64 {
        (coord.x as i64)
            .wrapping_mul(391_279)
            .wrapping_add((coord.y as i64).wrapping_mul(918_723)) as u64
    }

    fn default_terrain() -> TerrainConfig {
        TerrainConfig::column()
    }
}

/// Unbounded 16x16x16 chunks.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Cubic;

impl ChunkGeometry for Cubic {
    type Coord = Point3<i32>;

    const NAME: &'static str = "cubic";
    const HEIGHT: i32 = CHUNK_DIMENSION;

    fn locate(world: Point3<i32>) -> Option<(Point3<i32>, Point3<i32>)> {
        let (chunk_x, local_x) = split(world.x, Self::EDGE);
        let (chunk_y, local_y) = split(world.y, Self::HEIGHT);
        let (chunk_z, local_z) = split(world.z, Self::EDGE);
        Some((
            Point3::new(chunk_x, chunk_y, chunk_z),
            Point3::new(local_x, local_y, local_z),
        ))
    }

    fn origin(coord: Point3<i32>) -> Point3<i32> {
        Point3::new(
            world_coord(coord.x, 0, Self::EDGE),
            world_coord(coord.y, 0, Self::HEIGHT),
            world_coord(coord.z, 0, Self::EDGE),
        )
    }

    fn neighbor(coord: Point3<i32>, face: BlockFace) -> Option<Point3<i32>> {
        let offset = face.offset();
        Some(Point3::new(
            step_chunk(coord.x, offset.x, Self::EDGE)?,
            step_chunk(coord.y, offset.y, Self::HEIGHT)?,
            step_chunk(coord.z, offset.z, Self::EDGE)?,
        ))
    }

    fn terrain_seed(coord: Point3<i32>) -> u64 {
        (coord.x as i64)
            .wrapping_mul(391_279)
            .wrapping_add((coord.z as i64).wrapping_mul(918_723))
            .wrapping_add((coord.y as i64).wrapping_mul(123_456)) as u64
    }

    fn default_terrain() -> TerrainConfig {
        TerrainConfig::cubic()
    }
}
