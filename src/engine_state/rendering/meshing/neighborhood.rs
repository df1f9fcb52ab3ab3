//! A chunk together with the chunks across its faces, as seen by the mesher.

use std::{cell::OnceCell, sync::Arc};

use cgmath::Point3;

use super::VoxelSource;
use crate::{
    config::UnloadedNeighborPolicy,
    engine_state::voxels::{
        block::{block_face::BlockFace, block_type::BlockType},
        chunk::{geometry::ChunkGeometry, Chunk},
        world::World,
    },
};

/// What lies across one face of the chunk being meshed.
enum Across<G: ChunkGeometry> {
    /// The world ends here (above or below a column, or past the edge of `i32` space).
    Nothing,
    /// A chunk exists in principle but is not loaded.
    Unloaded,
    Loaded(Arc<Chunk<G>>),
}

/// Meshing view of one chunk.
///
/// Cells inside the chunk are read directly. Cells beyond a face are looked up in the
/// neighbouring chunk, resolved at most once per face and per rebuild.
pub struct ChunkNeighborhood<'a, G: ChunkGeometry> {
    chunk: &'a Chunk<G>,
    world: &'a World<G>,
    neighbors: [OnceCell<Across<G>>; 6],
}

impl<'a, G: ChunkGeometry> ChunkNeighborhood<'a, G> {
    /// Views `chunk` with its neighbours looked up in `world`.
    pub fn new(chunk: &'a Chunk<G>, world: &'a World<G>) -> Self {
        ChunkNeighborhood {
            chunk,
            world,
            neighbors: Default::default(),
        }
    }

    fn across(&self, face: BlockFace) -> &Across<G> {
        self.neighbors[face as usize].get_or_init(|| {
            match G::neighbor(self.chunk.position(), face) {
                None => Across::Nothing,
                Some(coord) => match self.world.chunk_for_visibility(coord) {
                    Some(chunk) => Across::Loaded(chunk),
                    None => Across::Unloaded,
                },
            }
        })
    }
}

impl<G: ChunkGeometry> VoxelSource for ChunkNeighborhood<'_, G> {
    fn dimensions(&self) -> [i32; 3] {
        [G::EDGE, G::HEIGHT, G::EDGE]
    }

    fn block_at(&self, local: Point3<i32>) -> BlockType {
        self.chunk.get_voxel(local).unwrap_or_default()
    }

    fn is_opaque_across(&self, face: BlockFace, outside: Point3<i32>) -> bool {
        match self.across(face) {
            Across::Nothing => false,
            Across::Unloaded => self.world.unloaded_neighbors() == UnloadedNeighborPolicy::Opaque,
            Across::Loaded(neighbor) => neighbor
                .get_voxel(G::wrap(outside))
                .is_some_and(BlockType::is_opaque),
        }
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{Point2, Point3};

    use super::*;
    use crate::{
        config::WorldConfig,
        engine_state::{
            rendering::meshing::build_mesh,
            voxels::chunk::{
                chunk_generation::GenerationMethod,
                geometry::{Column, Cubic},
            },
        },
    };

    fn world<G: ChunkGeometry>(policy: UnloadedNeighborPolicy) -> World<G> {
        World::new(
            &WorldConfig::default()
                .with_generation(GenerationMethod::Empty)
                .with_unloaded_neighbors(policy),
        )
    }

    fn faces_of<G: ChunkGeometry>(world: &World<G>, coord: G::Coord) -> usize {
        let chunk = world.chunk(coord);
        build_mesh(&ChunkNeighborhood::new(&chunk, world)).len() / 6
    }

    #[test]
    fn unloaded_neighbours_follow_the_policy() {
        let opaque: World<Cubic> = world(UnloadedNeighborPolicy::Opaque);
        opaque.set_block(Point3::new(0, 0, 0), BlockType::Stone);
        // Bottom, North and West border unloaded chunks and are culled.
        assert_eq!(faces_of(&opaque, Point3::new(0, 0, 0)), 3);

        let transparent: World<Cubic> = world(UnloadedNeighborPolicy::Transparent);
        transparent.set_block(Point3::new(0, 0, 0), BlockType::Stone);
        assert_eq!(faces_of(&transparent, Point3::new(0, 0, 0)), 6);
        assert_eq!(transparent.chunk_count(), 1);
    }

    #[test]
    fn loaded_neighbours_cull_shared_faces() {
        let world: World<Cubic> = world(UnloadedNeighborPolicy::Transparent);
        world.set_block(Point3::new(0, 0, 0), BlockType::Stone);
        world.set_block(Point3::new(-1, 0, 0), BlockType::Stone);
        assert_eq!(faces_of(&world, Point3::new(0, 0, 0)), 5);
        assert_eq!(faces_of(&world, Point3::new(-1, 0, 0)), 5);

        world.set_block(Point3::new(-1, 0, 0), BlockType::Leaves);
        assert_eq!(faces_of(&world, Point3::new(0, 0, 0)), 6);
    }

    #[test]
    fn column_top_and_bottom_always_show() {
        let world: World<Column> = world(UnloadedNeighborPolicy::Opaque);
        world.set_block(Point3::new(5, 0, 5), BlockType::Stone);
        world.set_block(Point3::new(5, 255, 5), BlockType::Stone);
        assert_eq!(faces_of(&world, Point2::new(0, 0)), 12);
    }

    #[test]
    fn generate_policy_meshes_against_fresh_terrain() {
        let world: World<Cubic> = World::new(
            &WorldConfig::default()
                .with_generation(GenerationMethod::Solid)
                .with_unloaded_neighbors(UnloadedNeighborPolicy::Generate),
        );
        world.set_block(Point3::new(0, 0, 0), BlockType::Air);
        // The carved cell exposes three faces inside the chunk. Every boundary face
        // borders a generated solid chunk and stays hidden.
        assert_eq!(faces_of(&world, Point3::new(0, 0, 0)), 3);
        assert_eq!(world.chunk_count(), 7);
    }
}
