//! The face-culling mesher.
//!
//! Every non-air cell is visited in `x, y, z` order and its faces are evaluated in
//! [`BlockFace::ALL`] order. A face is emitted unless the cell behind it is opaque.
//! Rebuilds are always full; no faces are merged.

use cgmath::Point3;

use super::super::VoxelSource;
use super::face::Face;
use crate::engine_state::{
    rendering::MeshVertex,
    voxels::block::{block_face::BlockFace, block_type::BlockType},
};

/// Builds the triangle list for every visible face in `source`.
///
/// # Arguments
/// * `source` - The voxels to mesh
///
/// # Returns
/// Six vertices per visible face, in chunk-local space.
pub fn build_mesh<S: VoxelSource + ?Sized>(source: &S) -> Vec<MeshVertex> {
    let [width, height, depth] = source.dimensions();
    let mut vertices = Vec::new();

    for x in 0..width {
        for y in 0..height {
            for z in 0..depth {
                let position = Point3::new(x, y, z);
                let block_type = source.block_at(position);
                if block_type == BlockType::Air {
                    continue;
                }

                for side in BlockFace::ALL {
                    if !is_face_hidden(source, position, side) {
                        vertices.extend(Face::new(position, block_type, side).vertices());
                    }
                }
            }
        }
    }

    vertices
}

/// Whether the neighbour behind `side` of the cell at `position` hides that face.
fn is_face_hidden<S: VoxelSource + ?Sized>(source: &S, position: Point3<i32>, side: BlockFace) -> bool {
    let neighbor = position + side.offset();
    if source.contains(neighbor) {
        source.block_at(neighbor).is_opaque()
    } else {
        source.is_opaque_across(side, neighbor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A standalone grid with nothing around it.
    struct Grid {
        dimensions: [i32; 3],
        blocks: Vec<BlockType>,
        opaque_outside: bool,
    }

    impl Grid {
        fn new(dimensions: [i32; 3], blocks: Vec<BlockType>) -> Self {
            assert_eq!(blocks.len() as i32, dimensions.iter().product::<i32>());
            Grid {
                dimensions,
                blocks,
                opaque_outside: false,
            }
        }
    }

    impl VoxelSource for Grid {
        fn dimensions(&self) -> [i32; 3] {
            self.dimensions
        }

        fn block_at(&self, local: Point3<i32>) -> BlockType {
            let [_, height, depth] = self.dimensions;
            self.blocks[((local.x * height + local.y) * depth + local.z) as usize]
        }

        fn is_opaque_across(&self, _face: BlockFace, _outside: Point3<i32>) -> bool {
            self.opaque_outside
        }
    }

    #[test]
    fn single_voxel_emits_six_faces() {
        let grid = Grid::new([1, 1, 1], vec![BlockType::Stone]);
        assert_eq!(build_mesh(&grid).len(), 36);
    }

    #[test]
    fn adjacent_opaque_voxels_share_no_faces() {
        let grid = Grid::new([2, 1, 1], vec![BlockType::Stone, BlockType::Stone]);
        assert_eq!(build_mesh(&grid).len(), 60);
    }

    #[test]
    fn air_emits_nothing() {
        let grid = Grid::new([2, 2, 2], vec![BlockType::Air; 8]);
        assert!(build_mesh(&grid).is_empty());
    }

    #[test]
    fn faces_next_to_translucent_blocks_stay_visible() {
        // Stone shows its face towards the leaves; the leaves hide theirs behind the stone.
        let grid = Grid::new([2, 1, 1], vec![BlockType::Stone, BlockType::Leaves]);
        assert_eq!(build_mesh(&grid).len(), (6 + 5) * 6);

        let grid = Grid::new([2, 1, 1], vec![BlockType::Water, BlockType::Water]);
        assert_eq!(build_mesh(&grid).len(), 12 * 6);
    }

    #[test]
    fn opaque_surroundings_hide_boundary_faces() {
        let mut grid = Grid::new([1, 1, 1], vec![BlockType::Dirt]);
        grid.opaque_outside = true;
        assert!(build_mesh(&grid).is_empty());
    }

    #[test]
    fn faces_follow_the_fixed_order_and_layout() {
        let grid = Grid::new([1, 1, 1], vec![BlockType::Grass]);
        let vertices = build_mesh(&grid);

        let top: Vec<[f32; 3]> = vertices[0..6].iter().map(|vertex| vertex.position).collect();
        assert_eq!(
            top,
            vec![
                [0.0, 1.0, 0.0],
                [1.0, 1.0, 0.0],
                [1.0, 1.0, 1.0],
                [0.0, 1.0, 0.0],
                [1.0, 1.0, 1.0],
                [0.0, 1.0, 1.0],
            ]
        );
        assert_eq!(vertices[0].tex_coords, [0.0, 0.0]);
        assert_eq!(vertices[6].tex_coords, [2.0, 0.0]);
        assert_eq!(vertices[12].tex_coords, [3.0, 0.0]);
        assert_eq!(vertices[35].position, [0.0, 1.0, 1.0]);
    }

    #[test]
    fn rebuilding_is_idempotent() {
        let blocks = (0..27)
            .map(|i| if i % 3 == 0 { BlockType::Air } else { BlockType::ALL[i % 9] })
            .collect();
        let grid = Grid::new([3, 3, 3], blocks);
        assert_eq!(build_mesh(&grid), build_mesh(&grid));
    }
}
