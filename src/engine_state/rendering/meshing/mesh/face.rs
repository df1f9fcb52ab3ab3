use cgmath::{Point3, Vector3};

use crate::engine_state::{
    rendering::MeshVertex,
    voxels::block::{block_face::BlockFace, block_type::BlockType, texture_cell, TextureCell},
};

/// Corner offsets from a cell's minimum corner, two triangles per
/// face, indexed by `BlockFace`.
const FACE_CORNERS: [[[i32; 3]; 6]; 6] = [
    // TOP
    [[0, 1, 0], [1, 1, 0], [1, 1, 1], [0, 1, 0], [1, 1, 1], [0, 1, 1]],
    // BOTTOM
    [[0, 0, 0], [1, 0, 1], [1, 0, 0], [0, 0, 0], [0, 0, 1], [1, 0, 1]],
    // NORTH
    [[0, 0, 0], [0, 1, 0], [1, 1, 0], [0, 0, 0], [1, 1, 0], [1, 0, 0]],
    // SOUTH
    [[0, 0, 1], [1, 1, 1], [0, 1, 1], [0, 0, 1], [1, 0, 1], [1, 1, 1]],
    // EAST
    [[1, 0, 0], [1, 1, 0], [1, 1, 1], [1, 0, 0], [1, 1, 1], [1, 0, 1]],
    // WEST
    [[0, 0, 0], [0, 1, 1], [0, 1, 0], [0, 0, 0], [0, 0, 1], [0, 1, 1]],
];

/// Represents a single visible face of a voxel in the mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    /// Minimum corner of the cell in chunk coordinates
    pub origin: Point3<i32>,
    /// Which side of the block this face represents
    pub side: BlockFace,
    /// Atlas cell drawn on the face
    pub cell: TextureCell,
}

impl Face {
    /// Creates a new face for a voxel at the given coordinates.
    ///
    /// # Arguments
    /// * `origin` - The coordinates of the voxel in chunk space
    /// * `block_type` - The type of the block, used for texture mapping
    /// * `side` - Which side of the block this face represents
    pub fn new(origin: Point3<i32>, block_type: BlockType, side: BlockFace) -> Self {
        Face {
            origin,
            side,
            cell: texture_cell(block_type, side),
        }
    }

    /// The six vertices drawing this face as two triangles.
    pub fn vertices(&self) -> [MeshVertex; 6] {
        FACE_CORNERS[self.side as usize].map(|[x, y, z]| {
            MeshVertex::new(self.origin + Vector3::new(x, y, z), self.cell)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_corner_lies_on_the_face_plane() {
        for side in BlockFace::ALL {
            let face = Face::new(Point3::new(0, 0, 0), BlockType::Stone, side);
            let offset = side.offset();
            for vertex in face.vertices() {
                let [x, y, z] = vertex.position;
                // The plane sits at 1 along a positive normal and at 0 along a negative one.
                let coordinate = match (offset.x, offset.y, offset.z) {
                    (0, 0, _) => z,
                    (0, _, 0) => y,
                    _ => x,
                };
                let expected = if offset.x + offset.y + offset.z > 0 { 1.0 } else { 0.0 };
                assert_eq!(coordinate, expected, "{:?}", side);
            }
        }
    }

    #[test]
    fn each_face_covers_four_distinct_corners() {
        for side in BlockFace::ALL {
            let face = Face::new(Point3::new(0, 0, 0), BlockType::Dirt, side);
            let mut corners: Vec<[i32; 3]> = face
                .vertices()
                .iter()
                .map(|vertex| vertex.position.map(|c| c as i32))
                .collect();
            corners.sort();
            corners.dedup();
            assert_eq!(corners.len(), 4, "{:?}", side);
        }
    }

    #[test]
    fn vertices_carry_the_face_texture_cell() {
        let face = Face::new(Point3::new(2, 3, 4), BlockType::Grass, BlockFace::Bottom);
        for vertex in face.vertices() {
            assert_eq!(vertex.tex_coords, [2.0, 0.0]);
        }
        assert_eq!(face.vertices()[0].position, [2.0, 3.0, 4.0]);
    }
}
