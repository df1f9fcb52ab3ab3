//! # Block Module
//!
//! This module provides the block catalog for the voxel engine: block type
//! definitions, block faces, and the texture cell each block shows on each face.

use cgmath::Point3;

use block_face::BlockFace;
use block_type::BlockType;

pub mod block_face;
pub mod block_type;

/// The underlying integer type used to represent block types in chunk grids.
pub type BlockTypeSize = u8;

/// A `(u, v)` cell in the block texture atlas.
pub type TextureCell = [u8; 2];

/// Maps each block type to its texture atlas cell for each face.
///
/// The outer array is indexed by `BlockType` as a `usize`.
/// The inner array is indexed by `BlockFace` in the order:
/// [Top, Bottom, North, South, East, West]
pub static BLOCK_TYPE_TO_TEXTURE_CELLS: [[TextureCell; 6]; 9] = [
    [[0, 0]; 6],                                      // AIR
    [[0, 0], [2, 0], [3, 0], [3, 0], [3, 0], [3, 0]], // GRASS (top, bottom, sides)
    [[2, 0]; 6],                                      // DIRT
    [[1, 0]; 6],                                      // STONE
    [[2, 1]; 6],                                      // SAND
    [[0, 1]; 6],                                      // WATER
    [[4, 0]; 6],                                      // WOOD
    [[4, 1]; 6],                                      // LEAVES
    [[1, 1]; 6],                                      // BEDROCK
];

/// Gets the atlas cell a block type shows on the given face.
pub fn texture_cell(block_type: BlockType, face: BlockFace) -> TextureCell {
    BLOCK_TYPE_TO_TEXTURE_CELLS[block_type as usize][face as usize]
}

/// A block as seen from world space.
///
/// Chunks store only compact block ids; the world position is derived from the
/// owning chunk coordinate and the cell index whenever a `Voxel` is handed out.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Voxel {
    /// The type of this block.
    pub block_type: BlockType,
    /// The world-space position of this block.
    pub position: Point3<i32>,
}

impl Voxel {
    /// Creates a voxel of the given type at a world position.
    pub fn new(block_type: BlockType, position: Point3<i32>) -> Self {
        Voxel {
            block_type,
            position,
        }
    }

    /// Whether this voxel is solid.
    pub fn is_solid(&self) -> bool {
        self.block_type.is_solid()
    }

    /// Whether this voxel is opaque.
    pub fn is_opaque(&self) -> bool {
        self.block_type.is_opaque()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grass_has_distinct_top_bottom_and_sides() {
        assert_eq!(texture_cell(BlockType::Grass, BlockFace::Top), [0, 0]);
        assert_eq!(texture_cell(BlockType::Grass, BlockFace::Bottom), [2, 0]);
        for face in [BlockFace::North, BlockFace::South, BlockFace::East, BlockFace::West] {
            assert_eq!(texture_cell(BlockType::Grass, face), [3, 0]);
        }
    }

    #[test]
    fn uniform_blocks_use_one_cell() {
        for face in BlockFace::ALL {
            assert_eq!(texture_cell(BlockType::Stone, face), [1, 0]);
            assert_eq!(texture_cell(BlockType::Bedrock, face), [1, 1]);
        }
    }
}
