//! # Block Face Module
//!
//! This module defines the six axis-aligned faces of a voxel block and the unit
//! offset that leads from a cell to the neighbour behind each face.

use cgmath::Vector3;

/// One of the six faces of a voxel block.
///
/// The discriminant is the face's position in [`BlockFace::ALL`], which is also the
/// order the mesher evaluates faces in and the column order of the texture table.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockFace {
    /// The top face (facing positive Y)
    Top = 0,

    /// The bottom face (facing negative Y)
    Bottom = 1,

    /// The north face (facing negative Z)
    North = 2,

    /// The south face (facing positive Z)
    South = 3,

    /// The east face (facing positive X)
    East = 4,

    /// The west face (facing negative X)
    West = 5,
}

impl BlockFace {
    /// All six faces in evaluation order: Top, Bottom, North, South, East, West.
    pub const ALL: [BlockFace; 6] = [
        BlockFace::Top,
        BlockFace::Bottom,
        BlockFace::North,
        BlockFace::South,
        BlockFace::East,
        BlockFace::West,
    ];

    /// The unit offset from a cell to the cell behind this face.
    pub fn offset(self) -> Vector3<i32> {
        match self {
            BlockFace::Top => Vector3::new(0, 1, 0),
            BlockFace::Bottom => Vector3::new(0, -1, 0),
            BlockFace::North => Vector3::new(0, 0, -1),
            BlockFace::South => Vector3::new(0, 0, 1),
            BlockFace::East => Vector3::new(1, 0, 0),
            BlockFace::West => Vector3::new(-1, 0, 0),
        }
    }

    /// Whether this face points along the vertical axis.
    pub fn is_vertical(self) -> bool {
        matches!(self, BlockFace::Top | BlockFace::Bottom)
    }
}
