//! # Block Type Module
//!
//! This module defines the closed set of block types in the voxel world together with
//! their static attributes. It provides conversion from numeric ids and from the
//! lowercase names used in configuration files.

use std::fmt;

use num_derive::FromPrimitive;
use serde::{de, Deserialize, Deserializer};

use super::BlockTypeSize;

/// Enumerates all possible block types in the voxel world.
///
/// The discriminant is the compact id stored in chunk grids. The `FromPrimitive`
/// derive allows conversion back from that id.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockType {
    /// Empty space. Never solid, never opaque.
    #[default]
    Air = 0,

    /// Grass with distinct top, bottom and side textures.
    Grass = 1,

    /// Plain dirt, used as subsoil by the terrain generator.
    Dirt = 2,

    /// Stone, the deep layer of generated terrain.
    Stone = 3,

    /// Sand.
    Sand = 4,

    /// Water. Not solid and not opaque, so faces behind it stay visible.
    Water = 5,

    /// A wooden log.
    Wood = 6,

    /// Leaves are solid but let light (and faces) through.
    Leaves = 7,

    /// The indestructible lowest layer of generated terrain.
    Bedrock = 8,
}

/// Lookup table from lowercase block name to block type.
static BLOCK_TYPE_NAMES: phf::Map<&'static str, BlockType> = phf::phf_map! {
    "air" => BlockType::Air,
    "grass" => BlockType::Grass,
    "dirt" => BlockType::Dirt,
    "stone" => BlockType::Stone,
    "sand" => BlockType::Sand,
    "water" => BlockType::Water,
    "wood" => BlockType::Wood,
    "leaves" => BlockType::Leaves,
    "bedrock" => BlockType::Bedrock,
};

/// Every accepted block name, in id order. Used for deserialization errors.
const BLOCK_TYPE_NAME_LIST: &[&str] = &[
    "air", "grass", "dirt", "stone", "sand", "water", "wood", "leaves", "bedrock",
];

impl BlockType {
    /// All block types in id order.
    pub const ALL: [BlockType; 9] = [
        BlockType::Air,
        BlockType::Grass,
        BlockType::Dirt,
        BlockType::Stone,
        BlockType::Sand,
        BlockType::Water,
        BlockType::Wood,
        BlockType::Leaves,
        BlockType::Bedrock,
    ];

    /// Converts a stored id back to a `BlockType`.
    ///
    /// Unknown ids resolve to `BlockType::Air` rather than failing, so a corrupted
    /// cell degrades to empty space.
    pub fn from_id(id: BlockTypeSize) -> Self {
        num::FromPrimitive::from_u8(id).unwrap_or(BlockType::Air)
    }

    /// The compact id of this block type.
    pub fn id(self) -> BlockTypeSize {
        self as BlockTypeSize
    }

    /// Resolves a block name (case-insensitive) to a block type.
    ///
    /// # Examples
    ///
    /// ```
    /// use voxel_chunks::BlockType;
    ///
    /// assert_eq!(BlockType::from_name("Stone"), Some(BlockType::Stone));
    /// assert_eq!(BlockType::from_name("lava"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        BLOCK_TYPE_NAMES
            .get(name.to_ascii_lowercase().as_str())
            .copied()
    }

    /// The lowercase name of this block type.
    pub fn name(self) -> &'static str {
        BLOCK_TYPE_NAME_LIST[self as usize]
    }

    /// Whether entities collide with this block.
    pub fn is_solid(self) -> bool {
        !matches!(self, BlockType::Air | BlockType::Water)
    }

    /// Whether this block hides the faces of its neighbours.
    pub fn is_opaque(self) -> bool {
        !matches!(self, BlockType::Air | BlockType::Water | BlockType::Leaves)
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl<'de> Deserialize<'de> for BlockType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        BlockType::from_name(&name)
            .ok_or_else(|| de::Error::unknown_variant(&name, BLOCK_TYPE_NAME_LIST))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn air_is_neither_solid_nor_opaque() {
        assert!(!BlockType::Air.is_solid());
        assert!(!BlockType::Air.is_opaque());
    }

    #[test]
    fn leaves_are_solid_but_not_opaque() {
        assert!(BlockType::Leaves.is_solid());
        assert!(!BlockType::Leaves.is_opaque());
        assert!(!BlockType::Water.is_solid());
    }

    #[test]
    fn ids_round_trip_and_unknown_ids_are_air() {
        for block_type in BlockType::ALL {
            assert_eq!(BlockType::from_id(block_type.id()), block_type);
        }
        assert_eq!(BlockType::from_id(200), BlockType::Air);
    }

    #[test]
    fn names_resolve_case_insensitively() {
        for block_type in BlockType::ALL {
            assert_eq!(BlockType::from_name(block_type.name()), Some(block_type));
        }
        assert_eq!(BlockType::from_name("BEDROCK"), Some(BlockType::Bedrock));
        assert_eq!(BlockType::from_name("obsidian"), None);
    }

    #[test]
    fn deserializes_from_name() {
        let block_type: BlockType = serde_json::from_str("\"sand\"").unwrap();
        assert_eq!(block_type, BlockType::Sand);
        assert!(serde_json::from_str::<BlockType>("\"lava\"").is_err());
    }
}
