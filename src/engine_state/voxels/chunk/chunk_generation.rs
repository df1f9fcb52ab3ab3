//! # Chunk Generation Module
//!
//! Deterministic terrain generation. A chunk's initial grid is a pure function of its
//! coordinate: the same coordinate always yields the same grid, independent of which
//! chunks were generated before it.
//!
//! ## Layered terrain
//!
//! Each `(x, z)` column draws one value from a generator seeded by the chunk
//! coordinate and uses it to perturb a base surface height. Every cell is then
//! classified against that height into bedrock, deep stone, subsoil, surface or air.
//! A trigonometric density function carves caves below the surface, and cubic
//! chunks sprinkle a few floating stones just above it.

use std::marker::PhantomData;

use cgmath::Point3;
use noise::{NoiseFn, Perlin};
use serde::Deserialize;

use super::geometry::ChunkGeometry;
use crate::engine_state::voxels::block::block_type::BlockType;

/// Threshold above which Perlin noise is considered solid for terrain generation.
pub const PERLIN_POSITIVE_THRESHOLD: f64 = 0.2;
/// Threshold below which Perlin noise is considered solid for terrain generation.
pub const PERLIN_NEGATIVE_THRESHOLD: f64 = -0.2;
/// Scaling factor applied to world coordinates when sampling Perlin noise.
pub const PERLIN_SCALE_FACTOR: f64 = 0.02;

/// The method used to fill new chunks.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMethod {
    /// Height-classified layers with caves (the regular world).
    #[default]
    Layered,
    /// Thresholded 3-D Perlin noise.
    Perlin,
    /// Every cell is dirt.
    Solid,
    /// Every cell is air.
    Empty,
}

/// Which blocks the layered generator places in each layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TerrainPalette {
    /// The single top layer.
    pub surface: BlockType,
    /// The layer just below the surface.
    pub subsoil: BlockType,
    /// Everything deeper than the subsoil.
    pub deep: BlockType,
    /// The lowest boundary layer.
    pub bedrock: BlockType,
}

impl Default for TerrainPalette {
    fn default() -> Self {
        TerrainPalette {
            surface: BlockType::Grass,
            subsoil: BlockType::Dirt,
            deep: BlockType::Stone,
            bedrock: BlockType::Bedrock,
        }
    }
}

/// Tunable parameters of the layered generator.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TerrainConfig {
    /// Unperturbed surface height.
    pub base_height: f64,
    /// Maximum deviation of the surface from `base_height`, in either direction.
    pub amplitude: f64,
    /// Thickness of the subsoil layer.
    pub subsoil_depth: i32,
    /// World Y of the bedrock layer.
    pub bedrock_level: i32,
    /// Probability of a floating stone in the two cells above the surface.
    pub floating_chance: f64,
    /// Spatial frequency of the cave density function.
    pub cave_frequency: f64,
    /// Density above which a cell is carved out.
    pub cave_threshold: f64,
    /// Caves only open this far below the surface.
    pub cave_min_depth: f64,
    /// Blocks used for each layer.
    pub palette: TerrainPalette,
}

impl TerrainConfig {
    /// Defaults for 16x256x16 column chunks.
    pub fn column() -> Self {
        TerrainConfig {
            base_height: 64.0,
            amplitude: 10.0,
            subsoil_depth: 3,
            bedrock_level: 0,
            floating_chance: 0.0,
            cave_frequency: 0.1,
            cave_threshold: 0.6,
            cave_min_depth: 5.0,
            palette: TerrainPalette::default(),
        }
    }

    /// Defaults for 16x16x16 cubic chunks.
    pub fn cubic() -> Self {
        TerrainConfig {
            amplitude: 8.0,
            subsoil_depth: 10,
            bedrock_level: -64,
            floating_chance: 0.3,
            ..TerrainConfig::column()
        }
    }
}

/// Produces the initial grid of a chunk.
///
/// The generator holds no mutable state, so one instance can be shared by every
/// thread that creates chunks.
pub struct TerrainGenerator<G: ChunkGeometry> {
    method: GenerationMethod,
    config: TerrainConfig,
    perlin: Perlin,
    _geometry: PhantomData<fn() -> G>,
}

impl<G: ChunkGeometry> TerrainGenerator<G> {
    /// Creates a generator using the given method and layered-terrain parameters.
    pub fn new(method: GenerationMethod, config: TerrainConfig) -> Self {
        TerrainGenerator {
            method,
            config,
            perlin: Perlin::new(0),
            _geometry: PhantomData,
        }
    }

    /// Generates the full grid of the chunk at `coord`, in
    /// [`ChunkGeometry::index`] order.
    pub fn generate(&self, coord: G::Coord) -> Vec<BlockType> {
        match self.method {
            GenerationMethod::Layered => self.layered(coord),
            GenerationMethod::Perlin => self.perlin(coord),
            GenerationMethod::Solid => vec![BlockType::Dirt; G::volume()],
            GenerationMethod::Empty => vec![BlockType::Air; G::volume()],
        }
    }

    /// The cave density at a world position. Cells below the surface whose density
    /// exceeds `cave_threshold` are carved out.
    pub fn cave_density(&self, position: Point3<i32>) -> f64 {
        let frequency = self.config.cave_frequency;
        (position.x as f64 * frequency).sin()
            * (position.y as f64 * frequency).cos()
            * (position.z as f64 * frequency).sin()
    }

    fn layered(&self, coord: G::Coord) -> Vec<BlockType> {
        let config = &self.config;
        let palette = &config.palette;
        let origin = G::origin(coord);
        let mut rng = fastrand::Rng::with_seed(G::terrain_seed(coord));
        let mut blocks = vec![BlockType::Air; G::volume()];

        for x in 0..G::EDGE {
            for z in 0..G::EDGE {
                let noise = (rng.f64() * 2.0 - 1.0) * config.amplitude;
                let surface = config.base_height + noise;
                let height = surface.floor() as i32;

                for y in 0..G::HEIGHT {
                    let position = Point3::new(origin.x + x, origin.y + y, origin.z + z);

                    let mut block_type = if position.y == config.bedrock_level {
                        palette.bedrock
                    } else if position.y < height - config.subsoil_depth {
                        palette.deep
                    } else if position.y < height {
                        palette.subsoil
                    } else if position.y == height {
                        palette.surface
                    } else if config.floating_chance > 0.0
                        && (position.y as f64) < surface + 2.0
                        && rng.f64() < config.floating_chance
                    {
                        palette.deep
                    } else {
                        BlockType::Air
                    };

                    if block_type != BlockType::Air
                        && block_type != palette.bedrock
                        && (position.y as f64) < surface - config.cave_min_depth
                        && self.cave_density(position) > config.cave_threshold
                    {
                        block_type = BlockType::Air;
                    }

                    if let Some(index) = G::index(Point3::new(x, y, z)) {
                        blocks[index] = block_type;
                    }
                }
            }
        }

        blocks
    }

    fn perlin(&self, coord: G::Coord) -> Vec<BlockType> {
        let origin = G::origin(coord);
        let mut blocks = vec![BlockType::Air; G::volume()];

        for x in 0..G::EDGE {
            for y in 0..G::HEIGHT {
                for z in 0..G::EDGE {
                    let sample = self.perlin.get([
                        (origin.x + x) as f64 * PERLIN_SCALE_FACTOR,
                        (origin.y + y) as f64 * PERLIN_SCALE_FACTOR,
                        (origin.z + z) as f64 * PERLIN_SCALE_FACTOR,
                    ]);
                    if !(PERLIN_NEGATIVE_THRESHOLD..=PERLIN_POSITIVE_THRESHOLD).contains(&sample) {
                        if let Some(index) = G::index(Point3::new(x, y, z)) {
                            blocks[index] = BlockType::Stone;
                        }
                    }
                }
            }
        }

        blocks
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Point2;

    use super::*;
    use crate::engine_state::voxels::chunk::geometry::{Column, Cubic};

    fn column_generator() -> TerrainGenerator<Column> {
        TerrainGenerator::new(GenerationMethod::Layered, TerrainConfig::column())
    }

    fn column_at(blocks: &[BlockType], x: i32, z: i32) -> Vec<BlockType> {
        (0..Column::HEIGHT)
            .map(|y| blocks[Column::index(Point3::new(x, y, z)).unwrap()])
            .collect()
    }

    #[test]
    fn same_coordinate_generates_identical_grids() {
        let generator = column_generator();
        let coord = Point2::new(-3, 7);
        let first = generator.generate(coord);
        generator.generate(Point2::new(100, 100));
        assert_eq!(first, generator.generate(coord));

        let cubic = TerrainGenerator::<Cubic>::new(GenerationMethod::Layered, TerrainConfig::cubic());
        let coord = Point3::new(2, 4, -1);
        assert_eq!(cubic.generate(coord), cubic.generate(coord));
    }

    #[test]
    fn separate_generators_agree() {
        let coord = Point2::new(5, -9);
        assert_eq!(
            column_generator().generate(coord),
            column_generator().generate(coord)
        );
    }

    #[test]
    fn columns_are_layered_from_bedrock_to_grass() {
        let blocks = column_generator().generate(Point2::new(0, 0));
        assert_eq!(blocks.len(), Column::volume());

        for x in 0..Column::EDGE {
            for z in 0..Column::EDGE {
                let column = column_at(&blocks, x, z);
                assert_eq!(column[0], BlockType::Bedrock);

                let surface = column
                    .iter()
                    .rposition(|block| *block != BlockType::Air)
                    .unwrap() as i32;
                assert!((54..=74).contains(&surface), "surface at {surface}");
                assert_eq!(column[surface as usize], BlockType::Grass);
                for y in (surface - 3)..surface {
                    assert_eq!(column[y as usize], BlockType::Dirt);
                }
                assert!(column[(surface as usize + 1)..].iter().all(|b| *b == BlockType::Air));
            }
        }
    }

    #[test]
    fn caves_only_open_where_density_exceeds_the_threshold() {
        let generator = column_generator();
        let coord = Point2::new(1, 2);
        let origin = Column::origin(coord);
        let blocks = generator.generate(coord);

        for x in 0..Column::EDGE {
            for z in 0..Column::EDGE {
                for y in 1..40 {
                    let index = Column::index(Point3::new(x, y, z)).unwrap();
                    let position = Point3::new(origin.x + x, y, origin.z + z);
                    let carved = generator.cave_density(position) > 0.6;
                    assert_eq!(blocks[index] == BlockType::Air, carved);
                }
            }
        }
    }

    #[test]
    fn custom_palette_replaces_layers() {
        let config = TerrainConfig {
            palette: TerrainPalette {
                surface: BlockType::Sand,
                ..TerrainPalette::default()
            },
            ..TerrainConfig::column()
        };
        let blocks = TerrainGenerator::<Column>::new(GenerationMethod::Layered, config)
            .generate(Point2::new(0, 0));
        assert!(blocks.contains(&BlockType::Sand));
        assert!(!blocks.contains(&BlockType::Grass));
    }

    #[test]
    fn empty_and_solid_fill_every_cell() {
        let empty = TerrainGenerator::<Cubic>::new(GenerationMethod::Empty, TerrainConfig::cubic())
            .generate(Point3::new(0, 0, 0));
        assert!(empty.iter().all(|block| *block == BlockType::Air));

        let solid = TerrainGenerator::<Cubic>::new(GenerationMethod::Solid, TerrainConfig::cubic())
            .generate(Point3::new(0, 0, 0));
        assert_eq!(solid.len(), 16 * 16 * 16);
        assert!(solid.iter().all(|block| *block == BlockType::Dirt));
    }

    #[test]
    fn cubic_chunks_far_above_the_surface_are_empty() {
        let generator = TerrainGenerator::<Cubic>::new(GenerationMethod::Layered, TerrainConfig::cubic());
        let blocks = generator.generate(Point3::new(0, 10, 0));
        assert!(blocks.iter().all(|block| *block == BlockType::Air));
    }

    #[test]
    fn perlin_is_deterministic() {
        let generator = TerrainGenerator::<Cubic>::new(GenerationMethod::Perlin, TerrainConfig::cubic());
        let coord = Point3::new(3, -1, 2);
        assert_eq!(generator.generate(coord), generator.generate(coord));
    }
}
