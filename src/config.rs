//! # Configuration
//!
//! World settings, read from JSON. Every field is optional; a missing field keeps its
//! default.
//!
//! ```json
//! {
//!     "generation": "layered",
//!     "terrain": { "amplitude": 4.0, "palette": { "surface": "sand" } },
//!     "unloaded_neighbors": "opaque",
//!     "rebuild_interval_ms": 16
//! }
//! ```

use std::{fs, path::Path, time::Duration};

use log::info;
use serde::Deserialize;

use crate::{
    engine_state::voxels::chunk::{
        chunk_generation::{GenerationMethod, TerrainConfig, TerrainPalette},
        geometry::ChunkGeometry,
    },
    error::EngineError,
};

/// Default pause of the rebuild worker between two chunks, in milliseconds.
pub const DEFAULT_REBUILD_INTERVAL_MS: u64 = 16;

/// How the mesher treats a face on the chunk border when the chunk behind it is not
/// loaded.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnloadedNeighborPolicy {
    /// Hide the face. When the neighbour loads, this chunk is rebuilt with the real data.
    #[default]
    Opaque,
    /// Show the face.
    Transparent,
    /// Generate the neighbour on the spot and look at its terrain. Chunks generated this
    /// way are not queued for a rebuild of their own.
    Generate,
}

/// Optional overrides of the layered terrain parameters.
///
/// Unset fields fall back to the defaults of the chunk geometry in use.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TerrainOverrides {
    /// Replaces `TerrainConfig::base_height`.
    pub base_height: Option<f64>,
    /// Replaces `TerrainConfig::amplitude`.
    pub amplitude: Option<f64>,
    /// Replaces `TerrainConfig::subsoil_depth`.
    pub subsoil_depth: Option<i32>,
    /// Replaces `TerrainConfig::bedrock_level`.
    pub bedrock_level: Option<i32>,
    /// Replaces `TerrainConfig::floating_chance`.
    pub floating_chance: Option<f64>,
    /// Replaces `TerrainConfig::cave_frequency`.
    pub cave_frequency: Option<f64>,
    /// Replaces `TerrainConfig::cave_threshold`.
    pub cave_threshold: Option<f64>,
    /// Replaces `TerrainConfig::cave_min_depth`.
    pub cave_min_depth: Option<f64>,
    /// Replaces `TerrainConfig::palette`.
    pub palette: Option<TerrainPalette>,
}

impl TerrainOverrides {
    /// Applies the overrides on top of `defaults`.
    pub fn apply(&self, defaults: TerrainConfig) -> TerrainConfig {
        TerrainConfig {
            base_height: self.base_height.unwrap_or(defaults.base_height),
            amplitude: self.amplitude.unwrap_or(defaults.amplitude),
            subsoil_depth: self.subsoil_depth.unwrap_or(defaults.subsoil_depth),
            bedrock_level: self.bedrock_level.unwrap_or(defaults.bedrock_level),
            floating_chance: self.floating_chance.unwrap_or(defaults.floating_chance),
            cave_frequency: self.cave_frequency.unwrap_or(defaults.cave_frequency),
            cave_threshold: self.cave_threshold.unwrap_or(defaults.cave_threshold),
            cave_min_depth: self.cave_min_depth.unwrap_or(defaults.cave_min_depth),
            palette: self.palette.unwrap_or(defaults.palette),
        }
    }
}

/// Settings for a [`World`](crate::World) and its rebuild worker.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldConfig {
    /// How new chunks are filled.
    pub generation: GenerationMethod,
    /// Overrides of the layered terrain parameters.
    pub terrain: TerrainOverrides,
    /// Meshing behaviour at the border of the loaded area.
    pub unloaded_neighbors: UnloadedNeighborPolicy,
    /// Pause of the rebuild worker after each chunk.
    pub rebuild_interval_ms: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            generation: GenerationMethod::default(),
            terrain: TerrainOverrides::default(),
            unloaded_neighbors: UnloadedNeighborPolicy::default(),
            rebuild_interval_ms: DEFAULT_REBUILD_INTERVAL_MS,
        }
    }
}

impl WorldConfig {
    /// Parses a configuration from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let config = Self::from_json_str(&fs::read_to_string(path)?)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// The rebuild worker's pause between chunks.
    pub fn rebuild_interval(&self) -> Duration {
        Duration::from_millis(self.rebuild_interval_ms)
    }

    /// The terrain parameters for geometry `G`, overrides applied.
    pub fn terrain_for<G: ChunkGeometry>(&self) -> TerrainConfig {
        self.terrain.apply(G::default_terrain())
    }

    /// Sets the generation method.
    pub fn with_generation(mut self, generation: GenerationMethod) -> Self {
        self.generation = generation;
        self
    }

    /// Sets the unloaded-neighbour policy.
    pub fn with_unloaded_neighbors(mut self, policy: UnloadedNeighborPolicy) -> Self {
        self.unloaded_neighbors = policy;
        self
    }

    /// Sets the rebuild worker's pause between chunks.
    ///
    /// Intervals longer than `u64::MAX` milliseconds saturate.
    pub fn with_rebuild_interval(mut self, interval: Duration) -> Self {
        self.rebuild_interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Replaces the terrain overrides.
    pub fn with_terrain(mut self, terrain: TerrainOverrides) -> Self {
        self.terrain = terrain;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::{
        block::block_type::BlockType,
        chunk::geometry::{Column, Cubic},
    };

    #[test]
    fn empty_json_gives_defaults() {
        let config = WorldConfig::from_json_str("{}").unwrap();
        assert_eq!(config, WorldConfig::default());
        assert_eq!(config.rebuild_interval(), Duration::from_millis(16));
        assert_eq!(config.unloaded_neighbors, UnloadedNeighborPolicy::Opaque);
        assert_eq!(config.generation, GenerationMethod::Layered);
    }

    #[test]
    fn overrides_apply_per_geometry() {
        let config = WorldConfig::from_json_str(
            r#"{
                "generation": "perlin",
                "terrain": { "amplitude": 2.5, "palette": { "surface": "sand" } },
                "unloaded_neighbors": "generate",
                "rebuild_interval_ms": 0
            }"#,
        )
        .unwrap();

        assert_eq!(config.generation, GenerationMethod::Perlin);
        assert_eq!(config.unloaded_neighbors, UnloadedNeighborPolicy::Generate);
        assert_eq!(config.rebuild_interval(), Duration::ZERO);

        let column = config.terrain_for::<Column>();
        assert_eq!(column.amplitude, 2.5);
        assert_eq!(column.subsoil_depth, 3);
        assert_eq!(column.palette.surface, BlockType::Sand);
        assert_eq!(column.palette.subsoil, BlockType::Dirt);

        let cubic = config.terrain_for::<Cubic>();
        assert_eq!(cubic.amplitude, 2.5);
        assert_eq!(cubic.bedrock_level, -64);
    }

    #[test]
    fn builders_set_their_fields() {
        let config = WorldConfig::default()
            .with_rebuild_interval(Duration::from_micros(2_500))
            .with_terrain(TerrainOverrides {
                bedrock_level: Some(5),
                ..TerrainOverrides::default()
            });
        assert_eq!(config.rebuild_interval_ms, 2);
        assert_eq!(config.terrain_for::<Column>().bedrock_level, 5);

        let config = WorldConfig::default().with_rebuild_interval(Duration::MAX);
        assert_eq!(config.rebuild_interval_ms, u64::MAX);
        assert_eq!(config.rebuild_interval(), Duration::from_millis(u64::MAX));
    }

    #[test]
    fn rejects_unknown_fields_and_values() {
        assert!(matches!(
            WorldConfig::from_json_str(r#"{ "chunk_size": 32 }"#),
            Err(EngineError::Config(_))
        ));
        assert!(WorldConfig::from_json_str(r#"{ "generation": "fractal" }"#).is_err());
        assert!(WorldConfig::from_json_str(r#"{ "terrain": { "palette": { "deep": "lava" } } }"#)
            .is_err());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            WorldConfig::from_path("/nonexistent/voxel-chunks.json"),
            Err(EngineError::Io(_))
        ));
    }

    #[test]
    fn reads_a_file() {
        let path = std::env::temp_dir().join(format!("voxel-chunks-{}.json", std::process::id()));
        fs::write(&path, r#"{ "generation": "empty" }"#).unwrap();
        let config = WorldConfig::from_path(&path);
        fs::remove_file(&path).unwrap();
        assert_eq!(config.unwrap().generation, GenerationMethod::Empty);
    }
}
