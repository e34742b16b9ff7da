//! TOML configuration aggregating every tunable of a session.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use strata_core::{BlockCatalog, CatalogError};
use strata_system_entity_ai::Config as AiConfig;
use strata_system_terrain::TerrainParams;
use strata_world::WorldConfig;
use thiserror::Error;

/// Failures raised while loading a session configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration or catalog file could not be read.
    #[error("failed to read {}", path.display())]
    Read {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The configuration table is malformed.
    #[error("malformed session configuration: {0}")]
    Parse(#[from] toml::de::Error),
    /// The configured block catalog is invalid.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    /// The world grid would hold no tiles.
    #[error("world grid must have at least one column and one row, got {columns}x{rows}")]
    EmptyGrid {
        /// Configured column count.
        columns: u32,
        /// Configured row count.
        rows: u32,
    },
}

/// Every parameter needed to build a session.
///
/// Missing tables and keys fall back to their defaults, so an empty document
/// describes the stock game.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// World seed driving terrain and every AI random stream.
    pub seed: u32,
    /// Grid dimensions, player loadout, combat and physics constants.
    pub world: WorldConfig,
    /// Terrain generation parameters.
    pub terrain: TerrainParams,
    /// Mob behaviour and spawn parameters.
    pub ai: AiConfig,
    /// Block catalog replacing the built-in table.
    pub catalog: Option<PathBuf>,
}

impl SessionConfig {
    /// Parses a configuration document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects parameter combinations no world can be built from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (columns, rows) = (self.world.columns, self.world.rows);
        if columns == 0 || rows == 0 {
            return Err(ConfigError::EmptyGrid { columns, rows });
        }
        Ok(())
    }

    /// Reads and parses the configuration stored at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = read(path)?;
        Self::from_toml_str(&source)
    }

    /// Loads the configured catalog, or the built-in one when none is set.
    pub fn block_catalog(&self) -> Result<BlockCatalog, ConfigError> {
        match &self.catalog {
            Some(path) => Ok(BlockCatalog::from_toml_str(&read(path)?)?),
            None => Ok(BlockCatalog::builtin()?),
        }
    }
}

fn read(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_the_stock_game() {
        let config = SessionConfig::from_toml_str("").expect("empty document parses");
        assert_eq!(config, SessionConfig::default());
        assert_eq!(config.world.columns, 20);
        assert_eq!(config.ai.max_enemies, 5);
    }

    #[test]
    fn partial_tables_keep_remaining_defaults() {
        let config = SessionConfig::from_toml_str(
            r#"
            seed = 42

            [world]
            columns = 64
            reach = 5

            [world.physics]
            gravity = 1.0

            [ai]
            enemy_spawn_chance = 0.25
            "#,
        )
        .expect("partial document parses");

        assert_eq!(config.seed, 42);
        assert_eq!(config.world.columns, 64);
        assert_eq!(config.world.reach, 5);
        assert_eq!(config.world.rows, 30);
        assert_eq!(config.world.physics.gravity, 1.0);
        assert_eq!(config.world.physics.walk_speed, 5.0);
        assert_eq!(config.ai.enemy_spawn_chance, 0.25);
        assert_eq!(config.ai.max_passive, 5);
        assert_eq!(config.terrain, TerrainParams::default());
    }

    #[test]
    fn wrong_types_are_reported() {
        let error = SessionConfig::from_toml_str("seed = \"forty\"").unwrap_err();
        assert!(matches!(error, ConfigError::Parse(_)));
    }

    #[test]
    fn empty_grids_are_rejected() {
        let error = SessionConfig::from_toml_str("[world]\nrows = 0").unwrap_err();
        assert!(matches!(
            error,
            ConfigError::EmptyGrid {
                columns: 20,
                rows: 0
            }
        ));
    }

    #[test]
    fn missing_catalog_file_names_the_path() {
        let config = SessionConfig {
            catalog: Some(PathBuf::from("/nonexistent/strata-catalog.toml")),
            ..SessionConfig::default()
        };
        let error = config.block_catalog().unwrap_err();
        assert!(error.to_string().contains("strata-catalog.toml"));
    }
}
