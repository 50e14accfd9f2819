//! Configuration management
//!
//! This module handles loading, validation, and defaults for the engine's
//! TOML configuration.

use crate::error::{GeosiftError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod validator;

pub use validator::ConfigValidator;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub storage: StorageConfig,
    pub embedding: EmbeddingConfig,
    pub ranking: RankingConfig,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the snapshot; a leading `~` is expanded
    pub data_dir: PathBuf,
    /// Snapshot file name inside `data_dir`
    pub snapshot_file: String,
}

/// Embedding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    pub model: String,
}

/// Fusion weights for hybrid scoring and the synonym credit used by the
/// semantic signal. Documents re-rank under new values immediately; only a
/// model change requires re-ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Weight of the whole-document cosine score
    pub full_text_weight: f32,
    /// Weight of the well_info section cosine score
    pub well_info_weight: f32,
    /// Weight of the technical_data section cosine score
    pub technical_weight: f32,
    /// Weight of the query-token overlap score
    pub keyword_weight: f32,
    /// Weight of the synonym-aware occurrence score
    pub semantic_weight: f32,
    /// Credit earned when only a synonym of a query token occurs
    pub synonym_credit: f32,
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(GeosiftError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| GeosiftError::Io {
            source: e,
            context: format!("Failed to read config file: {:?}", path),
        })?;
        let mut config: Config = toml::from_str(&content)?;

        // Apply environment variable overrides
        config.apply_env_overrides();

        // Validate configuration
        ConfigValidator::validate(&config)?;

        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| GeosiftError::Io {
            source: e,
            context: format!("Failed to write config file: {:?}", path),
        })?;
        Ok(())
    }

    /// Apply environment variable overrides
    /// Environment variables in format: GEOSIFT_SECTION__KEY=value
    pub fn apply_env_overrides(&mut self) {
        for (key, value) in std::env::vars() {
            if let Some(config_key) = key.strip_prefix("GEOSIFT_") {
                if let Err(e) = self.set_value_from_env(config_key, &value) {
                    tracing::warn!("Failed to apply env override {}: {}", key, e);
                }
            }
        }
    }

    fn set_value_from_env(&mut self, path: &str, value: &str) -> Result<()> {
        match path {
            "STORAGE__DATA_DIR" => {
                self.storage.data_dir = PathBuf::from(value);
            }
            "STORAGE__SNAPSHOT_FILE" => {
                self.storage.snapshot_file = value.to_string();
            }
            "EMBEDDING__MODEL" => {
                self.embedding.model = value.to_string();
            }
            "RANKING__FULL_TEXT_WEIGHT" => {
                self.ranking.full_text_weight = parse_weight(path, value)?;
            }
            "RANKING__WELL_INFO_WEIGHT" => {
                self.ranking.well_info_weight = parse_weight(path, value)?;
            }
            "RANKING__TECHNICAL_WEIGHT" => {
                self.ranking.technical_weight = parse_weight(path, value)?;
            }
            "RANKING__KEYWORD_WEIGHT" => {
                self.ranking.keyword_weight = parse_weight(path, value)?;
            }
            "RANKING__SEMANTIC_WEIGHT" => {
                self.ranking.semantic_weight = parse_weight(path, value)?;
            }
            "RANKING__SYNONYM_CREDIT" => {
                self.ranking.synonym_credit = parse_weight(path, value)?;
            }
            _ => {
                tracing::debug!("Unknown env config key: {}", path);
            }
        }
        Ok(())
    }

    /// Get the default configuration file path
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| GeosiftError::Config("Cannot determine config directory".to_string()))?;

        Ok(config_dir.join("geosift").join("config.toml"))
    }

    /// Get the default data directory
    pub fn default_data_dir() -> Result<PathBuf> {
        let home_dir = dirs::home_dir()
            .ok_or_else(|| GeosiftError::Config("Cannot determine home directory".to_string()))?;

        Ok(home_dir.join(".geosift"))
    }

    /// Full path of the snapshot file, with `~` expanded
    pub fn snapshot_path(&self) -> Result<PathBuf> {
        Ok(expand_path(&self.storage.data_dir)?.join(&self.storage.snapshot_file))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageConfig {
                data_dir: PathBuf::from("~/.geosift"),
                snapshot_file: "knowledge.snapshot".to_string(),
            },
            embedding: EmbeddingConfig {
                model: "all-MiniLM-L6-v2".to_string(),
            },
            ranking: RankingConfig::default(),
        }
    }
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            full_text_weight: 0.4,
            well_info_weight: 0.2,
            technical_weight: 0.2,
            keyword_weight: 0.1,
            semantic_weight: 0.1,
            synonym_credit: 0.5,
        }
    }
}

fn parse_weight(path: &str, value: &str) -> Result<f32> {
    value.parse().map_err(|_| {
        GeosiftError::Config(format!("Cannot parse '{}' as a number for {}", value, path))
    })
}

/// Expand a leading `~` to the user's home directory
pub fn expand_path(path: &Path) -> Result<PathBuf> {
    match path.strip_prefix("~") {
        Ok(stripped) => {
            let home_dir = dirs::home_dir().ok_or_else(|| {
                GeosiftError::Config("Cannot determine home directory".to_string())
            })?;
            Ok(home_dir.join(stripped))
        }
        Err(_) => Ok(path.to_path_buf()),
    }
}
