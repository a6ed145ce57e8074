//! Engine configuration
//!
//! Loaded from YAML. Every field has a default, so an empty document is valid.
//! Risk weights and thresholds are fixed constants and intentionally absent here.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Community detection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    /// Seed for the Louvain visiting order
    pub seed: u64,
    /// Modularity resolution
    pub resolution: f64,
    /// Maximum Louvain move/aggregate passes
    pub max_passes: usize,
    /// Stop once a pass improves modularity by less than this
    pub min_modularity_gain: f64,
    /// Fail the whole clustering call after this many milliseconds
    pub timeout_ms: Option<u64>,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            resolution: 1.0,
            max_passes: 32,
            min_modularity_gain: 1e-7,
            timeout_ms: None,
        }
    }
}

impl ClusteringConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

/// Batch scoring settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Fan company scoring out over the rayon thread pool
    pub parallel: bool,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self { parallel: true }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Directory holding the five CSV tables
    pub data_dir: PathBuf,
    pub clustering: ClusteringConfig,
    pub scoring: ScoringConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data/raw"),
            clustering: ClusteringConfig::default(),
            scoring: ScoringConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }
}
