//! Configuration schema and loader for stacks nodes.

use serde::{Deserialize, Serialize};
use stacks_common::Limits;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Top-level node configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Bulk-load file read at startup, if any.
    #[serde(default)]
    pub data_file: Option<PathBuf>,

    /// Record field limits.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Popularity decay settings.
    #[serde(default)]
    pub decay: DecayConfig,

    /// Recommendation settings.
    #[serde(default)]
    pub recommend: RecommendConfig,

    /// Optional Prometheus metrics HTTP listen address.
    #[serde(default)]
    pub metrics_addr: Option<SocketAddr>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            data_file: None,
            catalog: CatalogConfig::default(),
            decay: DecayConfig::default(),
            recommend: RecommendConfig::default(),
            metrics_addr: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_max_title_len")]
    pub max_title_len: usize,

    #[serde(default = "default_max_author_len")]
    pub max_author_len: usize,

    #[serde(default = "default_max_genre_len")]
    pub max_genre_len: usize,

    /// Maximum genres per record.
    #[serde(default = "default_max_genres")]
    pub max_genres: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            max_title_len: default_max_title_len(),
            max_author_len: default_max_author_len(),
            max_genre_len: default_max_genre_len(),
            max_genres: default_max_genres(),
        }
    }
}

impl CatalogConfig {
    pub fn limits(&self) -> Limits {
        Limits {
            max_title_len: self.max_title_len,
            max_author_len: self.max_author_len,
            max_genre_len: self.max_genre_len,
            max_genres: self.max_genres,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecayConfig {
    /// Fraction of the borrow count kept per window.
    #[serde(default = "default_decay_rate")]
    pub rate: f64,

    /// Length of one decay window in days.
    #[serde(default = "default_window_days")]
    pub window_days: f64,

    /// How often the background decay pass runs, in seconds.
    #[serde(default = "default_decay_interval_secs")]
    pub interval_secs: u64,
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            rate: default_decay_rate(),
            window_days: default_window_days(),
            interval_secs: default_decay_interval_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendConfig {
    /// Nominal number of records per recommendation.
    #[serde(default = "default_k")]
    pub k: usize,

    /// Storage bound of the selection heap.
    #[serde(default = "default_heap_capacity")]
    pub heap_capacity: usize,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            k: default_k(),
            heap_capacity: default_heap_capacity(),
        }
    }
}

// --- Defaults ---

fn default_max_title_len() -> usize {
    100
}
fn default_max_author_len() -> usize {
    50
}
fn default_max_genre_len() -> usize {
    30
}
fn default_max_genres() -> usize {
    10
}
fn default_decay_rate() -> f64 {
    0.9
}
fn default_window_days() -> f64 {
    30.0
}
fn default_decay_interval_secs() -> u64 {
    86_400
}
fn default_k() -> usize {
    5
}
fn default_heap_capacity() -> usize {
    100
}

// --- Loading ---

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl NodeConfig {
    /// Validate that configuration values are consistent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog.max_title_len == 0 {
            return Err(ConfigError::Invalid(
                "catalog.max_title_len must be > 0".into(),
            ));
        }
        if self.catalog.max_genres == 0 {
            return Err(ConfigError::Invalid("catalog.max_genres must be > 0".into()));
        }
        if !(self.decay.rate > 0.0 && self.decay.rate <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "decay.rate ({}) must be in (0, 1]",
                self.decay.rate
            )));
        }
        if !(self.decay.window_days > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "decay.window_days ({}) must be > 0",
                self.decay.window_days
            )));
        }
        if self.decay.interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "decay.interval_secs must be > 0".into(),
            ));
        }
        if self.recommend.heap_capacity < self.recommend.k {
            return Err(ConfigError::Invalid(format!(
                "recommend.heap_capacity ({}) must be >= recommend.k ({})",
                self.recommend.heap_capacity, self.recommend.k
            )));
        }
        Ok(())
    }
}

/// Load a `NodeConfig` from a YAML file path.
pub fn load_from_file(path: &std::path::Path) -> Result<NodeConfig, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    load_from_str(&contents)
}

/// Load a `NodeConfig` from a YAML string.
pub fn load_from_str(yaml: &str) -> Result<NodeConfig, ConfigError> {
    let config: NodeConfig = serde_yaml::from_str(yaml)?;
    config.validate()?;
    Ok(config)
}
