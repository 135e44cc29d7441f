//! # Configuration Module
//!
//! Settings for the Kademlia core: bucket sizing and logging.
//!
//! ## Features
//! - **Layered Loading**: Combines YAML file settings, environment variables (`.env`), and hardcoded defaults.
//! - **Serde Integration**: Uses `serde` for serialization/deserialization to/from YAML.
//! - **Partial Configuration**: Missing fields fall back to defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::exceptions::ConfigError;

// --- Default Value Providers ---
// Used by Serde when a field is missing in the YAML file.

fn d_bucket_size() -> usize {
    16
}
fn d_bucket_count() -> usize {
    128
}
fn d_nearest_count() -> usize {
    3
}
fn d_log_level() -> String {
    "INFO".to_string()
}

/// Kademlia parameters
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DHTConfig {
    /// Number of peers each bucket can hold (k-value).
    #[serde(default = "d_bucket_size")]
    pub bucket_size: usize,
    /// Buckets in a full routing table, one per prefix length of a 128-bit identifier.
    #[serde(default = "d_bucket_count")]
    pub bucket_count: usize,
    /// Default number of peers returned by nearest-peer queries.
    #[serde(default = "d_nearest_count")]
    pub nearest_count: usize,
}

impl Default for DHTConfig {
    fn default() -> Self {
        Self {
            bucket_size: d_bucket_size(),
            bucket_count: d_bucket_count(),
            nearest_count: d_nearest_count(),
        }
    }
}

/// The master configuration object
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub dht: DHTConfig,
    /// Global logging level ("DEBUG", "INFO", "WARN", "ERROR").
    #[serde(default = "d_log_level")]
    pub log_level: String,
    /// Optional path to the log file. If None, logs to stdout.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dht: DHTConfig::default(),
            log_level: d_log_level(),
            log_file: None,
        }
    }
}

impl Config {
    /// Loads the configuration from a YAML file and environment variables.
    ///
    /// `.env` variables are loaded first, then the YAML file is read.
    /// `LOG_LEVEL` and `KAD_BUCKET_SIZE` override what the file says.
    /// A missing or unreadable file yields the defaults.
    ///
    /// # Arguments
    ///
    /// * `config_path` - Optional path to the YAML file. Defaults to `config.yaml`.
    pub fn from_file(config_path: Option<PathBuf>) -> Self {
        let _ = dotenvy::dotenv();

        let path = config_path.unwrap_or_else(|| PathBuf::from("config.yaml"));

        let mut config = fs::read_to_string(&path)
            .ok()
            .and_then(|content| match serde_yaml::from_str::<Config>(&content) {
                Ok(config) => Some(config),
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "Invalid config file, using defaults");
                    None
                }
            })
            .unwrap_or_default();

        config.apply_env();
        config
    }

    /// Apply `LOG_LEVEL` and `KAD_BUCKET_SIZE`, ignoring a bucket size that is zero or not a number
    fn apply_env(&mut self) {
        if let Ok(env_level) = env::var("LOG_LEVEL") {
            self.log_level = env_level;
        }

        if let Some(size) = env::var("KAD_BUCKET_SIZE")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|&size| size > 0)
        {
            self.dht.bucket_size = size;
        }
    }

    /// Persists the current configuration state to a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the serialization fails or if the file cannot be written.
    pub fn to_file(&self, config_path: PathBuf) -> Result<(), ConfigError> {
        let yaml_content = serde_yaml::to_string(self)?;
        fs::write(config_path, yaml_content)?;
        Ok(())
    }
}
