//! Application configuration, read from an optional TOML file.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Config file looked up in the working directory
pub const CONFIG_FILE: &str = "data_sweeper.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// User-tunable settings. Every field has a default.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SweeperConfig {
    /// Rows shown in each file's preview grid
    pub preview_rows: usize,
    /// Numeric columns pre-selected for charting
    pub default_chart_columns: usize,
    /// Filter directive for the log subscriber
    pub log_level: String,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            preview_rows: 5,
            default_chart_columns: 2,
            log_level: "info".to_string(),
            window_width: 1200.0,
            window_height: 800.0,
        }
    }
}

impl SweeperConfig {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load from `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}
