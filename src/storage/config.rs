//! User configuration for buildgraph
//!
//! Stored in `~/.config/buildgraph/config.toml` (platform equivalent via
//! `directories`). Every field is optional; a missing file means defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default output format (text or json)
    pub default_format: OutputFormat,

    /// Share packages referenced by several parents instead of rebuilding them
    pub memoize: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_format: OutputFormat::Text,
            memoize: true,
        }
    }
}

impl Config {
    /// Returns the user config directory
    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "buildgraph", "buildgraph")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads configuration from the default location
    ///
    /// `BUILDGRAPH_CONFIG` overrides the path.
    pub fn load() -> Result<Self> {
        let path = match std::env::var_os("BUILDGRAPH_CONFIG") {
            Some(path) => PathBuf::from(path),
            None => match Self::config_dir() {
                Some(dir) => dir.join("config.toml"),
                None => return Ok(Self::default()),
            },
        };

        Self::load_from(&path)
    }

    /// Loads configuration from a file, defaulting if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        Self::parse(&content).with_context(|| format!("Failed to load config: {}", path.display()))
    }

    /// Parses configuration content
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}
