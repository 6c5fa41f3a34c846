//! Configuration handling for Agenda
//!
//! Configuration lives in `config.toml` inside the state directory, next
//! to the save file. It is read once at startup and rewritten whenever the
//! save format changes.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::backend::Format;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// What a bare `agenda` invocation does
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControllerMode {
    /// Open the interactive menu
    #[default]
    Menu,
    /// Print the pending task list and exit
    List,
}

/// Persistent user configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Active save format
    pub save_method: Format,

    /// Behaviour of a bare invocation
    pub controller: ControllerMode,
}

impl Config {
    fn path(dir: &Path) -> PathBuf {
        dir.join("config.toml")
    }

    /// Loads configuration from `dir`, falling back to defaults when the
    /// file does not exist yet
    pub fn load(dir: &Path) -> Result<Self> {
        let path = Self::path(dir);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse config")
    }

    /// Writes the configuration into `dir`, creating the directory if needed
    pub fn save(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create state directory: {}", dir.display()))?;

        let path = Self::path(dir);
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))
    }
}
