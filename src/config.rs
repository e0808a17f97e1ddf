//! Library configuration, persisted as TOML.
//!
//! The default location is `$XDG_CONFIG_HOME/babel-stacks/config.toml`
//! (falling back to `~/.config`). Every field has a default, so a missing or
//! partial file is fine.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::search::types::{SearchMode, SearchOptions};

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// User-facing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Default number of results per search.
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Default weight of the author/genre diversity bonus.
    #[serde(default = "default_diversity_weight")]
    pub diversity_weight: f32,
    /// Default search mode: "deterministic" or "serendipitous".
    #[serde(default)]
    pub mode: SearchMode,
    /// Generation worker threads; 0 uses one per CPU.
    #[serde(default)]
    pub worker_threads: usize,
    /// Year used for recency scoring; the system clock when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_year: Option<i32>,
    /// External vocabulary replacing the bundled one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vocabulary_path: Option<PathBuf>,
}

fn default_max_results() -> usize {
    10
}
fn default_diversity_weight() -> f32 {
    0.7
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            diversity_weight: default_diversity_weight(),
            mode: SearchMode::default(),
            worker_threads: 0,
            current_year: None,
            vocabulary_path: None,
        }
    }
}

impl LibraryConfig {
    /// `$XDG_CONFIG_HOME/babel-stacks/config.toml`, or `None` without a home directory.
    pub fn default_path() -> Option<PathBuf> {
        std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|_| std::env::var("HOME").map(|home| PathBuf::from(home).join(".config")))
            .ok()
            .map(|dir| dir.join("babel-stacks").join("config.toml"))
    }

    /// Load from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if given, else from the default location if it exists,
    /// else fall back to defaults.
    pub fn resolve(path: Option<&Path>) -> ConfigResult<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(default) if default.is_file() => Self::load(&default),
            _ => Ok(Self::default()),
        }
    }

    /// Save to a TOML file.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            source: e,
        })
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !self.diversity_weight.is_finite() || self.diversity_weight < 0.0 {
            return Err(ConfigError::InvalidValue {
                message: format!(
                    "diversity_weight must be a non-negative number, got {}",
                    self.diversity_weight
                ),
            });
        }
        Ok(())
    }

    /// Search options built from the configured defaults.
    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            max_results: self.max_results,
            diversity_weight: self.diversity_weight,
            mode: self.mode,
        }
    }
}
