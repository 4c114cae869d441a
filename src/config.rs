//! `config.toml` loading for the model path and output language.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app_dirs::{self, AppDirError};
use crate::outcome::Language;

pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Model artifact path used when nothing else is configured.
pub const DEFAULT_MODEL_PATH: &str = "model_final.json";

/// Errors that may occur while loading app configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The app directory could not be resolved.
    #[error(transparent)]
    AppDir(#[from] AppDirError),
    /// Failed to read a config file.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse TOML config.
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Trained model artifact, relative paths resolve against the working directory.
    pub model_path: PathBuf,
    pub language: Language,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            language: Language::default(),
        }
    }
}

impl AppConfig {
    /// Load `config.toml` from the app directory, falling back to defaults when absent.
    pub fn load() -> Result<Self, ConfigError> {
        let path = app_dirs::app_root_dir()?.join(CONFIG_FILE_NAME);
        Self::load_from(&path)
    }

    /// Load a specific config file, falling back to defaults when it does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("No config at {}; using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source,
        })
    }
}
