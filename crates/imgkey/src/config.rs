use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use common::crypto::EncryptionParams;
use serde::{Deserialize, Serialize};

pub const APP_NAME: &str = "imgkey";
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Settings read from `config.toml`
///
/// Every field has a default, so an empty or absent file is a valid config.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Key derivation settings for encrypted private containers
    #[serde(default)]
    pub encryption: EncryptionParams,
    /// Default log level (trace, debug, info, warn, error)
    #[serde(default)]
    pub log_level: Option<String>,
}

impl Config {
    /// Default config file location (`<config dir>/imgkey/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load the config file
    ///
    /// An explicit path must exist. The default location is optional and falls back
    /// to built-in defaults when missing.
    pub fn load(custom_path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match custom_path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                path.to_path_buf()
            }
            None => match Self::default_path() {
                Some(path) if path.exists() => path,
                _ => {
                    tracing::debug!("no config file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let config = Self::from_file(&path)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let config_toml = fs::read_to_string(path)?;
        config_toml.parse()
    }

    /// Parsed log level, if the config sets one
    pub fn log_level(&self) -> Result<Option<tracing::Level>, ConfigError> {
        self.log_level
            .as_deref()
            .map(|level| {
                tracing::Level::from_str(level)
                    .map_err(|_| ConfigError::InvalidLogLevel(level.to_string()))
            })
            .transpose()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.encryption
            .validate()
            .map_err(|e| ConfigError::InvalidEncryption(e.to_string()))?;
        self.log_level()?;
        Ok(())
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("invalid log level: {0}")]
    InvalidLogLevel(String),

    #[error("invalid encryption settings: {0}")]
    InvalidEncryption(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}
