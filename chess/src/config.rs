//! Game configuration file
//!
//! The configuration is a TOML file with two optional sections, piece stats and arena geometry:
//!
//! ```toml
//! [stats.pawn]
//! hp = 1
//! attack_rate = 1.0
//!
//! [arena]
//! width = 16.0
//! height = 12.0
//! ```
//!
//! Everything missing from the file is filled with the default values.

use crate::arena::ArenaConfig;
use crate::stats::StatTable;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error loading or saving [`Config`]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Cannot read or write the file
    #[error("cannot access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// File contents are not a valid configuration
    #[error("bad config: {0}")]
    Parse(#[from] toml::de::Error),
    /// Configuration cannot be serialized
    #[error("cannot serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub stats: StatTable,
    pub arena: ArenaConfig,
}

impl Config {
    pub fn from_toml_str(s: &str) -> Result<Config, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Config::from_toml_str(&text)
    }

    /// Loads the configuration, falling back to the defaults if it cannot be loaded
    pub fn load_or_default(path: impl AsRef<Path>) -> Config {
        match Config::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("using default configuration: {}", e);
                Config::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let text = self.to_toml_string()?;
        fs::write(path, text).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
