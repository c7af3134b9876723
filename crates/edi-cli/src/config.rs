//! CLI configuration file
//!
//! ```yaml
//! separators:
//!   segment: "'"
//!   component: ":"
//!   element: "+"
//!   repetition: "*"
//!   escape: "?"
//! ```

use edi_segment::Separators;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors raised while loading the configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error(transparent)]
    Separators(#[from] edi_segment::Error),
}

/// Settings read from `--config`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    /// Separators that override both the `--format` defaults and detection
    #[serde(default)]
    pub separators: Option<Separators>,
}

impl CliConfig {
    /// Load and validate a YAML configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;

        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Reject separator overrides that reuse a character
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(separators) = &self.separators {
            separators.validate()?;
        }
        Ok(())
    }
}
