//! CLI configuration.
//!
//! Settings come from an optional JSON file. A missing default file is not
//! an error; a missing file that was named explicitly is.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable that overrides the configured log filter.
pub const LOG_ENV: &str = "BICON_LOG";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `tracing` filter directive used when neither `--verbose` nor
    /// `BICON_LOG` is given.
    pub log_filter: String,

    /// Pretty-print JSON output.
    pub pretty: bool,

    /// Colorize terminal output.
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            pretty: true,
            color: true,
        }
    }
}

impl Config {
    /// `<config dir>/bicon/config.json`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("bicon").join("config.json"))
    }

    /// Loads the explicit path if given, else the default path if it exists,
    /// else the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Filter precedence: `--verbose`, then `BICON_LOG`, then the config.
    pub fn log_filter(&self, verbose: bool, env: Option<String>) -> String {
        if verbose {
            return "debug".to_string();
        }
        env.filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| self.log_filter.clone())
    }
}
