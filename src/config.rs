//! `.taidy.json` configuration.
//!
//! ```json
//! { "ignore": ["vendor/**", "*.generated.*"] }
//! ```
//!
//! Unknown keys are ignored.

use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = ".taidy.json";

/// Upper bound on directories visited during the upward search.
const MAX_DEPTH: usize = 100;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Glob patterns applied after the built-in ignore set.
    pub ignore: Vec<String>,
}

/// Errors that can occur when loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read config file at {path}: {source}")]
    IoError { source: io::Error, path: String },

    /// The file is not a valid configuration object
    #[error("Failed to parse {path}: {source}")]
    ParseError { source: serde_json::Error, path: String },
}

/// Where the configuration comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Search upward from the given directory.
    Discover(PathBuf),
    /// A file named on the command line. Failures are errors.
    Explicit(PathBuf),
    /// `--no-config`
    #[default]
    Disabled,
}

impl Config {
    /// Parse JSON content. A literal `null` is an empty configuration.
    pub fn from_json(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let parsed: Option<Config> = serde_json::from_str(content).map_err(|source| ConfigError::ParseError {
            source,
            path: path.display().to_string(),
        })?;
        Ok(parsed.unwrap_or_default())
    }

    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            source,
            path: path.display().to_string(),
        })?;
        Self::from_json(&content, path)
    }

    /// Load according to `source`.
    ///
    /// A discovered file that fails to load is reported as a warning and
    /// replaced by the default configuration. An explicit file must load.
    pub fn load(source: &ConfigSource) -> Result<Self, ConfigError> {
        match source {
            ConfigSource::Disabled => Ok(Self::default()),
            ConfigSource::Explicit(path) => {
                log::debug!("Loading config from {}", path.display());
                Self::load_file(path)
            }
            ConfigSource::Discover(start) => {
                let Some(path) = discover_config_upward(start) else {
                    log::debug!("No {CONFIG_FILE_NAME} found, using defaults");
                    return Ok(Self::default());
                };
                match Self::load_file(&path) {
                    Ok(config) => Ok(config),
                    Err(e) => {
                        log::warn!("{e}");
                        Ok(Self::default())
                    }
                }
            }
        }
    }

    /// Whether any ignore patterns beyond the built-in ones are configured.
    pub fn has_custom_ignores(&self) -> bool {
        !self.ignore.is_empty()
    }
}

/// Find the nearest `.taidy.json` at or above `start_dir`.
///
/// The search stops at the first directory containing `.git`, at the
/// filesystem root, or after [`MAX_DEPTH`] levels.
pub fn discover_config_upward(start_dir: &Path) -> Option<PathBuf> {
    let mut current_dir = std::path::absolute(start_dir).unwrap_or_else(|_| start_dir.to_path_buf());

    for _ in 0..MAX_DEPTH {
        let candidate = current_dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            log::debug!("Found config file: {}", candidate.display());
            return Some(candidate);
        }

        if current_dir.join(".git").exists() {
            log::debug!("Stopping config search at {}", current_dir.display());
            return None;
        }

        match current_dir.parent() {
            Some(parent) => current_dir = parent.to_path_buf(),
            None => return None,
        }
    }

    log::debug!("Maximum config search depth reached");
    None
}
