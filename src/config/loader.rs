//! Configuration File Loading
//!
//! Loads the harness configuration from an explicit path or from the
//! standard search locations, falling back to defaults when nothing is
//! found.

use std::fs;
use std::path::{Path, PathBuf};

use super::Config;
use crate::error::{Error, Result};

/// Configuration file loader
pub struct ConfigLoader {
    /// Search paths for configuration files
    search_paths: Vec<PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self {
            search_paths: Self::get_search_paths(),
        }
    }

    /// Load configuration from the default locations. A missing file is
    /// not an error; the defaults are used instead.
    pub fn load() -> Result<Config> {
        let loader = Self::new();
        for path in &loader.search_paths {
            if path.is_file() {
                info!("loading configuration from {}", path.display());
                return Self::load_from_path(path);
            }
        }
        debug!("no configuration file found, using defaults");
        Ok(Config::default())
    }

    /// Load configuration from an explicit path. Here a missing or
    /// malformed file IS an error: the operator asked for it.
    pub fn load_from_path(path: &Path) -> Result<Config> {
        let raw = fs::read_to_string(path).map_err(|e| Error::ConfigLoadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let config: Config = toml::from_str(&raw).map_err(|e| Error::ConfigParseFailed {
            format: "TOML".to_string(),
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Candidate configuration locations, most specific first.
    fn get_search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("bootcheck.toml")];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("bootcheck").join("config.toml"));
        }
        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".bootcheck.toml"));
        }
        paths
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
