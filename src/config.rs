//! Configuration file support for topiclens
//!
//! Reads from .topiclens/config.toml

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration structure
#[derive(Debug, Deserialize, Serialize, Default, Clone)]
pub struct Config {
    /// Dashboard server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Result-bundle settings
    #[serde(default)]
    pub bundle: BundleConfig,
}

/// Server-related configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    /// Port the dashboard listens on
    /// Default: 3217
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Bundle-related configuration
#[derive(Debug, Deserialize, Serialize, Default, Clone)]
pub struct BundleConfig {
    /// Override for the result-bundle path. When unset the loader falls
    /// back to `lda_full_result.json` in the working directory.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

fn default_port() -> u16 {
    3217
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

impl Config {
    /// Load config from .topiclens/config.toml
    /// Returns default config if file doesn't exist
    pub fn load() -> Self {
        if let Some(path) = Self::find_config_path() {
            if let Ok(contents) = std::fs::read_to_string(&path) {
                if let Ok(config) = toml::from_str(&contents) {
                    return config;
                }
            }
        }
        Self::default()
    }

    /// Find config.toml by walking up directory tree
    fn find_config_path() -> Option<PathBuf> {
        let current_dir = std::env::current_dir().ok()?;
        let mut dir = current_dir.as_path();

        loop {
            let config_path = dir.join(".topiclens").join("config.toml");
            if config_path.exists() {
                return Some(config_path);
            }

            match dir.parent() {
                Some(parent) => dir = parent,
                None => break,
            }
        }
        None
    }
}
