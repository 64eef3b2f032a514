//! Configuration management for the Filedeck server.
//!
//! TOML-based configuration with environment variable overrides. The
//! default configuration path is `~/.config/filedeck/config.toml`.

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("listen must be a socket address like 127.0.0.1:3000, got {0}")]
    InvalidListenAddr(String),

    #[error("root_dir must not be empty")]
    EmptyRootDir,

    #[error("log_level must be one of: trace, debug, info, warn, error; got {0}")]
    InvalidLogLevel(String),
}

/// Valid log level values for tracing configuration.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Main configuration structure for the Filedeck server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    /// HTTP server configuration.
    pub server: ServerConfig,

    /// File sandbox configuration.
    pub files: FilesConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to listen on.
    pub listen: String,

    /// Logging level (trace, debug, info, warn, error).
    pub log_level: String,
}

/// File sandbox configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FilesConfig {
    /// Root directory all file operations are confined to. Created at
    /// startup if it does not exist.
    pub root_dir: PathBuf,

    /// Directory of built frontend assets to serve beside the API.
    /// When unset the server is API-only.
    pub web_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:3000".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            root_dir: std::env::temp_dir().join("filedeck"),
            web_dir: None,
        }
    }
}

/// Returns the default configuration file path.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("filedeck")
        .join("config.toml")
}

impl Config {
    /// Apply environment variable overrides to the configuration.
    ///
    /// Environment variables take precedence over config file values.
    /// Supported variables:
    /// - FILEDECK_LISTEN: Override listen address
    /// - FILEDECK_ROOT_DIR: Override sandbox root directory
    /// - FILEDECK_LOG_LEVEL: Override log level
    pub fn apply_env_overrides(&mut self) {
        if let Ok(listen) = std::env::var("FILEDECK_LISTEN") {
            if !listen.is_empty() {
                tracing::info!("Overriding listen from environment: {}", listen);
                self.server.listen = listen;
            }
        }

        if let Ok(root_dir) = std::env::var("FILEDECK_ROOT_DIR") {
            if !root_dir.is_empty() {
                tracing::info!("Overriding root_dir from environment: {}", root_dir);
                self.files.root_dir = PathBuf::from(root_dir);
            }
        }

        if let Ok(level) = std::env::var("FILEDECK_LOG_LEVEL") {
            if !level.is_empty() {
                tracing::info!("Overriding log_level from environment: {}", level);
                self.server.log_level = level;
            }
        }
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.listen.parse::<SocketAddr>().is_err() {
            return Err(ConfigError::InvalidListenAddr(self.server.listen.clone()));
        }

        if self.files.root_dir.as_os_str().is_empty() {
            return Err(ConfigError::EmptyRootDir);
        }

        let level = self.server.log_level.to_lowercase();
        if !VALID_LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(self.server.log_level.clone()));
        }

        Ok(())
    }

    /// Load configuration from a file.
    ///
    /// If the file does not exist, returns the default configuration.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::debug!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load configuration from the default path.
    pub fn load_default() -> Result<Self> {
        Self::load(default_config_path())
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str)
            .map_err(|e| anyhow::anyhow!("Invalid TOML configuration: {}", e.message()))
    }
}
