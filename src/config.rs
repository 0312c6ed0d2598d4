//! Configuration management for bootpack
//!
//! Settings are loaded from environment variables with defaults. Command-line
//! flags override them in the binary.
//!
//! # Environment Variables
//!
//! - `BOOTPACK_APP_DIR`: Application root - default: "."
//! - `BOOTPACK_LAYERS_DIR`: Directory receiving layers and `launch.toml` - default: "layers"
//! - `BOOTPACK_LOG_LEVEL`: Logging level - default: "info"
//! - `BOOTPACK_LOG_JSON`: JSON log output (true|false) - default: "false"

use crate::util::logging::try_parse_level;
use std::env;
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_APP_DIR: &str = ".";
const DEFAULT_LAYERS_DIR: &str = "layers";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Valid levels: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

#[derive(Debug, Clone)]
pub struct BootpackConfig {
    /// Root of the application being built
    pub app_dir: PathBuf,

    /// Directory where layers and application metadata are written
    pub layers_dir: PathBuf,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Emit JSON logs
    pub log_json: bool,
}

impl Default for BootpackConfig {
    /// Loads configuration from `BOOTPACK_*` environment variables.
    fn default() -> Self {
        let app_dir = env::var("BOOTPACK_APP_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_APP_DIR));

        let layers_dir = env::var("BOOTPACK_LAYERS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_LAYERS_DIR));

        let log_level = env::var("BOOTPACK_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        let log_json = env::var("BOOTPACK_LOG_JSON")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(false);

        Self {
            app_dir,
            layers_dir,
            log_level,
            log_json,
        }
    }
}

impl BootpackConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if try_parse_level(&self.log_level).is_none() {
            return Err(ConfigError::InvalidLogLevel(self.log_level.clone()));
        }

        if self.layers_dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "layers directory must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn with_app_dir(mut self, app_dir: PathBuf) -> Self {
        self.app_dir = app_dir;
        self
    }

    pub fn with_layers_dir(mut self, layers_dir: PathBuf) -> Self {
        self.layers_dir = layers_dir;
        self
    }
}
