use serde::Deserialize;
use std::path::Path;

use crate::error::ConfigError;

/// Application configuration loaded from a YAML file
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Appended to the input file stem for batch outputs
    pub output_suffix: String,

    /// Re-compress encoded PNGs with oxipng
    pub optimize_png: bool,

    /// Lua scripting settings
    pub script: ScriptConfig,
}

/// Lua heap limit applied unless the config overrides it.
pub const DEFAULT_MEMORY_LIMIT_MB: usize = 256;

/// Configuration for the Lua scripting sandbox
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ScriptConfig {
    /// Global function invoked after the chunk has loaded
    pub entry_point: String,

    /// Lua heap limit in megabytes; `null` in YAML removes the limit
    pub memory_limit_mb: Option<usize>,

    /// Expose log_info / log_warn / log_error to scripts
    pub allow_logging: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_suffix: "_processed".to_string(),
            optimize_png: false,
            script: ScriptConfig::default(),
        }
    }
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            entry_point: "Execute".to_string(),
            memory_limit_mb: Some(DEFAULT_MEMORY_LIMIT_MB),
            allow_logging: true,
        }
    }
}

impl ScriptConfig {
    /// Memory limit in bytes, if configured.
    pub fn memory_limit_bytes(&self) -> Option<usize> {
        self.memory_limit_mb.map(|mb| mb.saturating_mul(1024 * 1024))
    }
}

impl AppConfig {
    /// Strictly read and parse a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load configuration, falling back to defaults.
    ///
    /// With no path, the defaults are used silently. A path that cannot be
    /// read or parsed logs a warning and also yields the defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match Self::from_file(path) {
            Ok(config) => {
                tracing::info!(
                    path = %path.display(),
                    optimize_png = config.optimize_png,
                    entry_point = %config.script.entry_point,
                    "Loaded configuration"
                );
                config
            }
            Err(e) => {
                tracing::warn!(%e, "Failed to load config, using defaults");
                Self::default()
            }
        }
    }
}
