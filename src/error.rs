use std::path::PathBuf;

use thiserror::Error;

/// Failures reading or writing PNG files.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },

    #[error("Failed to encode PNG: {0}")]
    Encode(String),

    #[error("Image too large: {width}x{height}")]
    UnsupportedDimensions { width: usize, height: usize },

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Reasons a batch configuration file is rejected.
///
/// Batch processing treats all of these as "nothing to do".
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BatchConfigError {
    #[error("No configuration file among the inputs")]
    Missing,

    #[error("Configuration is empty")]
    Empty,

    #[error("Invalid algorithm index: {0}")]
    InvalidIndex(String),

    #[error("Algorithm index {index} out of range (0..{count})")]
    IndexOutOfRange { index: i64, count: usize },

    #[error("Missing colored flag")]
    MissingColoredFlag,

    #[error("Invalid colored flag: {0} (expected 0 or 1)")]
    InvalidColoredFlag(String),
}

/// Failures of a scripted transform.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Failed to load script {name}: {message}")]
    Load { name: String, message: String },

    #[error("Script has to define a function '{0}'")]
    MissingEntryPoint(String),

    #[error("Script error in '{entry_point}': {message}")]
    Runtime {
        entry_point: String,
        message: String,
    },

    #[error("Script session is {state}, cannot {action}")]
    InvalidState {
        state: &'static str,
        action: &'static str,
    },

    /// Lua state setup failure, kept as text so the error stays `Send + Sync`
    #[error("Lua error: {0}")]
    Lua(String),
}

impl From<mlua::Error> for ScriptError {
    fn from(e: mlua::Error) -> Self {
        ScriptError::Lua(e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Script(#[from] ScriptError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}
