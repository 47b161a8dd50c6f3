//! Error types for instance and logging operations

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced at the engine boundary
#[derive(Error, Debug)]
pub enum VlcError {
    /// Engine init returned no instance (unknown flag, missing plugins, ...)
    #[error("Engine initialization failed for arguments {args:?}{}", reason_suffix(.reason))]
    Initialization {
        args: Vec<String>,
        reason: Option<String>,
    },

    /// String could not be passed to the engine as a C string
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Log file could not be opened for append
    #[error("Cannot open log target {path:?}: {source}")]
    LogTarget {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Path is not a usable file target
    #[error("Invalid log target: {0:?}")]
    InvalidLogTarget(PathBuf),

    #[error("Version component {component} out of range: {value} (max 255)")]
    VersionComponentOutOfRange { component: &'static str, value: u32 },

    #[error("Invalid version string: {0}")]
    InvalidVersion(String),

    /// Linked engine is older than the configured minimum
    #[error("Unsupported engine version {found} (requires {required} or newer)")]
    UnsupportedEngine { required: String, found: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for VlcError {
    fn from(err: toml::de::Error) -> Self {
        VlcError::Config(err.to_string())
    }
}

fn reason_suffix(reason: &Option<String>) -> String {
    match reason {
        Some(r) => format!(": {}", r),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, VlcError>;
