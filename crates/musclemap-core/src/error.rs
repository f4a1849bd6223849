//! Error types for the musclemap system.
//!
//! All errors in the system are represented by the [`Error`] enum.
//! This ensures composable error handling across crates.

use std::io;
use std::path::PathBuf;
use thiserror::Error as ThisError;

/// The core error type for all musclemap operations.
#[derive(ThisError, Debug)]
pub enum Error {
    /// File system error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// File not found
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// A parent chain or descent path revisited a node
    #[error("Cycle detected at {node_id}: {}", path.join(" -> "))]
    Cycle { node_id: String, path: Vec<String> },

    /// Unknown node, exercise, or region id
    #[error("Not found: {key}")]
    NotFound { key: String },

    /// Override configuration names a region that does not exist
    #[error("Invalid override for region '{region_id}': {reason}")]
    InvalidOverride { region_id: String, reason: String },

    /// Parse error
    #[error("Parse error: {reason}")]
    ParseError { reason: String },

    /// Invalid configuration
    #[error("Configuration error: {reason}")]
    ConfigError { reason: String },

    /// Generic unclassified error
    #[error("Error: {0}")]
    Other(String),
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a file not found error
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Error::FileNotFound { path: path.into() }
    }

    /// Create a cycle error; `path` is the walk up to and including the repeated id
    pub fn cycle(node_id: impl Into<String>, path: Vec<String>) -> Self {
        Error::Cycle {
            node_id: node_id.into(),
            path,
        }
    }

    /// Create a not found error
    pub fn not_found(key: impl Into<String>) -> Self {
        Error::NotFound { key: key.into() }
    }

    /// Create an invalid override error
    pub fn invalid_override(region_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidOverride {
            region_id: region_id.into(),
            reason: reason.into(),
        }
    }

    /// Create a parse error
    pub fn parse_error(reason: impl Into<String>) -> Self {
        Error::ParseError {
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn config_error(reason: impl Into<String>) -> Self {
        Error::ConfigError {
            reason: reason.into(),
        }
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Whether this error is a data-integrity warning that analysis degrades around
    pub fn is_integrity_warning(&self) -> bool {
        matches!(self, Error::Cycle { .. } | Error::NotFound { .. })
    }
}
