//! Error types for the quicklist library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for shortcut operations.
#[derive(Debug, Error)]
pub enum ShortcutError {
    /// The host refused an insertion because the dynamic set is full.
    ///
    /// This is the one failure the publisher recovers from: it evicts the
    /// oldest entry and retries the insertion exactly once. A second
    /// occurrence is returned to the caller unchanged.
    #[error("Dynamic shortcut capacity exceeded (limit {limit})")]
    CapacityExceeded { limit: usize },

    // Storage errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: Option<rusqlite::Error>,
    },

    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    // Input errors
    #[error("Validation error for '{field}': {message}")]
    Validation { field: String, message: String },

    // Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    // Generic errors
    #[error("{0}")]
    Other(String),
}

/// Result type alias for shortcut operations.
pub type Result<T> = std::result::Result<T, ShortcutError>;

impl From<rusqlite::Error> for ShortcutError {
    fn from(err: rusqlite::Error) -> Self {
        ShortcutError::Database {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<std::io::Error> for ShortcutError {
    fn from(err: std::io::Error) -> Self {
        ShortcutError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for ShortcutError {
    fn from(err: serde_json::Error) -> Self {
        ShortcutError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl ShortcutError {
    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        ShortcutError::Io {
            message: format!("{} at {}", err, path.display()),
            path: Some(path),
            source: Some(err),
        }
    }

    /// Create a validation error for a named field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ShortcutError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Check whether this error is the host's capacity signal.
    ///
    /// The publisher branches on this to run its evict-and-retry pass;
    /// every other error propagates untouched.
    pub fn is_capacity_exceeded(&self) -> bool {
        matches!(self, ShortcutError::CapacityExceeded { .. })
    }
}
