//! Error types for Shelfmark.
//!
//! Library crates use [`ShelfmarkError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;
use std::time::Duration;

/// Top-level error type for all Shelfmark operations.
#[derive(Debug, thiserror::Error)]
pub enum ShelfmarkError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// CSV decoding error for an inventory export.
    #[error("CSV error in {path:?}: {message}")]
    Csv { path: PathBuf, message: String },

    /// Data validation error (unknown shelf, bad layout, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Browser driver could not be launched or reached.
    #[error("browser error: {0}")]
    Browser(String),

    /// The WebDriver endpoint answered with a protocol error.
    #[error("webdriver error ({error}): {message}")]
    WebDriver { error: String, message: String },

    /// A bounded wait ran out.
    #[error("timed out after {}s waiting for {what}", .elapsed.as_secs_f64())]
    Timeout { what: String, elapsed: Duration },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ShelfmarkError>;

impl ShelfmarkError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Create a browser error from any displayable message.
    pub fn browser(msg: impl Into<String>) -> Self {
        Self::Browser(msg.into())
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Wrap a CSV decoding error with the file it came from.
    pub fn csv(path: impl Into<PathBuf>, msg: impl std::fmt::Display) -> Self {
        Self::Csv {
            path: path.into(),
            message: msg.to_string(),
        }
    }

    /// Create a timeout error for the named wait.
    pub fn timeout(what: impl Into<String>, elapsed: Duration) -> Self {
        Self::Timeout {
            what: what.into(),
            elapsed,
        }
    }
}
