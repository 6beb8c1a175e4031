//! Error types for canvas roots
//!
//! This module defines the error types returned by root creation,
//! reconfiguration, scene submission and the drawing backends.

use std::fmt;

/// Result type for canvas root operations
pub type Result<T> = std::result::Result<T, Error>;

/// Canvas root errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Surface handle is null or already bound to another root
    InvalidSurface(String),

    /// Operation attempted on a root that has been unmounted
    DisposedRoot,

    /// Unknown, mistyped or out-of-range configuration value
    Configuration(String),

    /// Drawing backend failure (target allocation, scene mount, draw)
    Backend(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidSurface(msg) => write!(f, "Invalid surface: {}", msg),
            Error::DisposedRoot => write!(f, "Root has been disposed"),
            Error::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            Error::Backend(msg) => write!(f, "Backend error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Configuration(err.to_string())
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
