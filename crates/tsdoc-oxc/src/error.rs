//! Error types for the TypeScript front end

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading and binding TypeScript sources
#[derive(Error, Debug)]
pub enum FrontendError {
    /// A source file could not be read
    #[error("Failed to read {path}: {error}")]
    Io {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// The parser reported syntax errors
    #[error("Failed to parse {path}: {message}")]
    Parse { path: String, message: String },
}

/// Result type for front-end operations
pub type Result<T> = std::result::Result<T, FrontendError>;
