//! Error types for configuration loading.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config not found: {0}")]
    NotFound(PathBuf),

    #[error("invalid JSON in {path}: {message}")]
    InvalidJson { path: PathBuf, message: String },

    #[error("compilerOptions.outDir is not set in {path}")]
    MissingOutDir { path: PathBuf },

    #[error(
        "no documentation output directory in {path}; add \"jsdoc\": \"docs\" or \"jsdoc\": {{ \"out\": \"docs\" }}"
    )]
    MissingDocsOut { path: PathBuf },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
