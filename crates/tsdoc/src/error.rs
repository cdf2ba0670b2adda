use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for documentation extraction and assembly.
pub type Result<T> = std::result::Result<T, DocsError>;

/// Error variants for documentation extraction and generation.
#[derive(Debug, Error)]
pub enum DocsError {
    /// A type the extractor decided to record could not be named.
    #[error("cannot get name for `{source_text}`: {reason}")]
    UnresolvedType {
        /// Source text of the offending type or declaration.
        source_text: String,
        /// Why resolution failed.
        reason: String,
    },

    /// A symbol without any declaration.
    #[error("symbol `{symbol}` has no declaration")]
    MissingDeclaration { symbol: String },

    /// A symbol whose declaration has no enclosing namespace or source unit.
    #[error("cannot find parent scope for symbol `{symbol}`")]
    MissingScope { symbol: String },

    /// Failed to read or write a file.
    #[error("I/O error on '{path}': {error}")]
    Io {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// A renderer failed to produce output for a module.
    #[error("failed to render module '{module_id}': {message}")]
    Render { module_id: String, message: String },

    /// Generic error variant.
    #[error("{message}")]
    Other { message: String },
}

impl DocsError {
    pub(crate) fn io(path: impl Into<PathBuf>, error: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            error,
        }
    }

    /// Wrap a lookup failure with the source text that triggered it.
    pub(crate) fn unresolved(source_text: impl Into<String>, reason: impl ToString) -> Self {
        Self::UnresolvedType {
            source_text: source_text.into(),
            reason: reason.to_string(),
        }
    }
}
