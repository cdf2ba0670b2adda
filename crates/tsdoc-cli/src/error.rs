//! CLI error type and its conversion into a `miette` report.

use miette::Report;
use thiserror::Error;
use tsdoc::DocsError;
use tsdoc_config::ConfigError;
use tsdoc_oxc::FrontendError;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// Project files missing or malformed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Sources could not be read or parsed.
    #[error(transparent)]
    Frontend(#[from] FrontendError),

    /// Extraction, assembly or writing failed.
    #[error(transparent)]
    Docs(#[from] DocsError),

    #[error("no TypeScript sources found under {0}")]
    NoSources(String),
}

pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Config(e) => miette::miette!("Configuration error: {e}"),
        CliError::Frontend(e @ FrontendError::Parse { .. }) => {
            miette::miette!("{e}\n\nHint: fix the syntax error before generating documentation")
        }
        CliError::Frontend(e) => miette::miette!("{e}"),
        CliError::Docs(e @ DocsError::UnresolvedType { .. }) => miette::miette!(
            "Documentation error: {e}\n\nHint: give the declaration an explicit type annotation"
        ),
        CliError::Docs(e) => miette::miette!("Documentation error: {e}"),
        CliError::NoSources(_) => miette::miette!("{err}"),
    }
}
