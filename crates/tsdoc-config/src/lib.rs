//! Project configuration for `tsdoc`.
//!
//! Reads `package.json` and `tsconfig.json` from a project directory, layers
//! the documentation settings with environment variables and command-line
//! overrides, and discovers the TypeScript sources to document.

pub mod config;
pub mod discovery;
pub mod error;
mod jsonc;

pub use config::{DocsSettings, Overrides, PLACEHOLDER_PACKAGE_NAME, ProjectConfig};
pub use discovery::discover_sources;
pub use error::{ConfigError, Result};
