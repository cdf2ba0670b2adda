//! The generate pipeline: configuration, discovery, front end, extraction,
//! flattening, assembly and writing.

use std::path::{Path, PathBuf};

use tracing::{debug, info};
use tsdoc::{AssembleOptions, Generator, JsonRenderer, assemble, write_units};
use tsdoc_config::{Overrides, ProjectConfig, discover_sources};
use tsdoc_oxc::LoadOptions;

use crate::error::{CliError, Result};

/// What a generate run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateSummary {
    /// Output files written.
    pub modules: usize,
    /// Classes relocated into the main module, one path rewrite each.
    /// Relocated functions and members need no rewrite and are not counted.
    pub relocated_classes: usize,
    pub out_dir: PathBuf,
}

pub async fn execute(project_dir: &Path, overrides: &Overrides) -> Result<GenerateSummary> {
    let config = ProjectConfig::load(project_dir, overrides)?;
    info!(package = %config.package_name, "generating documentation");

    let sources = discover_sources(&config)?;
    if sources.is_empty() {
        let root = config.root_dir.as_ref().unwrap_or(&config.project_dir);
        return Err(CliError::NoSources(root.display().to_string()));
    }
    debug!(count = sources.len(), "loading sources");

    let load_options = LoadOptions {
        root_dir: config.root_dir.clone(),
    };
    let program = tsdoc_oxc::load_files(&sources, &load_options)?;

    let naming = config.naming();
    let extraction = Generator::new(&program, &naming).extract()?;
    let flattened = extraction.flatten();
    debug!(
        main = %flattened.main_module,
        classes = flattened.rewrites.len(),
        "flattened re-exports"
    );

    let options = AssembleOptions {
        external_if_not_main: config.external_if_not_main.clone(),
        examples_dir: config.examples.clone(),
        ..AssembleOptions::default()
    };
    let units = assemble(&flattened, &JsonRenderer, &options).await?;
    write_units(&config.docs_out, &units).await?;

    Ok(GenerateSummary {
        modules: units.len(),
        relocated_classes: flattened.rewrites.len(),
        out_dir: config.docs_out,
    })
}
