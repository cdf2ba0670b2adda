//! Command-line interface definition.

use std::path::PathBuf;

use clap::Parser;
use tsdoc_config::Overrides;

/// Generate per-module API documentation for a TypeScript project.
///
/// Reads `tsconfig.json` (its `compilerOptions.outDir` and `jsdoc` section)
/// and `package.json` from the project directory, then writes one JSON file
/// per documented module into the configured output directory.
#[derive(Parser, Debug)]
#[command(name = "tsdoc", version, about = "Generate API documentation for a TypeScript project")]
pub struct Cli {
    /// Project directory containing `tsconfig.json`
    #[arg(default_value = ".")]
    pub project_dir: PathBuf,

    /// Documentation output directory, overriding the `jsdoc` setting
    #[arg(short, long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Base URL used to link non-main declarations referenced from the main module
    #[arg(long, value_name = "URL")]
    pub external_if_not_main: Option<String>,

    /// Root of the per-class example snippet tree
    #[arg(long, value_name = "DIR")]
    pub examples: Option<PathBuf>,

    /// Entry-point file, overriding `package.json` `main`
    #[arg(long, value_name = "FILE")]
    pub main: Option<String>,

    /// Enable verbose logging (debug level)
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    /// Settings given on the command line, layered over the project files.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            out: self.out.clone(),
            external_if_not_main: self.external_if_not_main.clone(),
            examples: self.examples.clone(),
            main: self.main.clone(),
        }
    }
}
