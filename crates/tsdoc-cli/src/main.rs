use clap::Parser;
use miette::Result;
use tracing::info;
use tsdoc_cli::{cli, commands, error, logger};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();
    logger::init_logger(args.verbose, args.quiet, args.no_color);

    let summary = commands::generate_execute(&args.project_dir, &args.overrides())
        .await
        .map_err(error::cli_error_to_miette)?;
    info!(
        modules = summary.modules,
        relocated = summary.relocated_classes,
        out = %summary.out_dir.display(),
        "documentation written"
    );
    Ok(())
}
