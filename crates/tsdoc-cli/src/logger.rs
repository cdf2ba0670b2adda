//! Logging setup on top of `tracing`.
//!
//! `--verbose` enables debug output for the tsdoc crates, `--quiet` keeps
//! errors only. Otherwise `RUST_LOG` is honored, falling back to info.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "tsdoc=debug,tsdoc_oxc=debug,tsdoc_config=debug,tsdoc_cli=debug";
const QUIET_FILTER: &str = "error";
const DEFAULT_FILTER: &str = "tsdoc=info,tsdoc_oxc=info,tsdoc_config=info,tsdoc_cli=info";

/// Install the global subscriber. Call once, before any logging.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    init_logger_with_filter(filter_for(verbose, quiet), no_color);
}

pub fn init_logger_with_filter(filter: EnvFilter, no_color: bool) {
    // Diagnostics go to stderr so stdout stays clean for piping.
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

fn filter_for(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The global subscriber can only be installed once per process, so only
    // the filter selection is checked here.

    #[test]
    fn verbose_wins_over_quiet() {
        assert_eq!(filter_for(true, true).to_string(), EnvFilter::new(VERBOSE_FILTER).to_string());
    }

    #[test]
    fn quiet_keeps_errors_only() {
        assert_eq!(filter_for(false, true).to_string(), EnvFilter::new(QUIET_FILTER).to_string());
    }
}
