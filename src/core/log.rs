//! Logging initialization.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Installs the global subscriber. With `verbose`, the crate's own spans log
/// at DEBUG; otherwise logging is off unless `RUST_LOG` says otherwise.
pub fn init_logging(verbose: bool) {
    let crate_filter = if verbose {
        Targets::new().with_target("rwatrack", LevelFilter::DEBUG)
    } else {
        Targets::new().with_target("rwatrack", LevelFilter::OFF)
    };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "off" }));

    tracing_subscriber::registry()
        .with(fmt::layer().pretty().without_time())
        .with(crate_filter)
        .with(env_filter)
        .init();
}
