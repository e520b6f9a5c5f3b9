//! rwatrack tracks premiums and discounts of tokenized real-world-asset
//! instruments against their reference values, and derives trend,
//! correlation, and risk statistics from the recorded history.

pub mod cli;
pub mod core;
pub mod providers;
pub mod store;
pub mod tracker;

use crate::core::config::AppConfig;
use crate::core::rate::RateValidator;
use crate::core::timeframe::Timeframe;
use crate::tracker::Tracker;
use anyhow::Result;
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Clone)]
pub enum AppCommand {
    Track,
    Report {
        timeframe: Timeframe,
        json: Option<PathBuf>,
    },
    Trends {
        timeframe: Timeframe,
    },
}

/// Loads configuration, opens the history store, and dispatches a command.
pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!(instruments = config.instruments.len(), "Loaded configuration");

    let backend = store::open_backend(&config)?;
    let mut tracker = Tracker::open(
        backend,
        RateValidator::new(config.validation.clone()),
        config.smoothing_window,
    )?;

    match command {
        AppCommand::Track => cli::track::run_track(&config, &mut tracker).await,
        AppCommand::Report { timeframe, json } => {
            cli::report::run_report(&tracker, timeframe, json.as_deref())
        }
        AppCommand::Trends { timeframe } => cli::trends::run_trends(&tracker, timeframe),
    }
}
