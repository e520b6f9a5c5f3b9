//! `report` command: descriptive statistics per instrument.

use crate::cli::ui;
use crate::core::timeframe::Timeframe;
use crate::tracker::{PremiumReport, Tracker};
use anyhow::{Context, Result};
use comfy_table::{Cell, CellAlignment};
use std::fs;
use std::path::Path;
use tracing::debug;

pub fn run_report(tracker: &Tracker, timeframe: Timeframe, json_path: Option<&Path>) -> Result<()> {
    let reports: Vec<PremiumReport> = tracker
        .instruments()
        .iter()
        .map(|instrument| tracker.report(instrument, timeframe))
        .collect();

    if let Some(path) = json_path {
        write_json_report(&reports, path)?;
        println!("Wrote JSON report to {}", path.display());
    }

    if reports.is_empty() {
        println!("No observations recorded yet. Run `rwatrack track` first.");
        return Ok(());
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Instrument"),
        ui::header_cell("Current"),
        ui::header_cell("Average"),
        ui::header_cell("Min"),
        ui::header_cell("Max"),
        ui::header_cell("Std Dev"),
        ui::header_cell("Obs"),
    ]);

    for report in &reports {
        table.add_row(vec![
            Cell::new(&report.instrument_id),
            ui::format_optional_cell(report.current, |v| format!("{v:+.2}%")),
            ui::format_optional_cell(report.average, |v| format!("{v:+.2}%")),
            ui::format_optional_cell(report.min, |v| format!("{v:+.2}%")),
            ui::format_optional_cell(report.max, |v| format!("{v:+.2}%")),
            ui::format_optional_cell(report.std_dev, |v| format!("{v:.3}")),
            Cell::new(report.observation_count.to_string()).set_alignment(CellAlignment::Right),
        ]);
    }

    println!(
        "\n{}",
        ui::title(&format!("Premium Report ({timeframe})"))
    );
    println!("{table}");
    Ok(())
}

/// Serializes the reports to a JSON file for downstream consumers.
fn write_json_report(reports: &[PremiumReport], path: &Path) -> Result<()> {
    let encoded =
        serde_json::to_string_pretty(reports).context("Failed to serialize premium reports")?;
    fs::write(path, encoded)
        .with_context(|| format!("Failed to write JSON report to {}", path.display()))?;
    debug!(reports = reports.len(), path = %path.display(), "Wrote JSON report");
    Ok(())
}
