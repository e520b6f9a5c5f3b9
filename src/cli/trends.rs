//! `trends` command: trend, correlation, and risk view over the history.

use crate::cli::ui;
use crate::core::timeframe::Timeframe;
use crate::tracker::Tracker;
use anyhow::Result;
use comfy_table::Cell;
use console::style;

pub fn run_trends(tracker: &Tracker, timeframe: Timeframe) -> Result<()> {
    let trends = tracker.trends(timeframe);
    if trends.is_empty() {
        println!("No observations recorded yet. Run `rwatrack track` first.");
        return Ok(());
    }
    let correlations = tracker.correlations(&tracker.all_pairs(), timeframe);
    let risk = tracker.risk_summary(&trends, &correlations);
    let insights = tracker.insights(&trends, &correlations);

    let mut trend_table = ui::new_styled_table();
    trend_table.set_header(vec![
        ui::header_cell("Instrument"),
        ui::header_cell("Trend"),
        ui::header_cell("Volatility"),
        ui::header_cell("Momentum"),
        ui::header_cell("R²"),
        ui::header_cell("Stability"),
    ]);
    for (instrument, result) in &trends {
        trend_table.add_row(vec![
            Cell::new(instrument),
            Cell::new(result.trend.to_string()),
            ui::format_optional_cell(result.volatility, |v| format!("{v:.4}")),
            ui::format_optional_cell(result.momentum, |m| format!("{m:+.3}pp")),
            ui::format_optional_cell(result.r_squared, |r| format!("{r:.3}")),
            Cell::new(risk.trend_stability[instrument].to_string()),
        ]);
    }
    println!("\n{}", ui::title(&format!("Premium Trends ({timeframe})")));
    println!("{trend_table}");

    if !correlations.is_empty() {
        let mut corr_table = ui::new_styled_table();
        corr_table.set_header(vec![
            ui::header_cell("Pair"),
            ui::header_cell("Correlation"),
            ui::header_cell("p-value"),
        ]);
        for (pair, result) in &correlations {
            corr_table.add_row(vec![
                Cell::new(pair),
                ui::format_optional_cell(result.correlation, |r| format!("{r:+.3}")),
                ui::format_optional_cell(result.significance, |p| format!("{p:.4}")),
            ]);
        }
        println!("\n{}", ui::title("Cross-Asset Correlations"));
        println!("{corr_table}");
        println!("Correlation risk: {}", risk.correlation_risk);
    }

    if !risk.volatility_ranking.is_empty() {
        println!("\n{}", ui::title("Volatility Ranking"));
        for (rank, (instrument, volatility)) in risk.volatility_ranking.iter().enumerate() {
            println!("  {}. {instrument}: {volatility:.4}", rank + 1);
        }
    }

    let sections = [
        ("Summary", &insights.summary),
        ("Opportunities", &insights.opportunities),
        ("Risks", &insights.risks),
    ];
    for (heading, lines) in sections {
        if lines.is_empty() {
            continue;
        }
        println!("\n{}", ui::title(heading));
        for line in lines {
            println!("  {} {line}", style("•").dim());
        }
    }

    ui::print_separator();
    Ok(())
}
