//! `track` command: fetch current prices, record observations, and print
//! the resulting premiums.

use crate::cli::ui;
use crate::core::aggregate::{self, WeightedSample};
use crate::core::cache::Cache;
use crate::core::config::{AppConfig, Instrument};
use crate::core::premium;
use crate::providers::centrifuge::CentrifugeProvider;
use crate::providers::coingecko::CoinGeckoProvider;
use crate::providers::fallback::{ConstantYield, YieldFallbackChain, YieldSource};
use crate::providers::treasury::TreasuryProvider;
use crate::tracker::Tracker;
use anyhow::{Result, anyhow};
use comfy_table::{Cell, CellAlignment, Color};
use futures::future::join_all;
use std::sync::Arc;
use tracing::warn;

// Issuer feeds are trusted over open-market quotes when both are present.
const OFFICIAL_PRICE_WEIGHT: f64 = 2.0;
const MARKET_PRICE_WEIGHT: f64 = 1.0;

// Smoothing-window key for the resolved benchmark yield.
const BENCHMARK_ID: &str = "usdy_benchmark";

/// Market value and reference value for one instrument.
async fn fetch_quote(
    instrument: &Instrument,
    coingecko: Option<&CoinGeckoProvider>,
    centrifuge: Option<&CentrifugeProvider>,
) -> Result<(f64, f64)> {
    match instrument {
        Instrument::Tranche(t) => {
            let provider =
                centrifuge.ok_or_else(|| anyhow!("Centrifuge provider not configured"))?;
            let pool = provider.fetch_pool(&t.pool_id).await?;
            let samples = [WeightedSample::new(
                pool.tranche_price(t.tranche),
                OFFICIAL_PRICE_WEIGHT,
            )];
            let market = aggregate::aggregate(&samples)
                .ok_or_else(|| anyhow!("No usable price samples for {}", t.label))?;
            Ok((market, pool.nav_per_token))
        }
        Instrument::ParToken(p) => {
            let provider =
                coingecko.ok_or_else(|| anyhow!("CoinGecko provider not configured"))?;
            let price = provider.token_price(&p.contract_address).await?;
            let samples = [WeightedSample::new(price, MARKET_PRICE_WEIGHT)];
            let market = aggregate::aggregate(&samples)
                .ok_or_else(|| anyhow!("No usable price samples for {}", p.label))?;
            // Par-pegged tokens track a 1.0 reference
            Ok((market, 1.0))
        }
    }
}

pub async fn run_track(config: &AppConfig, tracker: &mut Tracker) -> Result<()> {
    let cache = Arc::new(Cache::new());
    let coingecko = config
        .providers
        .coingecko
        .as_ref()
        .map(|c| CoinGeckoProvider::new(&c.base_url, cache.clone()));
    let centrifuge = config
        .providers
        .centrifuge
        .as_ref()
        .map(|c| CentrifugeProvider::new(&c.base_url));

    let pb = ui::new_progress_bar(config.instruments.len() as u64);
    pb.set_message("Fetching instrument prices");

    let quotes = join_all(config.instruments.iter().map(|instrument| {
        let coingecko = coingecko.as_ref();
        let centrifuge = centrifuge.as_ref();
        let pb = pb.clone();
        async move {
            let quote = fetch_quote(instrument, coingecko, centrifuge).await;
            pb.inc(1);
            quote
        }
    }))
    .await;
    pb.finish_and_clear();

    // Benchmark yield resolves through the fallback chain so a flaky
    // CoinGecko does not block the whole cycle.
    let mut sources: Vec<Box<dyn YieldSource>> = Vec::new();
    if let Some(cg) = &config.providers.coingecko {
        sources.push(Box::new(CoinGeckoProvider::new(&cg.base_url, cache.clone())));
    }
    sources.push(Box::new(ConstantYield::new(config.fallback_yield)));
    let (benchmark_source, raw_benchmark) = YieldFallbackChain::new(sources).resolve().await?;
    // Smoothed the same way whichever source won
    let benchmark_yield = tracker.smooth_yield(BENCHMARK_ID, raw_benchmark);

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Instrument"),
        ui::header_cell("Market"),
        ui::header_cell("Reference"),
        ui::header_cell("Premium"),
        ui::header_cell("Implied Yield"),
        ui::header_cell("Spread"),
    ]);

    let mut recorded = 0usize;
    for (instrument, quote) in config.instruments.iter().zip(quotes) {
        let label = instrument.label();
        match quote {
            Ok((market, reference)) => {
                let observation = tracker.record(label, market, reference, None)?;
                recorded += 1;

                let implied = match instrument {
                    Instrument::ParToken(_) => premium::implied_yield(market).ok(),
                    Instrument::Tranche(_) => None,
                };
                let spread =
                    implied.map(|y| premium::compute_yield_spread(y, benchmark_yield));

                table.add_row(vec![
                    Cell::new(label),
                    Cell::new(format!("{market:.4}")).set_alignment(CellAlignment::Right),
                    Cell::new(format!("{reference:.4}")).set_alignment(CellAlignment::Right),
                    ui::premium_cell(observation.premium_percent),
                    ui::format_optional_cell(implied, |y| format!("{y:.2}%")),
                    ui::format_optional_cell(spread, |s| format!("{s:+.2}pp")),
                ]);
            }
            Err(e) => {
                warn!(instrument = label, error = %e, "Skipping instrument this cycle");
                table.add_row(vec![
                    Cell::new(label),
                    Cell::new("unavailable").fg(Color::Red),
                ]);
            }
        }
    }

    println!("\n{}", ui::title("Premium / Discount"));
    println!("{table}");
    println!(
        "Benchmark yield: {benchmark_yield:.2}% (source: {benchmark_source}), {recorded}/{} instruments recorded",
        config.instruments.len()
    );

    if let Some(treasury) = &config.providers.treasury {
        match TreasuryProvider::new(&treasury.base_url).fetch_yields().await {
            Ok(yields) => {
                let mut rates = ui::new_styled_table();
                rates.set_header(vec![ui::header_cell("Tenor"), ui::header_cell("Avg Rate")]);
                for (tenor, rate) in &yields {
                    rates.add_row(vec![
                        Cell::new(tenor),
                        Cell::new(format!("{rate:.3}%")).set_alignment(CellAlignment::Right),
                    ]);
                }
                println!("\n{}", ui::title("Treasury Benchmarks"));
                println!("{rates}");
            }
            Err(e) => warn!(error = %e, "Treasury yields unavailable"),
        }
    }

    Ok(())
}
