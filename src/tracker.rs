//! Orchestration over the core: ingestion, reporting, and cross-asset
//! analysis for all tracked instruments.

use crate::core::correlation::{self, CorrelationResult};
use crate::core::history::{HistoryBackend, HistoryStore};
use crate::core::premium::{self, Observation};
use crate::core::rate::{RateReading, RateValidator, RejectionReason};
use crate::core::risk::{self, MarketInsights, RiskSummary};
use crate::core::smoothing::YieldSmoother;
use crate::core::timeframe::Timeframe;
use crate::core::trend::{self, TrendResult};
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Descriptive statistics for one instrument over a timeframe.
///
/// An instrument with no observations in the window yields a report with
/// all-`None` statistics rather than an error.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PremiumReport {
    pub instrument_id: String,
    pub timeframe: Timeframe,
    pub current: Option<f64>,
    pub average: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub std_dev: Option<f64>,
    pub observation_count: usize,
    pub history: Vec<f64>,
}

/// Ties the premium engine together: validates and smooths yield readings,
/// records observations, and derives statistics over the stored history.
///
/// One tracker per process; cycles for the same instrument must not
/// overlap (the surrounding scheduler's responsibility).
pub struct Tracker {
    history: HistoryStore,
    validator: RateValidator,
    smoother: YieldSmoother,
}

impl Tracker {
    pub fn open(
        backend: Box<dyn HistoryBackend>,
        validator: RateValidator,
        smoothing_window: usize,
    ) -> Result<Self> {
        Ok(Self {
            history: HistoryStore::open(backend)?,
            validator,
            smoother: YieldSmoother::new(smoothing_window),
        })
    }

    /// Records a premium observation against the reference value and
    /// appends it to the instrument's history.
    pub fn record(
        &mut self,
        instrument_id: &str,
        market_value: f64,
        reference_value: f64,
        timestamp: Option<DateTime<Utc>>,
    ) -> Result<Observation> {
        let observation = premium::observe(
            instrument_id,
            market_value,
            reference_value,
            timestamp.unwrap_or_else(Utc::now),
        )?;
        debug!(
            instrument = instrument_id,
            premium = observation.premium_percent,
            "Recorded observation"
        );
        self.history.append(observation.clone())?;
        Ok(observation)
    }

    /// Validates a raw rate reading and folds it into the instrument's
    /// smoothing window, returning the smoothed annualized yield. A
    /// rejection leaves the window untouched; the caller decides fallback.
    pub fn ingest_rate(
        &mut self,
        instrument_id: &str,
        reading: &RateReading,
        elapsed_seconds: f64,
        prior_rate: Option<f64>,
    ) -> Result<f64, RejectionReason> {
        match self.validator.validate(reading, elapsed_seconds, prior_rate) {
            Ok(annual_rate) => Ok(self.smoother.update(instrument_id, annual_rate)),
            Err(reason) => {
                warn!(
                    instrument = instrument_id,
                    reason = %reason,
                    "Rejected rate reading"
                );
                Err(reason)
            }
        }
    }

    /// Folds an already-annualized yield into the instrument's smoothing
    /// window. Benchmark yields resolved through the fallback chain take
    /// this path; raw on-chain readings go through [`Self::ingest_rate`].
    pub fn smooth_yield(&mut self, instrument_id: &str, annual_rate: f64) -> f64 {
        self.smoother.update(instrument_id, annual_rate)
    }

    pub fn latest(&self, instrument_id: &str) -> Option<&Observation> {
        self.history.latest(instrument_id)
    }

    pub fn instruments(&self) -> Vec<String> {
        self.history.instruments()
    }

    fn premium_series(&self, instrument_id: &str, timeframe: Timeframe) -> Vec<f64> {
        let since = timeframe.to_duration().map(|d| Utc::now() - d);
        self.history
            .window(instrument_id, since)
            .iter()
            .map(|obs| obs.premium_percent)
            .collect()
    }

    /// Descriptive statistics over the instrument's premium history.
    pub fn report(&self, instrument_id: &str, timeframe: Timeframe) -> PremiumReport {
        let history = self.premium_series(instrument_id, timeframe);
        let count = history.len();

        let (average, min, max, std_dev) = if history.is_empty() {
            (None, None, None, None)
        } else {
            let sum: f64 = history.iter().sum();
            let average = sum / count as f64;
            let min = history.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = history.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            // Sample standard deviation; undefined for a single point
            let std_dev = (count > 1).then(|| {
                let ss: f64 = history.iter().map(|v| (v - average).powi(2)).sum();
                (ss / (count - 1) as f64).sqrt()
            });
            (Some(average), Some(min), Some(max), std_dev)
        };

        PremiumReport {
            instrument_id: instrument_id.to_string(),
            timeframe,
            current: history.last().copied(),
            average,
            min,
            max,
            std_dev,
            observation_count: count,
            history,
        }
    }

    /// Trend analysis for every instrument with history in the timeframe.
    pub fn trends(&self, timeframe: Timeframe) -> BTreeMap<String, TrendResult> {
        self.history
            .instruments()
            .into_iter()
            .map(|id| {
                let series = self.premium_series(&id, timeframe);
                (id, trend::analyze(&series))
            })
            .collect()
    }

    /// Pairwise correlations, keyed `"{a}_vs_{b}"`. Series are truncated to
    /// their common tail length before analysis; the core itself does not
    /// align or resample.
    pub fn correlations(
        &self,
        pairs: &[(String, String)],
        timeframe: Timeframe,
    ) -> BTreeMap<String, CorrelationResult> {
        pairs
            .iter()
            .map(|(a, b)| {
                let series_a = self.premium_series(a, timeframe);
                let series_b = self.premium_series(b, timeframe);
                let common = series_a.len().min(series_b.len());
                let result = correlation::analyze(
                    &series_a[series_a.len() - common..],
                    &series_b[series_b.len() - common..],
                );
                (format!("{a}_vs_{b}"), result)
            })
            .collect()
    }

    /// Every unordered instrument pair, for the default cross-asset view.
    pub fn all_pairs(&self) -> Vec<(String, String)> {
        let ids = self.history.instruments();
        let mut pairs = Vec::new();
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                pairs.push((a.clone(), b.clone()));
            }
        }
        pairs
    }

    pub fn risk_summary(
        &self,
        trends: &BTreeMap<String, TrendResult>,
        correlations: &BTreeMap<String, CorrelationResult>,
    ) -> RiskSummary {
        risk::summarize(trends, correlations)
    }

    pub fn insights(
        &self,
        trends: &BTreeMap<String, TrendResult>,
        correlations: &BTreeMap<String, CorrelationResult>,
    ) -> MarketInsights {
        risk::derive_insights(trends, correlations)
    }
}
