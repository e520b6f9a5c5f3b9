//! Cross-instrument risk aggregation and market insights.

use crate::core::correlation::CorrelationResult;
use crate::core::trend::{Trend, TrendResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                RiskLevel::Low => "low",
                RiskLevel::Medium => "medium",
                RiskLevel::High => "high",
            }
        )
    }
}

/// Ranked risk view across all tracked instruments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskSummary {
    /// (instrument_id, volatility), descending. Instruments without a
    /// computable volatility are excluded.
    pub volatility_ranking: Vec<(String, f64)>,
    pub trend_stability: BTreeMap<String, RiskLevel>,
    pub correlation_risk: RiskLevel,
}

/// Textual observations derived from trends and correlations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketInsights {
    pub summary: Vec<String>,
    pub opportunities: Vec<String>,
    pub risks: Vec<String>,
}

// Fixed policy constants for the coarse risk labels.
const STABILITY_HIGH_R_SQUARED: f64 = 0.7;
const STABILITY_MEDIUM_R_SQUARED: f64 = 0.3;
const STRONG_CORRELATION: f64 = 0.7;
const HIGH_VOLATILITY: f64 = 0.1;

pub fn summarize(
    trend_results: &BTreeMap<String, TrendResult>,
    correlation_results: &BTreeMap<String, CorrelationResult>,
) -> RiskSummary {
    let mut volatility_ranking: Vec<(String, f64)> = trend_results
        .iter()
        .filter_map(|(id, t)| t.volatility.map(|v| (id.clone(), v)))
        .collect();
    volatility_ranking.sort_by(|a, b| b.1.total_cmp(&a.1));

    let trend_stability = trend_results
        .iter()
        .map(|(id, t)| {
            let r_squared = t.r_squared.unwrap_or(0.0);
            let level = if r_squared > STABILITY_HIGH_R_SQUARED {
                RiskLevel::High
            } else if r_squared > STABILITY_MEDIUM_R_SQUARED {
                RiskLevel::Medium
            } else {
                RiskLevel::Low
            };
            (id.clone(), level)
        })
        .collect();

    let strongly_correlated = correlation_results
        .values()
        .filter(|c| c.correlation.is_some_and(|r| r.abs() > STRONG_CORRELATION))
        .count();
    let correlation_risk = if strongly_correlated > 2 {
        RiskLevel::High
    } else if strongly_correlated > 0 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };

    RiskSummary {
        volatility_ranking,
        trend_stability,
        correlation_risk,
    }
}

/// Derives human-readable observations from the analyzed data.
pub fn derive_insights(
    trend_results: &BTreeMap<String, TrendResult>,
    correlation_results: &BTreeMap<String, CorrelationResult>,
) -> MarketInsights {
    let mut insights = MarketInsights::default();

    for (asset, trend_data) in trend_results {
        match trend_data.trend {
            Trend::StronglyIncreasing => {
                insights
                    .summary
                    .push(format!("Strong upward trend in {asset} premium"));
                insights
                    .opportunities
                    .push(format!("Consider increasing exposure to {asset}"));
            }
            Trend::StronglyDecreasing => {
                insights
                    .summary
                    .push(format!("Strong downward trend in {asset} premium"));
                insights
                    .risks
                    .push(format!("Monitor {asset} for potential stabilization"));
            }
            _ => {}
        }

        if trend_data.volatility.is_some_and(|v| v > HIGH_VOLATILITY) {
            insights.risks.push(format!("High volatility in {asset}"));
        }
    }

    for (pair, corr_data) in correlation_results {
        let Some(correlation) = corr_data.correlation else {
            continue;
        };
        if correlation > STRONG_CORRELATION {
            insights
                .summary
                .push(format!("Strong positive correlation between {pair}"));
        } else if correlation < -STRONG_CORRELATION {
            insights
                .summary
                .push(format!("Strong negative correlation between {pair}"));
            insights
                .opportunities
                .push(format!("Potential diversification opportunity with {pair}"));
        }
    }

    insights
}
