//! Linear-trend classification over premium/yield series.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Direction and strength of a fitted linear trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    StronglyIncreasing,
    Increasing,
    Stable,
    Decreasing,
    StronglyDecreasing,
    InsufficientData,
}

impl Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Trend::StronglyIncreasing => "strongly_increasing",
                Trend::Increasing => "increasing",
                Trend::Stable => "stable",
                Trend::Decreasing => "decreasing",
                Trend::StronglyDecreasing => "strongly_decreasing",
                Trend::InsufficientData => "insufficient_data",
            }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendResult {
    pub trend: Trend,
    pub volatility: Option<f64>,
    pub momentum: Option<f64>,
    pub r_squared: Option<f64>,
}

impl TrendResult {
    fn insufficient_data() -> Self {
        Self {
            trend: Trend::InsufficientData,
            volatility: None,
            momentum: None,
            r_squared: None,
        }
    }
}

// Slope thresholds in percent-per-period. Fixed policy constants rather
// than configuration: the classification is a coarse label, not a tunable
// signal.
const SLOPE_TREND_THRESHOLD: f64 = 0.01;
const SLOPE_STRONG_THRESHOLD: f64 = 0.05;

/// Fits an ordinary least-squares line of value against index position and
/// classifies the slope. Series shorter than 2 points are not analyzable.
pub fn analyze(series: &[f64]) -> TrendResult {
    if series.len() < 2 {
        return TrendResult::insufficient_data();
    }

    let (slope, r_value) = linear_fit(series);

    let trend = if slope.abs() <= SLOPE_TREND_THRESHOLD {
        Trend::Stable
    } else if slope.abs() <= SLOPE_STRONG_THRESHOLD {
        if slope > 0.0 { Trend::Increasing } else { Trend::Decreasing }
    } else if slope > 0.0 {
        Trend::StronglyIncreasing
    } else {
        Trend::StronglyDecreasing
    };

    TrendResult {
        trend,
        volatility: Some(population_std_dev(series)),
        momentum: Some(series[series.len() - 1] - series[0]),
        r_squared: Some(r_value * r_value),
    }
}

/// Slope and correlation coefficient of the OLS fit against 0..n indices.
/// A constant series has zero slope and, by convention, r = 0.
fn linear_fit(series: &[f64]) -> (f64, f64) {
    let n = series.len() as f64;
    let mean_x = (series.len() - 1) as f64 / 2.0;
    let mean_y = series.iter().sum::<f64>() / n;

    let mut cov_xy = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (i, y) in series.iter().enumerate() {
        let dx = i as f64 - mean_x;
        let dy = y - mean_y;
        cov_xy += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let slope = cov_xy / var_x;
    let r_value = if var_y == 0.0 {
        0.0
    } else {
        cov_xy / (var_x.sqrt() * var_y.sqrt())
    };
    (slope, r_value)
}

pub(crate) fn population_std_dev(series: &[f64]) -> f64 {
    let n = series.len() as f64;
    let mean = series.iter().sum::<f64>() / n;
    let variance = series.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_series_is_insufficient() {
        assert_eq!(analyze(&[]).trend, Trend::InsufficientData);
        let result = analyze(&[1.5]);
        assert_eq!(result.trend, Trend::InsufficientData);
        assert!(result.volatility.is_none());
        assert!(result.momentum.is_none());
        assert!(result.r_squared.is_none());
    }

    #[test]
    fn test_constant_series_is_stable() {
        let result = analyze(&[1.0, 1.0, 1.0, 1.0, 1.0]);
        assert_eq!(result.trend, Trend::Stable);
        assert_eq!(result.volatility, Some(0.0));
        assert_eq!(result.momentum, Some(0.0));
        assert_eq!(result.r_squared, Some(0.0));
    }

    #[test]
    fn test_steep_ramp_is_strongly_increasing() {
        let result = analyze(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(result.trend, Trend::StronglyIncreasing);
        assert_eq!(result.momentum, Some(4.0));
        // Perfect linear fit
        assert!((result.r_squared.unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_steep_fall_is_strongly_decreasing() {
        let result = analyze(&[5.0, 4.0, 3.0, 2.0, 1.0]);
        assert_eq!(result.trend, Trend::StronglyDecreasing);
        assert_eq!(result.momentum, Some(-4.0));
    }

    #[test]
    fn test_gentle_slope_is_increasing() {
        // Slope 0.03 per period: past the 0.01 threshold, short of 0.05
        let series: Vec<f64> = (0..10).map(|i| 1.0 + 0.03 * i as f64).collect();
        assert_eq!(analyze(&series).trend, Trend::Increasing);
    }

    #[test]
    fn test_volatility_is_population_std_dev() {
        let result = analyze(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!((result.volatility.unwrap() - 2.0).abs() < 1e-12);
    }
}
