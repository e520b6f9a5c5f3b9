//! Premium/discount and yield-spread computation.

use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recorded premium observation. Immutable once appended to history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub instrument_id: String,
    pub timestamp: DateTime<Utc>,
    pub market_value: f64,
    pub reference_value: f64,
    pub premium_percent: f64,
}

/// Premium/discount of a market price over its reference fair value, in
/// percent. A zero reference is an upstream data-quality bug and surfaces
/// as a hard error rather than being masked.
pub fn compute_premium(market_value: f64, reference_value: f64) -> Result<f64> {
    if reference_value == 0.0 {
        bail!("reference value is zero");
    }
    Ok((market_value / reference_value - 1.0) * 100.0)
}

/// Spread of an implied yield over a benchmark yield, in percentage points.
pub fn compute_yield_spread(implied_yield: f64, benchmark_yield: f64) -> f64 {
    implied_yield - benchmark_yield
}

/// Yield backed out of a discount-to-par price, treating the price as a
/// discount factor toward a 1.0 par value (the zero-coupon convention used
/// by stable-value yield tokens).
pub fn implied_yield(price: f64) -> Result<f64> {
    if price == 0.0 {
        bail!("price is zero");
    }
    Ok((1.0 / price - 1.0) * 100.0)
}

/// Builds an [`Observation`] from a market/reference pair.
pub fn observe(
    instrument_id: &str,
    market_value: f64,
    reference_value: f64,
    timestamp: DateTime<Utc>,
) -> Result<Observation> {
    let premium_percent = compute_premium(market_value, reference_value)?;
    Ok(Observation {
        instrument_id: instrument_id.to_string(),
        timestamp,
        market_value,
        reference_value,
        premium_percent,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_premium_above_reference() {
        assert_eq!(compute_premium(105.0, 100.0).unwrap(), 5.0);
    }

    #[test]
    fn test_discount_below_reference() {
        assert_eq!(compute_premium(95.0, 100.0).unwrap(), -5.0);
    }

    #[test]
    fn test_zero_reference_is_an_error() {
        assert!(compute_premium(1.0, 0.0).is_err());
    }

    #[test]
    fn test_yield_spread() {
        assert_eq!(compute_yield_spread(6.5, 5.25), 1.25);
        assert_eq!(compute_yield_spread(4.0, 5.25), -1.25);
    }

    #[test]
    fn test_implied_yield_from_discounted_price() {
        // 0.99 toward a 1.0 par
        let y = implied_yield(0.99).unwrap();
        assert!((y - (1.0 / 0.99 - 1.0) * 100.0).abs() < 1e-12);
        assert!(y > 0.0);
    }

    #[test]
    fn test_implied_yield_zero_price_is_an_error() {
        assert!(implied_yield(0.0).is_err());
    }

    #[test]
    fn test_observe_builds_observation() {
        let ts = Utc::now();
        let obs = observe("ondo", 1.02, 1.0, ts).unwrap();
        assert_eq!(obs.instrument_id, "ondo");
        assert_eq!(obs.timestamp, ts);
        assert!((obs.premium_percent - 2.0).abs() < 1e-9);
    }
}
