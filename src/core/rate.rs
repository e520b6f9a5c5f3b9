//! Validation and annualization of raw on-chain rate readings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const SECONDS_PER_YEAR: f64 = 365.0 * 24.0 * 60.0 * 60.0;

/// A raw fixed-point rate as read from a contract.
#[derive(Debug, Clone, Copy)]
pub struct RateReading {
    pub raw_rate: f64,
    pub decimals_base: u32,
    pub observed_at: DateTime<Utc>,
}

impl RateReading {
    pub fn new(raw_rate: f64, decimals_base: u32, observed_at: DateTime<Utc>) -> Self {
        Self {
            raw_rate,
            decimals_base,
            observed_at,
        }
    }

    /// Rate as a decimal growth factor (1.0 = parity).
    pub fn normalized(&self) -> f64 {
        self.raw_rate / 10f64.powi(self.decimals_base as i32)
    }
}

/// Why a reading was discarded. The fetcher layer decides fallback policy;
/// the validator never retries or calls out externally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectionReason {
    #[error("rate is not positive")]
    NonPositive,
    #[error("normalized rate outside plausible band")]
    OutOfBand,
    #[error("elapsed time is invalid or the reading is stale")]
    StaleOrInvalidElapsed,
    #[error("relative change from prior rate exceeds shock threshold")]
    ExcessiveShock,
    #[error("annualized rate outside plausible band")]
    ImplausibleAnnualized,
}

/// Plausibility bounds for rate validation. Defaults follow the USDY
/// contract conventions: a growth factor within 2x of parity, readings no
/// older than 30 days, and annualized yields capped at 20%.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateBounds {
    pub min_rate: f64,
    pub max_rate: f64,
    pub max_elapsed_seconds: f64,
    pub shock_threshold: f64,
    pub min_annualized: f64,
    pub max_annualized: f64,
}

impl Default for RateBounds {
    fn default() -> Self {
        Self {
            min_rate: 0.5,
            max_rate: 2.0,
            max_elapsed_seconds: 30.0 * 24.0 * 60.0 * 60.0,
            shock_threshold: 0.5,
            min_annualized: 0.0,
            max_annualized: 20.0,
        }
    }
}

/// Sanity-checks raw rate readings before they are trusted.
#[derive(Debug, Clone, Default)]
pub struct RateValidator {
    bounds: RateBounds,
}

impl RateValidator {
    pub fn new(bounds: RateBounds) -> Self {
        Self { bounds }
    }

    /// Validates a reading and returns the annualized yield percentage.
    ///
    /// When `prior_rate` is supplied (same fixed-point scale as the reading),
    /// the relative change is measured against it and the shock guard
    /// applies. Without a prior, the reading is treated as a growth factor
    /// versus par and the change is `normalized - 1.0`.
    pub fn validate(
        &self,
        reading: &RateReading,
        elapsed_seconds: f64,
        prior_rate: Option<f64>,
    ) -> Result<f64, RejectionReason> {
        if reading.raw_rate <= 0.0 {
            return Err(RejectionReason::NonPositive);
        }

        let normalized = reading.normalized();
        if normalized < self.bounds.min_rate || normalized > self.bounds.max_rate {
            return Err(RejectionReason::OutOfBand);
        }

        if elapsed_seconds <= 0.0 || elapsed_seconds > self.bounds.max_elapsed_seconds {
            return Err(RejectionReason::StaleOrInvalidElapsed);
        }

        let relative_change = match prior_rate {
            Some(prior) => {
                let change = reading.raw_rate / prior - 1.0;
                if change.abs() > self.bounds.shock_threshold {
                    return Err(RejectionReason::ExcessiveShock);
                }
                change
            }
            None => normalized - 1.0,
        };

        let years_elapsed = elapsed_seconds / SECONDS_PER_YEAR;
        let annual_rate = ((1.0 + relative_change).powf(1.0 / years_elapsed) - 1.0) * 100.0;

        // powf on a non-positive growth base yields NaN, which compares
        // false against both bounds; reject anything non-finite.
        if !annual_rate.is_finite()
            || annual_rate < self.bounds.min_annualized
            || annual_rate > self.bounds.max_annualized
        {
            return Err(RejectionReason::ImplausibleAnnualized);
        }

        Ok(annual_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_YEAR: f64 = 365.0 * 24.0 * 60.0 * 60.0;

    fn reading(raw_rate: f64) -> RateReading {
        RateReading::new(raw_rate, 18, Utc::now())
    }

    #[test]
    fn test_rejects_non_positive_rate() {
        let validator = RateValidator::default();
        let reading = reading(-5.0);
        assert_eq!(
            validator.validate(&reading, ONE_YEAR, None),
            Err(RejectionReason::NonPositive)
        );
    }

    #[test]
    fn test_rejects_out_of_band_rate() {
        let validator = RateValidator::default();
        // 3.0 after normalization, above the 2.0 ceiling
        let reading = reading(3.0e18);
        assert_eq!(
            validator.validate(&reading, ONE_YEAR, None),
            Err(RejectionReason::OutOfBand)
        );
    }

    #[test]
    fn test_rejects_stale_reading() {
        let validator = RateValidator::default();
        let reading = reading(1.01e18);
        let sixty_days = 60.0 * 24.0 * 60.0 * 60.0;
        assert_eq!(
            validator.validate(&reading, sixty_days, None),
            Err(RejectionReason::StaleOrInvalidElapsed)
        );
        assert_eq!(
            validator.validate(&reading, 0.0, None),
            Err(RejectionReason::StaleOrInvalidElapsed)
        );
    }

    #[test]
    fn test_rejects_excessive_shock() {
        let validator = RateValidator::default();
        let reading = reading(1.9e18);
        // 90% jump over the prior reading
        assert_eq!(
            validator.validate(&reading, 86400.0, Some(1.0e18)),
            Err(RejectionReason::ExcessiveShock)
        );
    }

    #[test]
    fn test_rejects_implausible_annualized() {
        let validator = RateValidator::default();
        // 1% growth over one day annualizes to ~3678%
        let reading = reading(1.01e18);
        assert_eq!(
            validator.validate(&reading, 86400.0, Some(1.0e18)),
            Err(RejectionReason::ImplausibleAnnualized)
        );
    }

    #[test]
    fn test_rejects_nan_from_garbage_prior() {
        // A loose shock threshold lets a negative prior through to the
        // annualization step, where the growth base goes non-positive
        let bounds = RateBounds {
            shock_threshold: 5.0,
            ..RateBounds::default()
        };
        let validator = RateValidator::new(bounds);
        let reading = reading(1.0e18);
        assert_eq!(
            validator.validate(&reading, 0.4 * ONE_YEAR, Some(-1.0e18)),
            Err(RejectionReason::ImplausibleAnnualized)
        );
    }

    #[test]
    fn test_reading_carries_observation_time() {
        let observed_at = Utc::now();
        let reading = RateReading::new(1.05e18, 18, observed_at);
        assert_eq!(reading.observed_at, observed_at);
        assert!((reading.normalized() - 1.05).abs() < 1e-12);
    }

    #[test]
    fn test_accepts_five_percent_annual_growth() {
        let validator = RateValidator::default();
        let reading = reading(1.05e18);
        let annual = validator
            .validate(&reading, ONE_YEAR, Some(1.0e18))
            .unwrap();
        assert!((annual - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_accepts_without_prior_against_parity() {
        let validator = RateValidator::default();
        let reading = reading(1.03e18);
        let annual = validator.validate(&reading, ONE_YEAR, None).unwrap();
        assert!((annual - 3.0).abs() < 1e-6);
    }
}
