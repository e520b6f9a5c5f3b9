//! Pearson correlation with significance testing between aligned series.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrelationResult {
    pub correlation: Option<f64>,
    pub significance: Option<f64>,
}

impl CorrelationResult {
    fn not_computable() -> Self {
        Self {
            correlation: None,
            significance: None,
        }
    }
}

/// Pearson correlation coefficient and its two-sided p-value under the
/// Student's t approximation.
///
/// Mismatched lengths, fewer than 2 points, or a zero-variance series are
/// "not computable" results, not errors. Callers align and truncate series
/// to equal length and time alignment beforehand; no interpolation or
/// resampling happens here.
pub fn analyze(series_a: &[f64], series_b: &[f64]) -> CorrelationResult {
    let n = series_a.len();
    if n != series_b.len() || n < 2 {
        return CorrelationResult::not_computable();
    }

    let mean_a = series_a.iter().sum::<f64>() / n as f64;
    let mean_b = series_b.iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (a, b) in series_a.iter().zip(series_b) {
        let da = a - mean_a;
        let db = b - mean_b;
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }

    if var_a == 0.0 || var_b == 0.0 {
        return CorrelationResult::not_computable();
    }

    let r = (cov / (var_a.sqrt() * var_b.sqrt())).clamp(-1.0, 1.0);

    CorrelationResult {
        correlation: Some(r),
        significance: Some(two_sided_p_value(r, n)),
    }
}

/// p-value for t = r * sqrt(df / (1 - r^2)) with df = n - 2. Two points
/// always fit perfectly, hence p = 1; a perfect fit on more points drives
/// t to infinity, hence p = 0.
fn two_sided_p_value(r: f64, n: usize) -> f64 {
    let df = n as f64 - 2.0;
    if df <= 0.0 {
        return 1.0;
    }
    let denom = 1.0 - r * r;
    if denom <= f64::EPSILON {
        return 0.0;
    }

    let t = r * (df / denom).sqrt();
    match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => 2.0 * (1.0 - dist.cdf(t.abs())),
        Err(_) => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatched_lengths_not_computable() {
        let result = analyze(&[1.0, 2.0, 3.0], &[1.0, 2.0]);
        assert!(result.correlation.is_none());
        assert!(result.significance.is_none());
    }

    #[test]
    fn test_too_short_not_computable() {
        let result = analyze(&[1.0], &[2.0]);
        assert!(result.correlation.is_none());
    }

    #[test]
    fn test_zero_variance_not_computable() {
        let result = analyze(&[3.0, 3.0, 3.0], &[1.0, 2.0, 3.0]);
        assert!(result.correlation.is_none());
        assert!(result.significance.is_none());
    }

    #[test]
    fn test_identical_series_perfectly_correlated() {
        let series = [1.0, 2.5, 3.0, 4.5, 6.0];
        let result = analyze(&series, &series);
        assert!((result.correlation.unwrap() - 1.0).abs() < 1e-12);
        assert!(result.significance.unwrap() < 1e-9);
    }

    #[test]
    fn test_inverse_series_negatively_correlated() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [5.0, 4.0, 3.0, 2.0, 1.0];
        let result = analyze(&a, &b);
        assert!((result.correlation.unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_two_points_have_unit_p_value() {
        let result = analyze(&[1.0, 2.0], &[3.0, 7.0]);
        assert!((result.correlation.unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(result.significance, Some(1.0));
    }

    #[test]
    fn test_weak_correlation_is_insignificant() {
        let a = [1.0, 2.0, 1.5, 2.5, 1.2, 2.2, 1.8];
        let b = [4.0, 3.0, 5.0, 3.5, 4.5, 4.2, 3.8];
        let result = analyze(&a, &b);
        let r = result.correlation.unwrap();
        assert!(r.abs() < 1.0);
        assert!(result.significance.unwrap() > 0.01);
    }
}
