//! Weighted aggregation of price samples from independent sources.

/// A single price observation with its trust weight.
///
/// Weight encodes how much a source is trusted (an issuer's official feed
/// should dominate a thin DEX pool), not liquidity. Callers may still choose
/// to set weight to observed trade size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedSample {
    pub value: f64,
    pub weight: f64,
}

impl WeightedSample {
    pub fn new(value: f64, weight: f64) -> Self {
        Self { value, weight }
    }
}

/// Combines samples into a single point estimate.
///
/// Returns `None` for an empty input or a zero total weight. That is an
/// "insufficient data" signal, distinct from an error: sources were polled
/// but nothing usable came back.
pub fn aggregate(samples: &[WeightedSample]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }

    let total_weight: f64 = samples.iter().map(|s| s.weight).sum();
    if total_weight == 0.0 {
        return None;
    }

    let weighted_sum: f64 = samples.iter().map(|s| s.value * s.weight).sum();
    Some(weighted_sum / total_weight)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_yields_none() {
        assert!(aggregate(&[]).is_none());
    }

    #[test]
    fn test_zero_total_weight_yields_none() {
        let samples = vec![
            WeightedSample::new(1.02, 0.0),
            WeightedSample::new(0.98, 0.0),
        ];
        assert!(aggregate(&samples).is_none());
    }

    #[test]
    fn test_single_sample() {
        let samples = vec![WeightedSample::new(0.9985, 1.0)];
        assert_eq!(aggregate(&samples), Some(0.9985));
    }

    #[test]
    fn test_higher_weight_dominates() {
        // Official feed at weight 2.0 vs a DEX quote at weight 1.0
        let samples = vec![
            WeightedSample::new(1.00, 2.0),
            WeightedSample::new(1.03, 1.0),
        ];
        let avg = aggregate(&samples).unwrap();
        assert!((avg - 1.01).abs() < 1e-12);
    }

    #[test]
    fn test_result_within_input_range() {
        let samples = vec![
            WeightedSample::new(0.97, 0.5),
            WeightedSample::new(1.01, 3.0),
            WeightedSample::new(1.05, 1.5),
        ];
        let avg = aggregate(&samples).unwrap();
        assert!(avg >= 0.97 && avg <= 1.05);
    }
}
