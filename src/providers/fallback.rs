//! Ordered fallback across yield sources.
//!
//! The fallback policy is data: sources are tried in their configured
//! order and the first success wins, instead of nesting error handlers per
//! source.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use tracing::{debug, warn};

#[async_trait]
pub trait YieldSource: Send + Sync {
    fn name(&self) -> &str;
    async fn fetch_yield(&self) -> Result<f64>;
}

/// Final fallback tier: a configured constant yield.
pub struct ConstantYield {
    value: f64,
}

impl ConstantYield {
    pub fn new(value: f64) -> Self {
        Self { value }
    }
}

#[async_trait]
impl YieldSource for ConstantYield {
    fn name(&self) -> &str {
        "constant_fallback"
    }

    async fn fetch_yield(&self) -> Result<f64> {
        Ok(self.value)
    }
}

pub struct YieldFallbackChain {
    sources: Vec<Box<dyn YieldSource>>,
}

impl YieldFallbackChain {
    pub fn new(sources: Vec<Box<dyn YieldSource>>) -> Self {
        Self { sources }
    }

    /// Tries each source in order; failures are logged and skipped.
    /// Returns the winning source's name alongside the yield.
    pub async fn resolve(&self) -> Result<(String, f64)> {
        for source in &self.sources {
            match source.fetch_yield().await {
                Ok(value) => {
                    debug!(source = source.name(), value, "Resolved yield");
                    return Ok((source.name().to_string(), value));
                }
                Err(e) => {
                    warn!(source = source.name(), error = %e, "Yield source failed");
                }
            }
        }
        Err(anyhow!("All yield sources failed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    #[async_trait]
    impl YieldSource for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        async fn fetch_yield(&self) -> Result<f64> {
            Err(anyhow!("unavailable"))
        }
    }

    #[tokio::test]
    async fn test_first_success_wins() {
        let chain = YieldFallbackChain::new(vec![
            Box::new(ConstantYield::new(4.0)),
            Box::new(ConstantYield::new(9.0)),
        ]);
        let (name, value) = chain.resolve().await.unwrap();
        assert_eq!(name, "constant_fallback");
        assert_eq!(value, 4.0);
    }

    #[tokio::test]
    async fn test_failures_fall_through() {
        let chain = YieldFallbackChain::new(vec![
            Box::new(Failing),
            Box::new(ConstantYield::new(5.05)),
        ]);
        let (_, value) = chain.resolve().await.unwrap();
        assert_eq!(value, 5.05);
    }

    #[tokio::test]
    async fn test_empty_chain_is_an_error() {
        let chain = YieldFallbackChain::new(Vec::new());
        assert!(chain.resolve().await.is_err());
    }
}
