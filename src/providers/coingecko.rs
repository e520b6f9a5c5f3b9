//! CoinGecko price and yield fetchers.

use crate::core::cache::Cache;
use crate::providers::fallback::YieldSource;
use crate::providers::util::with_retry;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const YIELD_CACHE_KEY: &str = "usdy_annual_yield";
const YIELD_CACHE_TTL: Duration = Duration::from_secs(300);

// CoinGecko id for Ondo's USDY token
const USDY_COIN_ID: &str = "ondo-us-dollar-yield";

#[derive(Debug, Deserialize)]
struct MarketChartResponse {
    prices: Vec<(f64, f64)>,
}

pub struct CoinGeckoProvider {
    base_url: String,
    cache: Arc<Cache<String, f64>>,
}

impl CoinGeckoProvider {
    pub fn new(base_url: &str, cache: Arc<Cache<String, f64>>) -> Self {
        Self {
            base_url: base_url.to_string(),
            cache,
        }
    }

    /// USD price of an Ethereum token by contract address.
    pub async fn token_price(&self, contract_address: &str) -> Result<f64> {
        let address = contract_address.to_lowercase();
        let url = format!(
            "{}/api/v3/simple/token_price/ethereum?contract_addresses={}&vs_currencies=usd",
            self.base_url, address
        );

        let response = with_retry(
            || async { reqwest::get(&url).await },
            3,
            Duration::from_millis(500),
        )
        .await
        .context("Token price request failed")?;

        let body: HashMap<String, HashMap<String, f64>> = response
            .json()
            .await
            .context("Failed to parse token price response")?;

        body.get(&address)
            .and_then(|quotes| quotes.get("usd"))
            .copied()
            .ok_or_else(|| anyhow!("No USD price returned for {contract_address}"))
    }

    /// Annualized USDY yield backed out of the last day of market prices.
    ///
    /// The daily price change is scaled to a yearly figure and clamped to
    /// [0, 20] percent; values outside that band mean bad data, not a real
    /// 2000% yield. Cached for five minutes.
    pub async fn usdy_annual_yield(&self) -> Result<f64> {
        if let Some(cached) = self.cache.get(&YIELD_CACHE_KEY.to_string()).await {
            return Ok(cached);
        }

        let url = format!(
            "{}/api/v3/coins/{}/market_chart?vs_currency=usd&days=1&interval=daily",
            self.base_url, USDY_COIN_ID
        );

        let response = with_retry(
            || async { reqwest::get(&url).await },
            3,
            Duration::from_millis(500),
        )
        .await
        .context("Market chart request failed")?;

        let chart: MarketChartResponse = response
            .json()
            .await
            .context("Failed to parse market chart response")?;

        if chart.prices.len() < 2 {
            return Err(anyhow!("Not enough price points to derive a yield"));
        }

        let start_price = chart.prices[0].1;
        let end_price = chart.prices[chart.prices.len() - 1].1;
        if start_price == 0.0 {
            return Err(anyhow!("Zero start price in market chart"));
        }

        let daily_yield = (end_price - start_price) / start_price * 100.0;
        let annual_yield = (daily_yield * 365.0).clamp(0.0, 20.0);
        debug!(start_price, end_price, annual_yield, "Derived USDY yield");

        self.cache
            .put(
                YIELD_CACHE_KEY.to_string(),
                annual_yield,
                Some(YIELD_CACHE_TTL),
            )
            .await;
        Ok(annual_yield)
    }
}

#[async_trait]
impl YieldSource for CoinGeckoProvider {
    fn name(&self) -> &str {
        "coingecko"
    }

    async fn fetch_yield(&self) -> Result<f64> {
        self.usdy_annual_yield().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const USDY_ADDRESS: &str = "0x96F6eF951840721AdBF73e6C389f4e6954294985";

    async fn mock_token_price_server(price: f64) -> MockServer {
        let server = MockServer::start().await;
        let body = format!(r#"{{"{}": {{"usd": {price}}}}}"#, USDY_ADDRESS.to_lowercase());

        Mock::given(method("GET"))
            .and(path("/api/v3/simple/token_price/ethereum"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;
        server
    }

    async fn mock_market_chart_server(body: &str) -> MockServer {
        let server = MockServer::start().await;
        let chart_path = format!("/api/v3/coins/{USDY_COIN_ID}/market_chart");

        Mock::given(method("GET"))
            .and(path(&chart_path))
            .respond_with(ResponseTemplate::new(200).set_body_string(body.to_string()))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_token_price() {
        let server = mock_token_price_server(0.9985).await;
        let provider = CoinGeckoProvider::new(&server.uri(), Arc::new(Cache::new()));

        let price = provider.token_price(USDY_ADDRESS).await.unwrap();
        assert_eq!(price, 0.9985);
    }

    #[tokio::test]
    async fn test_usdy_yield_from_daily_prices() {
        // ~0.0137% over one day annualizes to ~5%
        let body = r#"{"prices": [[1700000000000, 1.0000], [1700086400000, 1.000137]]}"#;
        let server = mock_market_chart_server(body).await;
        let provider = CoinGeckoProvider::new(&server.uri(), Arc::new(Cache::new()));

        let annual = provider.usdy_annual_yield().await.unwrap();
        assert!(annual > 4.9 && annual < 5.1);
    }

    #[tokio::test]
    async fn test_usdy_yield_clamped_to_band() {
        // A 1% daily move would annualize to 365%; clamp to 20
        let body = r#"{"prices": [[1700000000000, 1.0], [1700086400000, 1.01]]}"#;
        let server = mock_market_chart_server(body).await;
        let provider = CoinGeckoProvider::new(&server.uri(), Arc::new(Cache::new()));

        assert_eq!(provider.usdy_annual_yield().await.unwrap(), 20.0);
    }

    #[tokio::test]
    async fn test_usdy_yield_requires_two_points() {
        let body = r#"{"prices": [[1700000000000, 1.0]]}"#;
        let server = mock_market_chart_server(body).await;
        let provider = CoinGeckoProvider::new(&server.uri(), Arc::new(Cache::new()));

        assert!(provider.usdy_annual_yield().await.is_err());
    }

    #[tokio::test]
    async fn test_usdy_yield_is_cached() {
        let body = r#"{"prices": [[1700000000000, 1.0], [1700086400000, 1.000137]]}"#;
        let server = mock_market_chart_server(body).await;
        let provider = CoinGeckoProvider::new(&server.uri(), Arc::new(Cache::new()));

        let first = provider.usdy_annual_yield().await.unwrap();
        drop(server);
        // Server is gone; the cached value still answers
        let second = provider.usdy_annual_yield().await.unwrap();
        assert_eq!(first, second);
    }
}
