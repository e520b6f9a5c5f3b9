//! Centrifuge GraphQL pool data.

use crate::core::config::TrancheType;
use crate::providers::util::with_retry;
use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

const POOL_QUERY: &str = r#"
query GetPoolData($id: String!) {
    pool(id: $id) {
        id
        name
        status
        seniorToken { id symbol price }
        juniorToken { id symbol price }
        metrics { reserve netAssetValue }
    }
}
"#;

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<PoolContainer>,
    errors: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct PoolContainer {
    pool: Option<PoolNode>,
}

#[derive(Debug, Deserialize)]
struct PoolNode {
    name: String,
    status: String,
    #[serde(rename = "seniorToken")]
    senior_token: TrancheToken,
    #[serde(rename = "juniorToken")]
    junior_token: TrancheToken,
    metrics: PoolMetrics,
}

#[derive(Debug, Deserialize)]
struct TrancheToken {
    price: f64,
}

#[derive(Debug, Deserialize)]
struct PoolMetrics {
    reserve: f64,
    #[serde(rename = "netAssetValue")]
    net_asset_value: f64,
}

/// Tranche token prices and the pool's NAV per token.
#[derive(Debug, Clone)]
pub struct PoolData {
    pub pool_id: String,
    pub name: String,
    pub drop_price: f64,
    pub tin_price: f64,
    pub nav_per_token: f64,
}

impl PoolData {
    pub fn tranche_price(&self, tranche: TrancheType) -> f64 {
        match tranche {
            TrancheType::Senior => self.drop_price,
            TrancheType::Junior => self.tin_price,
        }
    }
}

pub struct CentrifugeProvider {
    base_url: String,
    client: reqwest::Client,
}

impl CentrifugeProvider {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Fetches tranche prices and NAV per token for an active pool.
    ///
    /// Inactive pools and a zero reserve are errors here: recording a
    /// premium against a meaningless reference would poison the history.
    pub async fn fetch_pool(&self, pool_id: &str) -> Result<PoolData> {
        let url = format!("{}/graphql", self.base_url);
        let payload = json!({
            "query": POOL_QUERY,
            "variables": { "id": pool_id },
        });

        let response = with_retry(
            || async { self.client.post(&url).json(&payload).send().await },
            3,
            Duration::from_millis(500),
        )
        .await
        .context("Pool data request failed")?;

        let body: GraphQlResponse = response
            .json()
            .await
            .context("Failed to parse pool data response")?;

        if let Some(errors) = body.errors {
            bail!("GraphQL errors for pool {pool_id}: {errors}");
        }
        let pool = body
            .data
            .and_then(|d| d.pool)
            .ok_or_else(|| anyhow!("No data found for pool {pool_id}"))?;

        if pool.status != "ACTIVE" {
            bail!("Pool {pool_id} is not active (status: {})", pool.status);
        }
        if pool.metrics.reserve <= 0.0 {
            bail!("Pool {pool_id} has no reserve, NAV per token undefined");
        }

        let data = PoolData {
            pool_id: pool_id.to_string(),
            name: pool.name,
            drop_price: pool.senior_token.price,
            tin_price: pool.junior_token.price,
            nav_per_token: pool.metrics.net_asset_value / pool.metrics.reserve,
        };
        debug!(pool = %data.name, nav = data.nav_per_token, "Fetched pool data");
        Ok(data)
    }
}
