//! US Treasury benchmark yields from the fiscaldata API.

use crate::providers::util::with_retry;
use anyhow::{Context, Result, anyhow};
use chrono::{Duration as ChronoDuration, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

const RATES_ENDPOINT: &str = "/services/api/fiscal_service/v2/accounting/od/avg_interest_rates";

#[derive(Debug, Deserialize)]
struct RatesResponse {
    data: Vec<RateRecord>,
}

#[derive(Debug, Deserialize)]
struct RateRecord {
    record_date: String,
    security_desc: String,
    avg_interest_rate_amt: String,
}

/// Maps fiscaldata security descriptions to the tenor labels we report.
fn tenor_for(security_desc: &str) -> Option<&'static str> {
    match security_desc {
        "Treasury Bills" => Some("3M"),
        "Treasury Notes" => Some("1Y"),
        "Treasury Bonds" => Some("30Y"),
        "Treasury Inflation-Protected Securities (TIPS)" => Some("10Y-TIPS"),
        _ => None,
    }
}

pub struct TreasuryProvider {
    base_url: String,
    client: reqwest::Client,
}

impl TreasuryProvider {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Most recent average interest rate per tenor, looking back 90 days.
    pub async fn fetch_yields(&self) -> Result<BTreeMap<String, f64>> {
        let start_date = (Utc::now() - ChronoDuration::days(90))
            .format("%Y-%m-%d")
            .to_string();
        let filter = format!("record_date:gte:{start_date}");
        let url = format!("{}{}", self.base_url, RATES_ENDPOINT);

        let response = with_retry(
            || async {
                self.client
                    .get(&url)
                    .query(&[
                        ("fields", "record_date,security_desc,avg_interest_rate_amt"),
                        ("filter", filter.as_str()),
                        ("sort", "-record_date"),
                        ("page[size]", "250"),
                    ])
                    .send()
                    .await
            },
            3,
            Duration::from_millis(500),
        )
        .await
        .context("Treasury rates request failed")?;

        let body: RatesResponse = response
            .json()
            .await
            .context("Failed to parse Treasury rates response")?;

        let latest_date = body
            .data
            .first()
            .map(|r| r.record_date.clone())
            .ok_or_else(|| anyhow!("No Treasury yield data available"))?;

        let mut yields = BTreeMap::new();
        for record in &body.data {
            if record.record_date != latest_date {
                continue;
            }
            if let Some(tenor) = tenor_for(&record.security_desc) {
                let rate: f64 = record
                    .avg_interest_rate_amt
                    .parse()
                    .with_context(|| format!("Invalid rate for {}", record.security_desc))?;
                yields.insert(tenor.to_string(), rate);
            }
        }

        if yields.is_empty() {
            return Err(anyhow!("No matching Treasury securities for {latest_date}"));
        }
        debug!(date = %latest_date, tenors = yields.len(), "Fetched Treasury yields");
        Ok(yields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mock_rates_server(body: &str) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(RATES_ENDPOINT))
            .respond_with(ResponseTemplate::new(200).set_body_string(body.to_string()))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_latest_date_rates_by_tenor() {
        let body = r#"{
            "data": [
                {"record_date": "2026-07-31", "security_desc": "Treasury Bills", "avg_interest_rate_amt": "5.123"},
                {"record_date": "2026-07-31", "security_desc": "Treasury Notes", "avg_interest_rate_amt": "4.251"},
                {"record_date": "2026-07-31", "security_desc": "Federal Financing Bank", "avg_interest_rate_amt": "3.0"},
                {"record_date": "2026-06-30", "security_desc": "Treasury Bonds", "avg_interest_rate_amt": "9.999"}
            ]
        }"#;
        let server = mock_rates_server(body).await;
        let provider = TreasuryProvider::new(&server.uri());

        let yields = provider.fetch_yields().await.unwrap();
        assert_eq!(yields.len(), 2);
        assert_eq!(yields["3M"], 5.123);
        assert_eq!(yields["1Y"], 4.251);
        // Older dates and unmapped securities are skipped
        assert!(!yields.contains_key("30Y"));
    }

    #[tokio::test]
    async fn test_empty_data_is_an_error() {
        let server = mock_rates_server(r#"{"data": []}"#).await;
        let provider = TreasuryProvider::new(&server.uri());
        assert!(provider.fetch_yields().await.is_err());
    }

    #[tokio::test]
    async fn test_no_matching_securities_is_an_error() {
        let body = r#"{
            "data": [
                {"record_date": "2026-07-31", "security_desc": "Federal Financing Bank", "avg_interest_rate_amt": "3.0"}
            ]
        }"#;
        let server = mock_rates_server(body).await;
        let provider = TreasuryProvider::new(&server.uri());
        assert!(provider.fetch_yields().await.is_err());
    }
}
