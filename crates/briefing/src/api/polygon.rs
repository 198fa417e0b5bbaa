//! Polygon-style aggregates API client

use crate::api::MarketDataSource;
use crate::error::{BriefingError, Result};
use crate::series::{DailyBar, OhlcvSeries};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;

const BASE_URL: &str = "https://api.polygon.io";
const PROVIDER: &str = "Polygon";

/// Trailing window requested when no explicit range is given
const DEFAULT_LOOKBACK_DAYS: i64 = 365;

/// Polygon API client for daily aggregate bars
#[derive(Debug, Clone)]
pub struct PolygonClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl PolygonClient {
    /// Create a new Polygon client
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Create from environment variable POLYGON_API_KEY
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("POLYGON_API_KEY").map_err(|_| {
            BriefingError::Config("POLYGON_API_KEY environment variable not set".to_string())
        })?;

        Ok(Self::new(api_key))
    }

    /// Override the base URL (for tests and proxies)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Rebuild the HTTP client with a per-request timeout
    pub fn with_timeout(mut self, timeout: std::time::Duration) -> Result<Self> {
        self.client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(BriefingError::Transport)?;
        Ok(self)
    }

    /// Fetch daily aggregates for the trailing year
    pub async fn get_daily(&self, symbol: &str) -> Result<OhlcvSeries> {
        let to = Utc::now().date_naive();
        let from = to - Duration::days(DEFAULT_LOOKBACK_DAYS);

        let url = format!(
            "{}/v2/aggs/ticker/{}/range/1/day/{}/{}",
            self.base_url, symbol, from, to
        );

        tracing::debug!(symbol, %from, %to, "fetching Polygon daily aggregates");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("adjusted", "true"),
                ("sort", "asc"),
                ("limit", "50000"),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(BriefingError::Provider {
                provider: PROVIDER.to_string(),
                message: format!("HTTP error: {}", response.status()),
            });
        }

        let data: serde_json::Value = response.json().await?;
        parse_aggregates(symbol, &data)
    }
}

#[async_trait]
impl MarketDataSource for PolygonClient {
    async fn daily_series(&self, symbol: &str) -> Result<OhlcvSeries> {
        self.get_daily(symbol).await
    }

    fn name(&self) -> &str {
        PROVIDER
    }
}

/// Parse a Polygon aggregates payload into a series
///
/// The payload carries a `results` array of short-coded records
/// (`o,h,l,c,v,t`) with `t` in epoch milliseconds.
pub fn parse_aggregates(symbol: &str, data: &serde_json::Value) -> Result<OhlcvSeries> {
    if data.get("status").and_then(|s| s.as_str()) == Some("ERROR") {
        let message = data
            .get("error")
            .and_then(|e| e.as_str())
            .unwrap_or("unknown error");
        return Err(BriefingError::Provider {
            provider: PROVIDER.to_string(),
            message: message.to_string(),
        });
    }

    let results = match data.get("results").and_then(|r| r.as_array()) {
        Some(results) if !results.is_empty() => results,
        _ => {
            return Err(BriefingError::NoData {
                symbol: symbol.to_string(),
            });
        }
    };

    let mut bars = Vec::with_capacity(results.len());
    for record in results {
        let millis = record["t"].as_i64().ok_or_else(|| BriefingError::Provider {
            provider: PROVIDER.to_string(),
            message: "aggregate record missing timestamp".to_string(),
        })?;
        let date = DateTime::<Utc>::from_timestamp_millis(millis)
            .ok_or_else(|| BriefingError::Provider {
                provider: PROVIDER.to_string(),
                message: format!("timestamp out of range: {millis}"),
            })?
            .date_naive();

        bars.push(DailyBar {
            date,
            open: record["o"].as_f64().unwrap_or(0.0),
            high: record["h"].as_f64().unwrap_or(0.0),
            low: record["l"].as_f64().unwrap_or(0.0),
            close: record["c"].as_f64().unwrap_or(0.0),
            // Volume may arrive as a float
            volume: record["v"].as_f64().unwrap_or(0.0) as u64,
        });
    }

    Ok(OhlcvSeries::new(bars))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_aggregates() {
        let data = json!({
            "ticker": "AAPL",
            "status": "OK",
            "resultsCount": 2,
            "results": [
                { "o": 178.0, "h": 180.1, "l": 177.5, "c": 179.9, "v": 48000000.0, "t": 1709251200000i64 },
                { "o": 180.0, "h": 182.5, "l": 179.25, "c": 181.0, "v": 51234567.0, "t": 1709510400000i64 }
            ]
        });

        let series = parse_aggregates("AAPL", &data).unwrap();
        assert_eq!(series.len(), 2);

        let first = series.bars()[0];
        assert_eq!(first.date.to_string(), "2024-03-01");
        assert_eq!(first.high, 180.1);
        assert_eq!(first.volume, 48_000_000);
    }

    #[test]
    fn test_parse_empty_results_is_no_data() {
        let data = json!({ "ticker": "ZZZZINVALID", "status": "OK", "resultsCount": 0, "results": [] });
        let err = parse_aggregates("ZZZZINVALID", &data).unwrap_err();
        assert!(matches!(err, BriefingError::NoData { .. }));
    }

    #[test]
    fn test_parse_missing_results_is_no_data() {
        let data = json!({ "ticker": "ZZZZINVALID", "status": "OK", "resultsCount": 0 });
        let err = parse_aggregates("ZZZZINVALID", &data).unwrap_err();
        assert!(matches!(err, BriefingError::NoData { .. }));
    }

    #[test]
    fn test_parse_error_status() {
        let data = json!({ "status": "ERROR", "error": "Unknown API Key" });
        let err = parse_aggregates("AAPL", &data).unwrap_err();
        assert!(matches!(err, BriefingError::Provider { .. }));
    }

    #[tokio::test]
    #[ignore] // Requires API key and network access
    async fn test_get_daily() {
        let client = PolygonClient::from_env().unwrap();
        let series = client.get_daily("AAPL").await.unwrap();
        assert!(!series.is_empty());
    }
}
