//! Alpha Vantage API client

use crate::api::MarketDataSource;
use crate::error::{BriefingError, Result};
use crate::series::{DailyBar, OhlcvSeries};
use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::Arc;

const BASE_URL: &str = "https://www.alphavantage.co/query";
const PROVIDER: &str = "Alpha Vantage";

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Alpha Vantage API client for daily time series
#[derive(Debug, Clone)]
pub struct AlphaVantageClient {
    client: Client,
    api_key: String,
    base_url: String,
    output_size: String,
    rate_limiter: SharedRateLimiter,
}

impl AlphaVantageClient {
    /// Create a new Alpha Vantage client with API key and rate limit
    ///
    /// # Arguments
    /// * `api_key` - Alpha Vantage API key
    /// * `rate_limit` - Maximum requests per minute (5 for the free tier)
    pub fn new(api_key: impl Into<String>, rate_limit: u32) -> Self {
        let quota =
            Quota::per_minute(NonZeroU32::new(rate_limit).unwrap_or(NonZeroU32::new(5).unwrap()));
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
            output_size: "compact".to_string(),
            rate_limiter,
        }
    }

    /// Create from environment variable ALPHA_VANTAGE_API_KEY with the
    /// free-tier rate limit
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("ALPHA_VANTAGE_API_KEY").map_err(|_| {
            BriefingError::Config(
                "ALPHA_VANTAGE_API_KEY environment variable not set".to_string(),
            )
        })?;

        Ok(Self::new(api_key, 5))
    }

    /// Override the base URL (for tests and proxies)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the output size ("compact" for ~100 trailing days, "full")
    pub fn with_output_size(mut self, output_size: impl Into<String>) -> Self {
        self.output_size = output_size.into();
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

    /// Fetch the daily time series for a symbol
    pub async fn get_daily(&self, symbol: &str) -> Result<OhlcvSeries> {
        // Wait for rate limiter
        self.rate_limiter.until_ready().await;

        let mut params = HashMap::new();
        params.insert("function", "TIME_SERIES_DAILY");
        params.insert("symbol", symbol);
        params.insert("outputsize", &self.output_size);
        params.insert("apikey", &self.api_key);

        tracing::debug!(symbol, "fetching Alpha Vantage daily series");

        let response = self.client.get(&self.base_url).query(&params).send().await?;

        if !response.status().is_success() {
            return Err(BriefingError::Provider {
                provider: PROVIDER.to_string(),
                message: format!("HTTP error: {}", response.status()),
            });
        }

        let data: serde_json::Value = response.json().await?;
        parse_daily_series(symbol, &data)
    }
}

#[async_trait]
impl MarketDataSource for AlphaVantageClient {
    async fn daily_series(&self, symbol: &str) -> Result<OhlcvSeries> {
        self.get_daily(symbol).await
    }

    fn name(&self) -> &str {
        PROVIDER
    }
}

/// Parse an Alpha Vantage TIME_SERIES_DAILY payload into a series
///
/// The payload is a flat object keyed by date string, with numeric
/// fields encoded as strings (`"1. open"` through `"5. volume"`).
pub fn parse_daily_series(symbol: &str, data: &serde_json::Value) -> Result<OhlcvSeries> {
    // Check for API error messages
    if let Some(error) = data.get("Error Message") {
        return Err(BriefingError::Provider {
            provider: PROVIDER.to_string(),
            message: error.as_str().unwrap_or("unknown error").to_string(),
        });
    }

    if data.get("Note").is_some() {
        return Err(BriefingError::RateLimitExceeded {
            provider: PROVIDER.to_string(),
        });
    }

    let series = data
        .get("Time Series (Daily)")
        .and_then(|s| s.as_object())
        .ok_or_else(|| BriefingError::NoData {
            symbol: symbol.to_string(),
        })?;

    let mut bars = Vec::with_capacity(series.len());
    for (date, values) in series {
        let date = date.parse().map_err(|_| BriefingError::Provider {
            provider: PROVIDER.to_string(),
            message: format!("unparseable date key: {date}"),
        })?;

        bars.push(DailyBar {
            date,
            open: field_as_f64(values, "1. open"),
            high: field_as_f64(values, "2. high"),
            low: field_as_f64(values, "3. low"),
            close: field_as_f64(values, "4. close"),
            volume: values["5. volume"]
                .as_str()
                .unwrap_or("0")
                .parse()
                .unwrap_or(0),
        });
    }

    if bars.is_empty() {
        return Err(BriefingError::NoData {
            symbol: symbol.to_string(),
        });
    }

    Ok(OhlcvSeries::new(bars))
}

fn field_as_f64(values: &serde_json::Value, key: &str) -> f64 {
    values[key].as_str().unwrap_or("0").parse().unwrap_or(0.0)
}
