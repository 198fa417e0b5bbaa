//! Configuration for the briefing pipeline

use crate::error::{BriefingError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Market data provider for daily bars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketDataProvider {
    /// Alpha Vantage daily time series (default)
    AlphaVantage,
    /// Polygon-style daily aggregates
    Polygon,
}

impl Default for MarketDataProvider {
    fn default() -> Self {
        Self::AlphaVantage
    }
}

/// Configuration for report generation
///
/// API keys are always passed in explicitly; nothing in the library
/// reads credentials from ambient global state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BriefingConfig {
    /// Which market data provider to use
    pub provider: MarketDataProvider,

    /// Market data API key (Alpha Vantage or Polygon)
    pub market_data_api_key: Option<String>,

    /// OpenAI-compatible API key for the analysis pipeline
    pub openai_api_key: Option<String>,

    /// Directory where report markdown/image pairs are stored
    pub report_dir: PathBuf,

    /// Alpha Vantage output size ("compact" = trailing ~100 days,
    /// "full" = full history)
    pub output_size: String,

    /// Maximum market data requests per minute
    pub rate_limit: u32,

    /// Request timeout duration
    pub request_timeout: Duration,

    /// LLM model for the analysis pipeline
    pub model: String,

    /// Max tokens per analysis stage completion
    pub max_tokens: usize,

    /// Sampling temperature for analysis completions
    pub temperature: f32,
}

impl Default for BriefingConfig {
    fn default() -> Self {
        Self {
            provider: MarketDataProvider::AlphaVantage,
            market_data_api_key: None,
            openai_api_key: None,
            report_dir: PathBuf::from("reports"),
            output_size: "compact".to_string(),
            rate_limit: 5, // Alpha Vantage free tier
            request_timeout: Duration::from_secs(30),
            model: "gpt-4o".to_string(),
            max_tokens: 2048,
            temperature: 0.7,
        }
    }
}

impl BriefingConfig {
    /// Create a new configuration builder
    pub fn builder() -> BriefingConfigBuilder {
        BriefingConfigBuilder::default()
    }

    /// Load API keys from the environment
    /// (`ALPHA_VANTAGE_API_KEY` / `POLYGON_API_KEY`, `OPENAI_API_KEY`)
    pub fn with_env_api_keys(mut self) -> Self {
        let market_var = match self.provider {
            MarketDataProvider::AlphaVantage => "ALPHA_VANTAGE_API_KEY",
            MarketDataProvider::Polygon => "POLYGON_API_KEY",
        };
        if let Ok(key) = std::env::var(market_var) {
            self.market_data_api_key = Some(key);
        }
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            self.openai_api_key = Some(key);
        }
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.market_data_api_key.is_none() {
            return Err(BriefingError::Config(
                "market data API key is required".to_string(),
            ));
        }

        if self.rate_limit == 0 {
            return Err(BriefingError::Config(
                "rate_limit must be greater than 0".to_string(),
            ));
        }

        if !matches!(self.output_size.as_str(), "compact" | "full") {
            return Err(BriefingError::Config(format!(
                "output_size must be \"compact\" or \"full\", got {:?}",
                self.output_size
            )));
        }

        Ok(())
    }
}

/// Builder for BriefingConfig
#[derive(Debug, Default)]
pub struct BriefingConfigBuilder {
    provider: Option<MarketDataProvider>,
    market_data_api_key: Option<String>,
    openai_api_key: Option<String>,
    report_dir: Option<PathBuf>,
    output_size: Option<String>,
    rate_limit: Option<u32>,
    request_timeout: Option<Duration>,
    model: Option<String>,
    max_tokens: Option<usize>,
    temperature: Option<f32>,
}

impl BriefingConfigBuilder {
    /// Set the market data provider
    pub fn provider(mut self, provider: MarketDataProvider) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the market data API key
    pub fn market_data_api_key(mut self, key: impl Into<String>) -> Self {
        self.market_data_api_key = Some(key.into());
        self
    }

    /// Set the OpenAI-compatible API key
    pub fn openai_api_key(mut self, key: impl Into<String>) -> Self {
        self.openai_api_key = Some(key.into());
        self
    }

    /// Set the report directory
    pub fn report_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.report_dir = Some(dir.into());
        self
    }

    /// Set the Alpha Vantage output size
    pub fn output_size(mut self, size: impl Into<String>) -> Self {
        self.output_size = Some(size.into());
        self
    }

    /// Set the market data rate limit (requests per minute)
    pub fn rate_limit(mut self, limit: u32) -> Self {
        self.rate_limit = Some(limit);
        self
    }

    /// Set the request timeout
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Set the LLM model used by the analysis pipeline
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set max tokens per analysis completion
    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the sampling temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<BriefingConfig> {
        let defaults = BriefingConfig::default();

        let config = BriefingConfig {
            provider: self.provider.unwrap_or(defaults.provider),
            market_data_api_key: self.market_data_api_key,
            openai_api_key: self.openai_api_key,
            report_dir: self.report_dir.unwrap_or(defaults.report_dir),
            output_size: self.output_size.unwrap_or(defaults.output_size),
            rate_limit: self.rate_limit.unwrap_or(defaults.rate_limit),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            model: self.model.unwrap_or(defaults.model),
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
            temperature: self.temperature.unwrap_or(defaults.temperature),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BriefingConfig::default();
        assert_eq!(config.provider, MarketDataProvider::AlphaVantage);
        assert_eq!(config.report_dir, PathBuf::from("reports"));
        assert_eq!(config.rate_limit, 5);
    }

    #[test]
    fn test_config_builder() {
        let config = BriefingConfig::builder()
            .provider(MarketDataProvider::Polygon)
            .market_data_api_key("test_key")
            .report_dir("/tmp/reports")
            .rate_limit(10)
            .build()
            .unwrap();

        assert_eq!(config.provider, MarketDataProvider::Polygon);
        assert_eq!(config.rate_limit, 10);
        assert_eq!(config.report_dir, PathBuf::from("/tmp/reports"));
    }

    #[test]
    fn test_validation_requires_market_data_key() {
        let result = BriefingConfig::builder().build();
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_output_size() {
        let result = BriefingConfig::builder()
            .market_data_api_key("test_key")
            .output_size("gigantic")
            .build();
        assert!(result.is_err());
    }
}
