//! Market data API clients

pub mod alpha_vantage;
pub mod polygon;

pub use alpha_vantage::AlphaVantageClient;
pub use polygon::PolygonClient;

use crate::error::Result;
use crate::series::OhlcvSeries;
use async_trait::async_trait;

/// A provider of daily OHLCV bars for a stock symbol
///
/// Implementations issue one synchronous request per call and do not
/// retry. An empty upstream payload is reported as
/// [`BriefingError::NoData`](crate::BriefingError::NoData), never as
/// an empty series.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Fetch the daily series for a symbol, ascending by date
    async fn daily_series(&self, symbol: &str) -> Result<OhlcvSeries>;

    /// Provider name for error messages and logging
    fn name(&self) -> &str;
}
