//! Daily stock briefing report pipeline
//!
//! This crate fetches daily OHLCV data for a stock symbol, renders a
//! candlestick/volume chart to a PNG, runs a best-effort LLM analysis
//! pipeline, and assembles everything into a markdown briefing report
//! stored on disk. It includes:
//!
//! - Market data clients for two wire shapes (Alpha Vantage daily
//!   time series, Polygon-style aggregates)
//! - A two-panel candlestick + volume chart renderer
//! - A sequential research → analysis → recommendation text pipeline
//!   behind a pluggable [`Analyzer`] trait
//! - A report assembler that degrades to placeholder text when the
//!   analysis stage fails
//! - A flat-directory report store (list / load / delete of
//!   markdown + image pairs)
//!
//! # Example
//!
//! ```rust,ignore
//! use briefing::{AlphaVantageClient, NullAnalyzer, ReportGenerator, ReportStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> briefing::Result<()> {
//!     let source = Arc::new(AlphaVantageClient::new("your_api_key", 5));
//!     let store = ReportStore::new("reports");
//!     let generator = ReportGenerator::new(source, Arc::new(NullAnalyzer), store);
//!
//!     let report = generator.generate("AAPL").await?;
//!     println!("report written to {}", report.markdown_path.display());
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod api;
pub mod chart;
pub mod config;
pub mod error;
pub mod logging;
pub mod report;
pub mod series;

// Re-export main types for convenience
pub use analysis::{AnalysisReport, Analyzer, InvestmentPipeline, NullAnalyzer, OpenAiProvider};
pub use api::{AlphaVantageClient, MarketDataSource, PolygonClient};
pub use config::{BriefingConfig, MarketDataProvider};
pub use error::{BriefingError, Result};
pub use report::{DeleteOutcome, GeneratedReport, LoadedReport, ReportGenerator, ReportStore};
pub use series::{DailyBar, OhlcvSeries};
