//! Report generation pipeline: fetch → render → analyze → persist

use crate::analysis::{AnalysisReport, Analyzer};
use crate::api::MarketDataSource;
use crate::chart;
use crate::error::{BriefingError, Result};
use crate::report::markdown;
use crate::report::store::ReportStore;
use chrono::{DateTime, Local};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

/// Fallback texts substituted when the analysis pipeline fails
pub const ANALYSIS_PLACEHOLDER: &str = "Analysis placeholder.";
pub const RECOMMENDATION_PLACEHOLDER: &str = "Recommendation placeholder.";

/// A successfully generated report pair
#[derive(Debug, Clone)]
pub struct GeneratedReport {
    pub symbol: String,
    pub generated_at: DateTime<Local>,
    pub base_name: String,
    pub markdown_path: PathBuf,
    pub image_path: PathBuf,
}

/// Shared filename stem linking a report's markdown and image files
pub fn base_name(symbol: &str, generated_at: DateTime<Local>) -> String {
    format!(
        "{symbol}_daily_report_{}",
        generated_at.format("%Y%m%d_%H%M%S")
    )
}

/// Orchestrates one report generation pass
///
/// The pass is a single sequence, terminal on the first hard failure:
/// fetch and chart failures abort with nothing persisted, analysis
/// failures degrade to placeholder text, and the markdown write is
/// the durability point. Two calls for the same symbol at different
/// moments produce two distinct, timestamp-qualified reports.
pub struct ReportGenerator {
    source: Arc<dyn MarketDataSource>,
    analyzer: Arc<dyn Analyzer>,
    store: ReportStore,
}

impl ReportGenerator {
    pub fn new(
        source: Arc<dyn MarketDataSource>,
        analyzer: Arc<dyn Analyzer>,
        store: ReportStore,
    ) -> Self {
        Self {
            source,
            analyzer,
            store,
        }
    }

    pub fn store(&self) -> &ReportStore {
        &self.store
    }

    /// Generate a briefing report for a symbol
    pub async fn generate(&self, symbol: &str) -> Result<GeneratedReport> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(BriefingError::Config(
                "stock symbol must not be empty".to_string(),
            ));
        }

        let series = self.source.daily_series(symbol).await.inspect_err(|e| {
            tracing::error!(symbol, error = %e, "market data fetch failed");
        })?;
        if series.is_empty() {
            return Err(BriefingError::NoData {
                symbol: symbol.to_string(),
            });
        }
        tracing::info!(symbol, bars = series.len(), "fetched daily series");

        let generated_at = Local::now();
        let base_name = base_name(symbol, generated_at);

        self.store.ensure_dir()?;
        let image_path = self.store.image_path(&base_name);
        if let Err(e) = chart::render_candlestick_chart(symbol, &series, &image_path) {
            tracing::error!(symbol, error = %e, "chart rendering failed");
            // A partially written image must not outlive the failure
            let _ = fs::remove_file(&image_path);
            return Err(e);
        }

        let analysis = match self.analyzer.analyze(symbol).await {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!(symbol, error = %e, "analysis failed, degrading to placeholders");
                AnalysisReport {
                    analysis: ANALYSIS_PLACEHOLDER.to_string(),
                    recommendation: RECOMMENDATION_PLACEHOLDER.to_string(),
                }
            }
        };

        let content = markdown::build_report(
            symbol,
            &format!("{base_name}.png"),
            &analysis.analysis,
            &analysis.recommendation,
        );

        let markdown_path = self.store.markdown_path(&base_name);
        fs::write(&markdown_path, &content)?;
        tracing::info!(symbol, report = %markdown_path.display(), "report generated");

        Ok(GeneratedReport {
            symbol: symbol.to_string(),
            generated_at,
            base_name,
            markdown_path,
            image_path,
        })
    }
}
