//! Best-effort investment analysis pipeline
//!
//! The report assembler depends only on the [`Analyzer`] trait; the
//! LLM-backed [`InvestmentPipeline`] is one implementation and a
//! mockable seam for tests.

pub mod llm;
pub mod pipeline;

pub use llm::{CompletionRequest, LlmProvider, OpenAiProvider};
pub use pipeline::{InvestmentPipeline, PipelineConfig};

use crate::error::{BriefingError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Free-text analysis output, markdown-renderable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub analysis: String,
    pub recommendation: String,
}

/// Capability interface for the analysis stage
///
/// Failure is expected and non-fatal: callers degrade to placeholder
/// text rather than aborting report generation.
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Run the analysis pipeline for a symbol or topic
    async fn analyze(&self, topic: &str) -> Result<AnalysisReport>;
}

/// Analyzer that always fails, forcing the placeholder path
///
/// Used when no LLM credential is configured or analysis is disabled.
pub struct NullAnalyzer;

#[async_trait]
impl Analyzer for NullAnalyzer {
    async fn analyze(&self, _topic: &str) -> Result<AnalysisReport> {
        Err(BriefingError::Analysis(
            "analysis is not configured".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_null_analyzer_always_fails() {
        let err = NullAnalyzer.analyze("AAPL").await.unwrap_err();
        assert!(matches!(err, BriefingError::Analysis(_)));
    }
}
