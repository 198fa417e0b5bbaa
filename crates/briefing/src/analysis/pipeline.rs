//! Sequential research → analysis → recommendation pipeline

use super::llm::{CompletionRequest, LlmProvider};
use super::{AnalysisReport, Analyzer};
use crate::error::{BriefingError, Result};
use async_trait::async_trait;
use std::sync::Arc;

const RESEARCHER_SYSTEM: &str = r#"You are an expert investment researcher.

Using the topic given to you, conduct comprehensive research across
public sources and provide a detailed report of the most relevant
recent findings: price-moving events, earnings, guidance, analyst
actions, and sector context. Cite the nature of each source.
"#;

const ANALYST_SYSTEM: &str = r#"You are an expert investment analyst.

You receive a research report on a stock and analyze it for insights:
what is driving the price, what risks stand out, and how the company
compares to its sector. Work only from the research given to you.
"#;

const RECOMMENDER_SYSTEM: &str = r#"You are an expert investment recommender.

You receive an analyst's insights and offer a recommendation on
whether to invest or not. List the pros and cons as bullet points and
close with a clear stance.
"#;

/// Per-stage completion parameters
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub model: String,
    pub max_tokens: usize,
    pub temperature: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            max_tokens: 2048,
            temperature: 0.7,
        }
    }
}

/// Three-stage investment analysis pipeline
///
/// Stages run strictly in sequence; each stage's prompt embeds the
/// previous stage's output. The first failing stage fails the whole
/// pipeline — the caller decides whether that is fatal (the report
/// assembler degrades to placeholder text).
pub struct InvestmentPipeline {
    provider: Arc<dyn LlmProvider>,
    config: PipelineConfig,
}

impl InvestmentPipeline {
    pub fn new(provider: Arc<dyn LlmProvider>, config: PipelineConfig) -> Self {
        Self { provider, config }
    }

    async fn run_stage(&self, system: &str, prompt: String) -> Result<String> {
        let request = CompletionRequest {
            model: self.config.model.clone(),
            system: system.to_string(),
            prompt,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        self.provider
            .complete(request)
            .await
            .map_err(|e| BriefingError::Analysis(e.to_string()))
    }
}

#[async_trait]
impl Analyzer for InvestmentPipeline {
    async fn analyze(&self, topic: &str) -> Result<AnalysisReport> {
        tracing::info!(topic, "starting investment analysis pipeline");

        let research = self
            .run_stage(
                RESEARCHER_SYSTEM,
                format!("Research the latest developments for {topic}."),
            )
            .await?;

        let analysis = self
            .run_stage(
                ANALYST_SYSTEM,
                format!("Analyze {topic} based on this research:\n\n{research}"),
            )
            .await?;

        let recommendation = self
            .run_stage(
                RECOMMENDER_SYSTEM,
                format!(
                    "Based on the following analysis of {topic}, offer an \
                     investment recommendation:\n\n{analysis}"
                ),
            )
            .await?;

        Ok(AnalysisReport {
            analysis,
            recommendation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records every prompt and replies with canned stage outputs
    struct ScriptedProvider {
        prompts: Mutex<Vec<String>>,
        fail_at: Option<usize>,
    }

    impl ScriptedProvider {
        fn new(fail_at: Option<usize>) -> Self {
            Self {
                prompts: Mutex::new(Vec::new()),
                fail_at,
            }
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        async fn complete(&self, request: CompletionRequest) -> Result<String> {
            let mut prompts = self.prompts.lock().unwrap();
            let stage = prompts.len();
            prompts.push(request.prompt);

            if self.fail_at == Some(stage) {
                return Err(BriefingError::Analysis("stage failed".to_string()));
            }
            Ok(format!("stage {stage} output"))
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    #[tokio::test]
    async fn test_stages_run_in_order_and_chain_outputs() {
        let provider = Arc::new(ScriptedProvider::new(None));
        let pipeline = InvestmentPipeline::new(
            Arc::clone(&provider) as Arc<dyn LlmProvider>,
            PipelineConfig::default(),
        );

        let report = pipeline.analyze("AAPL").await.unwrap();
        assert_eq!(report.analysis, "stage 1 output");
        assert_eq!(report.recommendation, "stage 2 output");

        let prompts = provider.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 3);
        assert!(prompts[0].contains("AAPL"));
        // Analysis stage consumes the research output
        assert!(prompts[1].contains("stage 0 output"));
        // Recommendation stage consumes the analysis output
        assert!(prompts[2].contains("stage 1 output"));
    }

    #[tokio::test]
    async fn test_failing_stage_fails_pipeline() {
        let provider = Arc::new(ScriptedProvider::new(Some(1)));
        let pipeline = InvestmentPipeline::new(
            Arc::clone(&provider) as Arc<dyn LlmProvider>,
            PipelineConfig::default(),
        );

        let err = pipeline.analyze("AAPL").await.unwrap_err();
        assert!(matches!(err, BriefingError::Analysis(_)));

        // The recommendation stage never runs after the analysis stage fails
        assert_eq!(provider.prompts.lock().unwrap().len(), 2);
    }
}
