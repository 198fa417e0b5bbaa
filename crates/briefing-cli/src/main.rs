//! Command-line front end for the briefing pipeline

use anyhow::Context;
use briefing::analysis::PipelineConfig;
use briefing::{
    AlphaVantageClient, Analyzer, BriefingConfig, DeleteOutcome, InvestmentPipeline,
    MarketDataProvider, MarketDataSource, NullAnalyzer, OpenAiProvider, PolygonClient,
    ReportGenerator, ReportStore,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;

#[derive(Parser, Debug)]
#[command(name = "briefing")]
#[command(about = "Daily stock briefing report generator", long_about = None)]
struct Cli {
    /// Directory where report markdown/image pairs are stored
    #[arg(long, default_value = "reports")]
    reports_dir: PathBuf,

    /// Market data provider
    #[arg(long, value_enum, default_value = "alpha-vantage")]
    provider: ProviderArg,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ProviderArg {
    AlphaVantage,
    Polygon,
}

impl From<ProviderArg> for MarketDataProvider {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::AlphaVantage => MarketDataProvider::AlphaVantage,
            ProviderArg::Polygon => MarketDataProvider::Polygon,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a new briefing report for a stock symbol
    Generate {
        /// Stock ticker symbol (e.g. AAPL)
        symbol: String,

        /// Skip the LLM analysis stage; placeholder text is used
        #[arg(long)]
        no_analysis: bool,
    },
    /// List stored reports
    List {
        /// Only reports whose name starts with this symbol prefix
        #[arg(long)]
        symbol: Option<String>,
    },
    /// Print a stored report
    Show {
        /// Report id (markdown base name) as printed by `list`
        id: String,
    },
    /// Delete a report and its chart image
    Delete {
        /// Report id (markdown base name) as printed by `list`
        id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    briefing::logging::init_tracing();

    let Cli {
        reports_dir,
        provider,
        command,
    } = Cli::parse();
    let store = ReportStore::new(&reports_dir);

    match command {
        Command::Generate {
            symbol,
            no_analysis,
        } => {
            let config = load_config(provider, &reports_dir)?;
            let source = build_source(&config)?;
            let analyzer = build_analyzer(&config, no_analysis)?;
            let generator = ReportGenerator::new(source, analyzer, store);

            match generator.generate(&symbol).await {
                Ok(report) => {
                    println!("Report generated: {}", report.markdown_path.display());
                }
                Err(e) => {
                    eprintln!("Failed to generate report: {e}");
                    std::process::exit(1);
                }
            }
        }
        Command::List { symbol } => {
            let ids = store.list(symbol.as_deref())?;
            if ids.is_empty() {
                println!("No reports found.");
            }
            for id in ids {
                println!("{id}");
            }
        }
        Command::Show { id } => match store.load(&id)? {
            Some(report) => {
                println!("{}", report.markdown);
                match report.image_path {
                    Some(path) => println!("[chart image: {}]", path.display()),
                    None => println!("[no associated chart image found]"),
                }
            }
            None => {
                eprintln!("Report {id} not found. It may have already been deleted.");
            }
        },
        Command::Delete { id } => match store.delete(&id)? {
            DeleteOutcome::Deleted => {
                println!("Report {id} and its associated image deleted.");
            }
            DeleteOutcome::NotFound => {
                eprintln!("Report {id} not found. It may have already been deleted.");
            }
        },
    }

    Ok(())
}

/// Build the configuration from CLI flags and environment API keys
fn load_config(provider: ProviderArg, reports_dir: &Path) -> anyhow::Result<BriefingConfig> {
    let config = BriefingConfig {
        provider: provider.into(),
        report_dir: reports_dir.to_path_buf(),
        ..Default::default()
    }
    .with_env_api_keys();

    let key_var = match config.provider {
        MarketDataProvider::AlphaVantage => "ALPHA_VANTAGE_API_KEY",
        MarketDataProvider::Polygon => "POLYGON_API_KEY",
    };
    config
        .validate()
        .with_context(|| format!("missing market data API key; set {key_var}"))?;
    Ok(config)
}

fn build_source(config: &BriefingConfig) -> anyhow::Result<Arc<dyn MarketDataSource>> {
    let api_key = config
        .market_data_api_key
        .clone()
        .context("market data API key not configured")?;

    let source: Arc<dyn MarketDataSource> = match config.provider {
        MarketDataProvider::AlphaVantage => Arc::new(
            AlphaVantageClient::new(api_key, config.rate_limit)
                .with_output_size(&config.output_size)
                .with_timeout(config.request_timeout)?,
        ),
        MarketDataProvider::Polygon => {
            Arc::new(PolygonClient::new(api_key).with_timeout(config.request_timeout)?)
        }
    };
    Ok(source)
}

/// Pick the analyzer: the LLM pipeline when a key is configured,
/// otherwise the null analyzer so reports degrade to placeholders
fn build_analyzer(config: &BriefingConfig, no_analysis: bool) -> anyhow::Result<Arc<dyn Analyzer>> {
    if no_analysis {
        return Ok(Arc::new(NullAnalyzer));
    }

    match &config.openai_api_key {
        Some(key) => {
            let provider = Arc::new(OpenAiProvider::new(key.clone())?);
            let pipeline_config = PipelineConfig {
                model: config.model.clone(),
                max_tokens: config.max_tokens,
                temperature: config.temperature,
            };
            Ok(Arc::new(InvestmentPipeline::new(provider, pipeline_config)))
        }
        None => {
            warn!("OPENAI_API_KEY not set; reports will carry placeholder analysis");
            Ok(Arc::new(NullAnalyzer))
        }
    }
}
