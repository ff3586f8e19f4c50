//! Autoresearcher - Entry Point
//!
//! `search` saves the top papers for a question; `review` turns papers into a
//! cited literature review printed on stdout.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use autoresearcher::client::{OpenAiClient, SemanticScholarClient};
use autoresearcher::config::Config;
use autoresearcher::models::{FailurePolicy, ModelTier, Paper};
use autoresearcher::pipeline::{KeywordGenerator, LiteratureReviewPipeline};
use autoresearcher::services::{CompletionService, PaperSource};
use autoresearcher::sources::{self, ManualDocument, SemanticScholarSource};

#[derive(Parser, Debug)]
#[command(name = "autoresearcher")]
#[command(about = "Generate cited academic literature reviews")]
#[command(version)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG", global = true)]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search Semantic Scholar and save the top papers as JSON
    Search {
        /// Research question
        research_question: String,

        /// Where to write the papers
        #[arg(long, short)]
        output: PathBuf,
    },

    /// Generate a literature review
    Review(ReviewArgs),
}

#[derive(Args, Debug)]
struct ReviewArgs {
    /// Research question
    research_question: String,

    /// JSON file of papers saved by `search`
    #[arg(long)]
    papers: Option<PathBuf>,

    /// Text files of manually supplied documents (comma separated or repeated)
    #[arg(long, value_delimiter = ',')]
    manual: Vec<PathBuf>,

    /// Search Semantic Scholar instead of reading a papers file
    #[arg(long, conflicts_with = "papers")]
    search: bool,

    /// Use the stronger model tier for extraction and synthesis
    #[arg(long)]
    strong: bool,

    /// What to do when one paper's extraction fails: skip or abort
    #[arg(long, default_value = "skip")]
    on_error: FailurePolicy,

    /// Papers extracted concurrently (order is preserved)
    #[arg(long, default_value_t = 1)]
    concurrency: usize,

    /// Print the review as a JSON envelope instead of text
    #[arg(long)]
    json: bool,
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

fn paper_source(config: &Config) -> anyhow::Result<SemanticScholarSource> {
    let completion: Arc<dyn CompletionService> = Arc::new(OpenAiClient::new(config)?);
    let client = SemanticScholarClient::new(config)?;
    Ok(SemanticScholarSource::new(config, client, KeywordGenerator::new(completion)))
}

async fn search(config: &Config, research_question: &str, output: &Path) -> anyhow::Result<()> {
    let source = paper_source(config)?;
    let papers = source
        .fetch_papers(research_question)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_user_message()))?;

    sources::write_papers(output, &papers)?;
    tracing::info!(papers = papers.len(), output = %output.display(), "Papers saved");
    Ok(())
}

async fn review(mut config: Config, args: ReviewArgs) -> anyhow::Result<()> {
    if args.strong {
        config.extraction_tier = ModelTier::Strong;
        config.synthesis_tier = ModelTier::Strong;
    }
    config.failure_policy = args.on_error;
    config.extraction_concurrency = args.concurrency;
    config.validate()?;

    let mut papers: Vec<Paper> = if let Some(path) = &args.papers {
        sources::read_papers(path)?
    } else if args.search {
        paper_source(&config)?
            .fetch_papers(&args.research_question)
            .await
            .map_err(|e| anyhow::anyhow!(e.to_user_message()))?
    } else {
        Vec::new()
    };

    for path in &args.manual {
        papers.push(ManualDocument::read(path)?.into_paper());
    }

    if papers.is_empty() {
        tracing::warn!("No papers to review; pass --papers, --search or --manual");
    }

    let pipeline = LiteratureReviewPipeline::from_config(&config)?;
    let review = pipeline
        .run(&args.research_question, &papers)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_user_message()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&review)?);
    } else {
        println!("{review}");
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting autoresearcher");

    let config = Config::from_env()?;
    tracing::debug!(config = ?config, "Configuration loaded");

    match cli.command {
        Command::Search { research_question, output } => {
            search(&config, &research_question, &output).await
        }
        Command::Review(args) => review(config, args).await,
    }
}
