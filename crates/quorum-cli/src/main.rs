//! Quorum CLI.
//!
//! Runs one query through the full pipeline and prints the outcome as
//! JSON. Provider credentials come from the environment; everything
//! else from an optional JSON config file.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use quorum_runtime::{QueryOptions, QueryPipeline, RuntimeConfig};

#[derive(Parser, Debug)]
#[command(
    name = "quorum",
    version,
    about = "Query a panel of model providers in parallel and score the trustworthiness of their answers"
)]
struct Cli {
    /// The query to dispatch.
    query: String,

    /// Path to a JSON config file; defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip the adversarial risk review.
    #[arg(long)]
    no_adversarial: bool,

    /// Skip the defensive trust review.
    #[arg(long)]
    no_defensive: bool,

    /// Skip the synthesis review.
    #[arg(long)]
    no_synthesis: bool,

    /// Skip web-search context augmentation.
    #[arg(long)]
    no_web_search: bool,

    /// Skip truth verification.
    #[arg(long)]
    no_verification: bool,

    /// File whose text is prepended to the query as context.
    #[arg(long)]
    context_file: Option<PathBuf>,

    /// Emit compact JSON instead of pretty-printed.
    #[arg(long)]
    compact: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => RuntimeConfig::from_json_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => RuntimeConfig::default(),
    };

    let file_context = match &cli.context_file {
        Some(path) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("reading context file {}", path.display()))?,
        ),
        None => None,
    };

    let options = QueryOptions {
        adversarial_review: !cli.no_adversarial,
        defensive_review: !cli.no_defensive,
        synthesis_review: !cli.no_synthesis,
        web_search: !cli.no_web_search,
        truth_verification: !cli.no_verification,
        file_context,
    };

    let pipeline = QueryPipeline::from_config(&config);
    tracing::debug!(?options, "running query");
    let outcome = pipeline.run(&cli.query, &options).await?;

    let rendered = if cli.compact {
        serde_json::to_string(&outcome)?
    } else {
        serde_json::to_string_pretty(&outcome)?
    };
    println!("{rendered}");

    Ok(())
}
