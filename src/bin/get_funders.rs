//! Retrieve all funding information for a project from supported sources.
//!
//! Usage:
//!   get_funders pandas-dev/pandas
//!
//! Sources that need credentials read them from the environment
//! (GITHUB_TOKEN, OPENCOLLECTIVE_API_KEY); sources whose credential is
//! absent are skipped with a warning. Dataset-backed sources always run.

use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use funder_finder::{production_sources, Aggregator, FunderFinderConfig};

#[derive(Parser, Debug)]
#[command(name = "get_funders")]
struct Args {
    /// GitHub identifier for the project, e.g. georgetown-cset/funder-finder
    repo_name: String,

    /// Per-source timeout in seconds
    #[arg(long, default_value_t = 60)]
    timeout: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "funder_finder=info".into()),
        )
        .init();

    let args = Args::parse();
    let config = FunderFinderConfig::from_env();
    let aggregator = Aggregator::new(production_sources(&config))
        .with_timeout(Duration::from_secs(args.timeout));

    let records = aggregator.aggregate_identifier(&args.repo_name).await?;
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}
