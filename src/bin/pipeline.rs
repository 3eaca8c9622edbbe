//! Download and process SEC Form 4 filings for a company universe.

use anyhow::Result;
use clap::Parser;
use insiderkit::{CsvUniverse, Pipeline, PipelineConfig, RemoteUniverse, RunOptions};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "SEC Form 4 insider-trading ingestion pipeline")]
struct Cli {
    /// Skip downloading new filings and only process existing files
    #[arg(long)]
    no_download: bool,

    /// Skip the URL-refresh phase and reuse the persisted URL ledger
    #[arg(long)]
    skip_url_refresh: bool,

    /// Only keep filings reported within this many days
    #[arg(long, default_value = "365")]
    lookback_days: u32,

    /// Maximum number of filings requested per company
    #[arg(long, default_value = "50")]
    max_filings: usize,

    /// Local constituents CSV (Symbol column); the remote S&P 500 list is
    /// fetched when omitted
    #[arg(long)]
    universe_file: Option<PathBuf>,

    /// Limit the number of companies processed (0 = all)
    #[arg(long, default_value = "0")]
    limit: usize,

    /// Directory holding fetched filings, the URL ledger and the database
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// User agent sent to SEC.gov, in the "app-name (contact@email)" form
    #[arg(long, default_value = "insiderkit/0.1.0 (insiderkit@example.com)")]
    user_agent: String,

    /// Enable verbose diagnostic output
    #[arg(long, short)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "insiderkit=debug,info" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = PipelineConfig {
        user_agent: cli.user_agent,
        data_dir: cli.data_dir,
        lookback_days: cli.lookback_days as i64,
        max_filings_per_company: cli.max_filings,
        ..PipelineConfig::default()
    };
    let options = RunOptions {
        skip_url_refresh: cli.skip_url_refresh,
        no_download: cli.no_download,
        company_limit: (cli.limit > 0).then_some(cli.limit),
    };

    let pipeline = Pipeline::new(config)?;

    let report = match cli.universe_file {
        Some(path) => {
            let universe = CsvUniverse::new(path);
            pipeline.run(&universe, options).await?
        }
        None => {
            let universe =
                RemoteUniverse::new(pipeline.client().clone(), RemoteUniverse::SP500_URL);
            pipeline.run(&universe, options).await?
        }
    };

    println!("\nInsider Trading Data Summary:");
    println!("Total transactions processed: {}", report.processed);
    println!("Errors encountered: {}", report.errors);

    Ok(())
}
