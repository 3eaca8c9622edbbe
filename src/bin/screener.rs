//! Screen the transaction store for notable insider-buying patterns.

use anyhow::Result;
use clap::{Parser, Subcommand};
use insiderkit::{PipelineConfig, TransactionStore};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Insider-trading screeners over the transaction store")]
struct Cli {
    /// Directory holding the database (as written by insider-pipeline)
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Transaction type code to screen for
    #[arg(long, default_value = "P")]
    transaction_type: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Multiple insiders buying the same issuer within a short window
    ClusterBuys {
        /// Minimum number of distinct insiders
        #[arg(long, default_value = "2")]
        min_insiders: i64,
        /// Day window the purchases must fall into
        #[arg(long, default_value = "5")]
        window_days: i64,
    },
    /// Large personal investments, more likely conviction-based
    LargePurchases {
        /// Minimum dollar value of a single purchase
        #[arg(long, default_value = "500000")]
        min_value: f64,
    },
    /// Insiders buying repeatedly, potential long-term accumulation
    RepeatBuyers {
        /// Minimum number of purchases per insider
        #[arg(long, default_value = "3")]
        min_buys: i64,
    },
}

fn quote_link(ticker: Option<&str>) -> String {
    format!(
        "https://finviz.com/quote.ashx?t={}",
        ticker.unwrap_or("?")
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let config = PipelineConfig {
        data_dir: cli.data_dir,
        ..PipelineConfig::default()
    };
    let store = TransactionStore::open(config.db_path()).await?;

    match cli.command {
        Command::ClusterBuys {
            min_insiders,
            window_days,
        } => {
            let hits = store
                .cluster_buys(min_insiders, window_days, &cli.transaction_type)
                .await?;
            for hit in hits {
                println!(
                    "Ticker: {}, Date: {}, Insiders: {}, Shares: {}, Value: ${}",
                    quote_link(hit.ticker.as_deref()),
                    hit.transaction_date.as_deref().unwrap_or("?"),
                    hit.insider_count,
                    hit.total_shares.unwrap_or(0.0),
                    hit.total_value.unwrap_or(0.0),
                );
            }
        }
        Command::LargePurchases { min_value } => {
            let hits = store
                .large_purchases(min_value, &cli.transaction_type)
                .await?;
            for hit in hits {
                println!(
                    "Ticker: {}, Date: {}, Owner: {}, Position: {}, Value: ${}",
                    quote_link(hit.ticker.as_deref()),
                    hit.transaction_date.as_deref().unwrap_or("?"),
                    hit.reporting_owner.as_deref().unwrap_or("?"),
                    hit.reporting_owner_position.as_deref().unwrap_or("?"),
                    hit.dollar_value,
                );
            }
        }
        Command::RepeatBuyers { min_buys } => {
            let hits = store.repeat_buyers(min_buys, &cli.transaction_type).await?;
            for hit in hits {
                println!(
                    "Ticker: {}, Owner: {}, buy_count: {}",
                    quote_link(hit.ticker.as_deref()),
                    hit.reporting_owner.as_deref().unwrap_or("?"),
                    hit.buy_count,
                );
            }
        }
    }

    Ok(())
}
