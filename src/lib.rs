//! # InsiderKit - SEC Form 4 ingestion pipeline
//!
//! InsiderKit acquires insider-trading disclosures (SEC Form 4 filings) for a
//! universe of companies, extracts normalized transaction records from their
//! XML bodies, persists them to SQLite, and runs screening queries over the
//! result.
//!
//! ## Features
//!
//! - **Rate-limited HTTP client** - Complies with SEC.gov fair access rules
//! - **Filing location** - Submissions metadata filtered by form and lookback window
//! - **Deduplicated concurrent fetch** - Bounded in-flight requests, URL-derived filenames
//! - **Form 4 extraction** - Tolerant descendant-search over loosely nested XML
//! - **Transaction store** - SQLite table with screen queries (cluster buys,
//!   large purchases, repeat buyers)
//!
//! ## Basic usage
//!
//! ```ignore
//! use insiderkit::{Pipeline, PipelineConfig, RunOptions, RemoteUniverse};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Initialize with a proper user agent (required by SEC.gov)
//!     let config = PipelineConfig {
//!         user_agent: "YourAppName (contact@example.com)".to_string(),
//!         ..PipelineConfig::default()
//!     };
//!     let pipeline = Pipeline::new(config)?;
//!
//!     let universe = RemoteUniverse::new(
//!         pipeline.client().clone(),
//!         RemoteUniverse::SP500_URL,
//!     );
//!     let report = pipeline.run(&universe, RunOptions::default()).await?;
//!
//!     println!("processed: {}, errors: {}", report.processed, report.errors);
//!     Ok(())
//! }
//! ```

mod company;
mod config;
mod core;
mod error;
mod fetcher;
mod filings;
mod ledger;
mod loader;
mod locator;
mod options;
pub mod parsing;
mod pipeline;
mod store;
mod traits;
mod universe;

pub use config::{EdgarUrls, PipelineConfig};
pub use core::Edgar;
pub use error::{InsiderError, Result};

pub use company::CompanyTicker;
pub use fetcher::{FilingFetcher, FilingTransport, UNKNOWN_ISSUER, filename_for_url, known_filenames};
pub use filings::{DetailedFiling, FilingsData, RecentFilings, Submission};
pub use ledger::UrlLedger;
pub use loader::{LoadReport, Loader};
pub use locator::{FORM_TYPE, FilingLocator, FilingReference};
pub use options::FilingOptions;
pub use parsing::{Form4Document, TransactionEntry};
pub use pipeline::{Pipeline, RunOptions};
pub use store::{ClusterBuy, LargePurchase, RepeatBuyer, TransactionRecord, TransactionStore};
pub use universe::{
    CsvUniverse, DEFAULT_TICKERS, RemoteUniverse, UniverseProvider, normalize_symbol,
};

pub use traits::{CompanyOperations, FilingOperations};

/// Current crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
