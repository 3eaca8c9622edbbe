//! Company universe providers.
//!
//! A universe is the ordered list of ticker symbols a run processes. Two
//! sources exist: a local constituents CSV (small/micro/nano-cap lists kept
//! on disk) and a remote constituents CSV fetched over HTTP. The remote
//! variant never fails the run: any error falls back to a small fixed list,
//! because a best-effort data pipeline should always produce something.

use super::Edgar;
use super::error::{InsiderError, Result};
use async_trait::async_trait;
use std::path::PathBuf;

/// Fallback universe used when the remote constituents list is unavailable.
pub const DEFAULT_TICKERS: [&str; 5] = ["AAPL", "MSFT", "AMZN", "GOOGL", "META"];

const SYMBOL_COLUMN: &str = "Symbol";

/// A source of ticker symbols to process.
#[async_trait]
pub trait UniverseProvider {
    /// Returns the ordered sequence of normalized ticker symbols.
    async fn tickers(&self) -> Result<Vec<String>>;
}

/// Normalizes an exchange ticker symbol.
///
/// Class-share suffixes are written with a dot in most constituents lists
/// (`BRK.B`) but with a dash in the EDGAR ticker mapping (`BRK-B`); every dot
/// is replaced so the two agree. The symbol is also uppercased.
pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase().replace('.', "-")
}

/// Extracts the `Symbol` column from constituents CSV content.
fn symbols_from_csv(content: &str) -> Result<Vec<String>> {
    let mut reader = csv::Reader::from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let symbol_idx = headers
        .iter()
        .position(|h| h == SYMBOL_COLUMN)
        .ok_or_else(|| {
            InsiderError::InvalidResponse(format!(
                "Column '{}' not found in CSV. Available columns: {:?}",
                SYMBOL_COLUMN,
                headers.iter().collect::<Vec<_>>()
            ))
        })?;

    let mut symbols = Vec::new();
    for record in reader.records() {
        let record = record?;
        if let Some(symbol) = record.get(symbol_idx) {
            if !symbol.trim().is_empty() {
                symbols.push(normalize_symbol(symbol));
            }
        }
    }
    Ok(symbols)
}

/// Universe read from a local constituents CSV file.
pub struct CsvUniverse {
    path: PathBuf,
}

impl CsvUniverse {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl UniverseProvider for CsvUniverse {
    /// Reads the `Symbol` column of the file.
    ///
    /// A missing file or a CSV without the column is a configuration failure
    /// and aborts the run before any network activity.
    async fn tickers(&self) -> Result<Vec<String>> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let symbols = symbols_from_csv(&content)?;
        tracing::info!(
            "Loaded {} companies from {}",
            symbols.len(),
            self.path.display()
        );
        Ok(symbols)
    }
}

/// Universe fetched from a public constituents CSV over HTTP.
pub struct RemoteUniverse {
    client: Edgar,
    url: String,
}

impl RemoteUniverse {
    /// Default source: the S&P 500 constituents list published on GitHub.
    pub const SP500_URL: &'static str =
        "https://raw.githubusercontent.com/datasets/s-and-p-500-companies/main/data/constituents.csv";

    pub fn new(client: Edgar, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl UniverseProvider for RemoteUniverse {
    /// Fetches and parses the remote list.
    ///
    /// Any failure (network, HTTP status, malformed CSV, missing column)
    /// falls back to `DEFAULT_TICKERS` instead of failing the run.
    async fn tickers(&self) -> Result<Vec<String>> {
        let symbols = match self.client.get(&self.url).await {
            Ok(content) => symbols_from_csv(&content),
            Err(e) => Err(e),
        };

        match symbols {
            Ok(symbols) => {
                tracing::info!("Fetched {} companies from {}", symbols.len(), self.url);
                Ok(symbols)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to fetch company universe from {}: {}. Falling back to default list.",
                    self.url,
                    e
                );
                Ok(DEFAULT_TICKERS.iter().map(|t| t.to_string()).collect())
            }
        }
    }
}
