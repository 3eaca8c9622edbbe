//! Company identity resolution (ticker ↔ CIK).
//!
//! Every submissions request is keyed by a Central Index Key, but the
//! pipeline's universe is a list of exchange tickers. The SEC publishes the
//! mapping between the two as `company_tickers.json`; a run fetches it once
//! and resolves every company through the resulting map.

use super::CompanyOperations;
use super::Edgar;
use super::error::{InsiderError, Result};
use super::universe::normalize_symbol;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Mapping between a stock ticker symbol and a company CIK.
///
/// The SEC maintains this mapping to help users discover company identifiers
/// for EDGAR queries. Note that companies can have multiple tickers across
/// different exchanges; each appears as its own entry.
#[derive(Debug, Deserialize, Serialize)]
pub struct CompanyTicker {
    #[serde(rename = "cik_str")]
    pub cik: u64,
    pub ticker: String,
    pub title: String,
}

enum CompanyUrlType {
    CompanyTickers,
}

impl Edgar {
    fn build_company_url(&self, url_type: CompanyUrlType) -> String {
        match url_type {
            CompanyUrlType::CompanyTickers => {
                format!("{}/company_tickers.json", self.edgar_files_url)
            }
        }
    }

    /// Retrieves the raw list of company tickers from EDGAR.
    ///
    /// The payload is a JSON object keyed by row index, each value holding a
    /// `cik_str`/`ticker`/`title` triple.
    pub async fn company_tickers(&self) -> Result<Vec<CompanyTicker>> {
        let url = self.build_company_url(CompanyUrlType::CompanyTickers);
        let response = self.get(&url).await?;
        let map: HashMap<String, CompanyTicker> = serde_json::from_str(&response)?;
        Ok(map.into_values().collect())
    }
}

#[async_trait]
impl CompanyOperations for Edgar {
    /// Retrieves the full ticker-to-CIK mapping, keyed by normalized symbol.
    ///
    /// Symbols are uppercased and dot-normalized (`BRK.B` → `BRK-B`) so they
    /// match what the universe providers emit. When the SEC lists the same
    /// symbol twice the first entry wins.
    async fn ticker_map(&self) -> Result<HashMap<String, u64>> {
        let tickers = self.company_tickers().await?;

        let mut map = HashMap::with_capacity(tickers.len());
        for entry in tickers {
            map.entry(normalize_symbol(&entry.ticker)).or_insert(entry.cik);
        }
        Ok(map)
    }

    /// Resolves a single ticker symbol to its CIK.
    ///
    /// # Errors
    ///
    /// Returns `InsiderError::TickerNotFound` if the symbol is absent from
    /// the SEC mapping.
    async fn company_cik(&self, ticker: &str) -> Result<u64> {
        let map = self.ticker_map().await?;

        map.get(&normalize_symbol(ticker))
            .copied()
            .ok_or_else(|| InsiderError::TickerNotFound(ticker.to_string()))
    }
}
