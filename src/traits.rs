//! Trait definitions organizing EDGAR operations by domain.
//!
//! The pipeline groups its client-side operations into two traits: company
//! identity resolution and filing metadata access. The `Edgar` client
//! implements both; tests can provide alternative implementations where a
//! live endpoint is unwanted.

use super::error::Result;
use super::filings::{DetailedFiling, Submission};
use super::options::FilingOptions;
use async_trait::async_trait;
use std::collections::HashMap;

/// Operations for resolving company identity.
///
/// Every submissions request needs a Central Index Key, but the universe the
/// pipeline starts from is a list of exchange tickers. These operations cover
/// the hop between the two via the SEC's published ticker mapping.
#[async_trait]
pub trait CompanyOperations {
    /// Retrieves the full ticker-to-CIK mapping, keyed by normalized symbol.
    async fn ticker_map(&self) -> Result<HashMap<String, u64>>;
    /// Resolves a single ticker symbol to its CIK.
    async fn company_cik(&self, ticker: &str) -> Result<u64>;
}

/// Operations for accessing filing metadata.
///
/// The submissions endpoint lists a company's recent filings with their form
/// types, report dates and primary documents. These are the inputs the
/// locator filters into fetchable document URLs.
#[async_trait]
pub trait FilingOperations {
    /// Retrieves all submissions for a company identified by CIK.
    async fn submissions(&self, cik: &str) -> Result<Submission>;
    /// Helper returning the recent filings as a flat Vec.
    async fn get_recent_filings(&self, cik: &str) -> Result<Vec<DetailedFiling>>;
    /// Retrieves recent filings filtered by the given options.
    async fn filings(&self, cik: &str, opts: Option<FilingOptions>) -> Result<Vec<DetailedFiling>>;
    /// Constructs the archive URL of a filing's primary document.
    fn primary_document_url(&self, cik: &str, accession_number: &str, document: &str) -> String;
}
