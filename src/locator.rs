//! Filing locator: submissions metadata → fetchable document URLs.
//!
//! For each company the locator asks the submissions endpoint for recent
//! filings of the target form, keeps the ones reported inside the lookback
//! window, and emits the primary-document URLs. Companies fan out on a
//! bounded stream; each metadata request holds a permit of the pipeline's
//! shared semaphore so metadata lookups and document fetches draw from the
//! same rate allowance.

use super::Edgar;
use super::error::Result;
use super::filings::DetailedFiling;
use super::options::FilingOptions;
use super::traits::FilingOperations;
use chrono::{Days, NaiveDate, Utc};
use futures_util::StreamExt;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Form type code of insider-transaction reports.
pub const FORM_TYPE: &str = "4";

/// A pending unit of fetch work emitted by the locator.
///
/// Only the URL outlives the locator (via the ledger); the rest is context
/// for logging.
#[derive(Debug, Clone)]
pub struct FilingReference {
    pub url: String,
    pub report_date: Option<String>,
    pub cik: u64,
    pub ticker: String,
}

/// Locates Form 4 primary documents for a universe of companies.
pub struct FilingLocator {
    client: Edgar,
    lookback_days: i64,
    max_filings: usize,
    workers: usize,
}

impl FilingLocator {
    pub fn new(client: Edgar, lookback_days: i64, max_filings: usize, workers: usize) -> Self {
        Self {
            client,
            lookback_days,
            max_filings,
            workers,
        }
    }

    /// Report dates must be strictly after this date to be retained; a date
    /// exactly on the cutoff is excluded.
    fn cutoff(&self) -> NaiveDate {
        Utc::now()
            .date_naive()
            .checked_sub_days(Days::new(self.lookback_days.max(0) as u64))
            .unwrap_or(NaiveDate::MIN)
    }

    /// Locates filings for one company. Per-company failures are logged and
    /// yield an empty list; they never abort the rest of the universe.
    pub async fn locate(
        &self,
        ticker: &str,
        cik: u64,
        semaphore: &Semaphore,
    ) -> Vec<FilingReference> {
        match self.locate_inner(ticker, cik, semaphore).await {
            Ok(refs) => refs,
            Err(e) => {
                tracing::warn!("Failed to locate filings for {}: {}", ticker, e);
                Vec::new()
            }
        }
    }

    async fn locate_inner(
        &self,
        ticker: &str,
        cik: u64,
        semaphore: &Semaphore,
    ) -> Result<Vec<FilingReference>> {
        let cik_str = cik.to_string();
        let opts = FilingOptions::new()
            .with_form_type(FORM_TYPE)
            .with_limit(self.max_filings);

        let filings = {
            // Permit held across the metadata request only; filtering is local.
            let _permit = semaphore.acquire().await.expect("semaphore closed");
            self.client.filings(&cik_str, Some(opts)).await?
        };

        let cutoff = self.cutoff();
        let refs = retain_recent(filings, cutoff)
            .into_iter()
            .filter_map(|filing| {
                let document = filing.primary_document?;
                Some(FilingReference {
                    url: self.client.primary_document_url(
                        &cik_str,
                        &filing.accession_number,
                        &document,
                    ),
                    report_date: filing.report_date,
                    cik,
                    ticker: ticker.to_string(),
                })
            })
            .collect::<Vec<_>>();

        tracing::debug!("{}: {} filings inside lookback window", ticker, refs.len());
        Ok(refs)
    }

    /// Locates filings for the whole universe on a bounded worker pool.
    ///
    /// Completion order across companies is unspecified; the emitted list is
    /// whatever order the workers finish in.
    pub async fn locate_all(
        &self,
        companies: Vec<(String, u64)>,
        semaphore: Arc<Semaphore>,
    ) -> Vec<FilingReference> {
        futures_util::stream::iter(companies)
            .map(|(ticker, cik)| {
                let semaphore = Arc::clone(&semaphore);
                async move { self.locate(&ticker, cik, &semaphore).await }
            })
            .buffer_unordered(self.workers)
            .collect::<Vec<_>>()
            .await
            .into_iter()
            .flatten()
            .collect()
    }
}

/// Retains filings whose report date is strictly after `cutoff`.
///
/// A filing reported exactly on the cutoff date is excluded, as are filings
/// with a missing or unparseable report date.
fn retain_recent(filings: Vec<DetailedFiling>, cutoff: NaiveDate) -> Vec<DetailedFiling> {
    filings
        .into_iter()
        .filter(|filing| {
            filing
                .report_date
                .as_deref()
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
                .map(|date| date > cutoff)
                .unwrap_or(false)
        })
        .collect()
}
