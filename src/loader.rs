//! Loader: parses every locally stored document into the store.
//!
//! A full pass walks the filings directory, parses each document, and
//! appends exactly one record per parse success. Documents that fail to
//! parse are counted and skipped; nothing about one document's failure
//! stops the rest of the pass.

use super::error::Result;
use super::parsing::Form4Document;
use super::store::{TransactionRecord, TransactionStore};
use std::path::{Path, PathBuf};

/// Outcome of a load pass.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoadReport {
    pub processed: usize,
    pub errors: usize,
}

pub struct Loader {
    store: TransactionStore,
    filings_dir: PathBuf,
}

impl Loader {
    pub fn new(store: TransactionStore, filings_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            filings_dir: filings_dir.into(),
        }
    }

    /// Processes every stored document and reports the counts.
    ///
    /// Reprocessing an already-loaded document appends a duplicate row;
    /// there is no natural key across passes.
    pub async fn load_all(&self) -> Result<LoadReport> {
        let files = collect_xml_files(&self.filings_dir)?;
        if files.is_empty() {
            tracing::info!("No XML files found under {}", self.filings_dir.display());
            return Ok(LoadReport::default());
        }

        let mut report = LoadReport::default();
        for path in files {
            match self.load_one(&path).await {
                Ok(()) => report.processed += 1,
                Err(e) => {
                    tracing::warn!("Error processing {}: {}", path.display(), e);
                    report.errors += 1;
                }
            }
        }

        tracing::info!(
            "Load pass complete: {} transactions processed, {} errors",
            report.processed,
            report.errors
        );
        Ok(report)
    }

    async fn load_one(&self, path: &Path) -> Result<()> {
        let body = tokio::fs::read_to_string(path).await?;
        let doc = Form4Document::parse(&body)?;
        let record = record_from_document(doc, path.to_string_lossy().into_owned());
        self.store.insert(&record).await
    }
}

/// Maps a parsed document onto a store record.
fn record_from_document(doc: Form4Document, source_file: String) -> TransactionRecord {
    let transaction = doc.transaction.unwrap_or_default();
    TransactionRecord {
        issuer_name: doc.issuer_name,
        issuer_ticker: doc.issuer_ticker,
        reporting_owner: doc.owner_name,
        reporting_owner_cik: doc.owner_cik,
        reporting_owner_position: doc.officer_title,
        transaction_date: transaction.date,
        transaction_shares: transaction.shares,
        transaction_price: transaction.price_per_share,
        transaction_type: transaction.code,
        shares_after_transaction: transaction.shares_owned_after,
        aff_10b5_one: doc.aff_10b5_one,
        source_file,
    }
}

/// Recursively collects `.xml` files, sorted for a stable processing order.
fn collect_xml_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    if !dir.exists() {
        return Ok(files);
    }
    collect_into(dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_into(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_into(&path, files)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some("xml") {
            files.push(path);
        }
    }
    Ok(())
}
