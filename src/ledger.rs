//! Persisted URL ledger.
//!
//! The ledger is a newline-delimited file of absolute filing-document URLs.
//! A URL-refresh pass truncates and rewrites it; between refreshes it is the
//! record the dedup snapshot is derived from. Lines that fail URL validation
//! are skipped with a warning rather than failing the run.

use super::error::Result;
use std::path::PathBuf;
use url::Url;

pub struct UrlLedger {
    path: PathBuf,
}

impl UrlLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Loads every valid URL from the ledger.
    ///
    /// A missing ledger file is an empty ledger, not an error (first run).
    pub async fn load(&self) -> Result<Vec<Url>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut urls = Vec::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match Url::parse(line) {
                Ok(url) => urls.push(url),
                Err(e) => {
                    tracing::warn!("Skipping invalid ledger line {:?}: {}", line, e);
                }
            }
        }
        Ok(urls)
    }

    /// Truncates the ledger and writes the given URLs, one per line.
    ///
    /// This is the URL-refresh pass: the previous contents are discarded
    /// wholesale and replaced by the freshly located set.
    pub async fn replace(&self, urls: &[String]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut content = urls.join("\n");
        if !content.is_empty() {
            content.push('\n');
        }
        tokio::fs::write(&self.path, content).await?;

        tracing::info!("Wrote {} URLs to {}", urls.len(), self.path.display());
        Ok(())
    }
}
