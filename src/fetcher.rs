//! Concurrent document fetcher and fetch deduplication.
//!
//! Filenames are a pure function of the source URL (never of the fetched
//! content), so the set of already-retrieved documents can be derived from
//! the URL ledger alone. The dedup set is a snapshot taken at run start:
//! two in-flight fetches racing on the same brand-new filename both complete
//! and the last write wins, which is harmless because the content is
//! identical.
//!
//! All in-flight requests, regardless of company, share one semaphore. The
//! SEC's documented ceiling is 10 requests/second; the default permit count
//! of 5 halves that for safety margin.

use super::Edgar;
use super::error::Result;
use super::parsing::Form4Document;
use async_trait::async_trait;
use futures_util::StreamExt;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Semaphore;
use url::Url;

/// Bucket for documents whose issuer cannot be determined.
pub const UNKNOWN_ISSUER: &str = "unknown";

const ARCHIVE_PREFIX: &str = "Archives/edgar/data/";

/// Transport seam for document retrieval.
///
/// The pipeline uses the `Edgar` client; tests substitute instrumented
/// implementations to observe call counts and in-flight concurrency.
#[async_trait]
pub trait FilingTransport: Send + Sync {
    /// Retrieves one document body.
    async fn fetch_document(&self, url: &str) -> Result<String>;
}

#[async_trait]
impl FilingTransport for Edgar {
    async fn fetch_document(&self, url: &str) -> Result<String> {
        self.get(url).await
    }
}

/// Derives the local filename for a document URL.
///
/// The URL path after `Archives/edgar/data/` with every `/` replaced by `-`;
/// stable and collision-free for well-formed EDGAR paths. URLs outside the
/// archive tree fall back to their full path under the same replacement, so
/// the mapping stays a pure function of the URL.
pub fn filename_for_url(url: &Url) -> String {
    let path = url.path().trim_start_matches('/');
    let path = path.strip_prefix(ARCHIVE_PREFIX).unwrap_or(path);
    path.replace('/', "-")
}

/// Derives the dedup set from previously recorded URLs.
pub fn known_filenames(urls: &[Url]) -> HashSet<String> {
    urls.iter().map(filename_for_url).collect()
}

/// Replaces path separators so an issuer name is usable as a directory name.
fn sanitize_bucket(name: &str) -> String {
    let cleaned = name
        .trim()
        .replace(['/', '\\', '\0'], "_");
    if cleaned.is_empty() {
        UNKNOWN_ISSUER.to_string()
    } else {
        cleaned
    }
}

/// Issuer bucket for a fetched body: the issuer name parsed out of the
/// content itself, or the `unknown` sentinel when extraction fails. The
/// filename never depends on this, so a failed extraction still stores the
/// document under a stable name.
fn issuer_bucket(body: &str) -> String {
    match Form4Document::parse(body) {
        Ok(doc) => doc
            .issuer_name
            .as_deref()
            .map(sanitize_bucket)
            .unwrap_or_else(|| UNKNOWN_ISSUER.to_string()),
        Err(_) => UNKNOWN_ISSUER.to_string(),
    }
}

/// Fetches filing documents concurrently and persists them to disk.
pub struct FilingFetcher<T: FilingTransport> {
    transport: T,
    filings_dir: PathBuf,
    semaphore: Arc<Semaphore>,
    known: HashSet<String>,
    completed: AtomicUsize,
}

impl<T: FilingTransport> FilingFetcher<T> {
    pub fn new(
        transport: T,
        filings_dir: PathBuf,
        semaphore: Arc<Semaphore>,
        known: HashSet<String>,
    ) -> Self {
        Self {
            transport,
            filings_dir,
            semaphore,
            known,
            completed: AtomicUsize::new(0),
        }
    }

    /// Number of documents fetched and written so far this run.
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    /// The underlying transport, mainly for instrumented test doubles.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetches every candidate URL whose filename is not already known.
    ///
    /// Per-document failures are logged and dropped; they never abort
    /// sibling fetches. Completion order is whatever the scheduler yields.
    /// Returns the number of documents written.
    pub async fn fetch_all(&self, urls: &[String]) -> usize {
        futures_util::stream::iter(urls)
            .for_each_concurrent(None, |candidate| async move {
                let Ok(url) = Url::parse(candidate) else {
                    tracing::warn!("Skipping unparseable URL {:?}", candidate);
                    return;
                };
                let filename = filename_for_url(&url);
                if self.known.contains(&filename) {
                    tracing::debug!("Already fetched {}, skipping", filename);
                    return;
                }

                match self.fetch_one(candidate, &filename).await {
                    Ok(()) => {
                        let done = self.completed.fetch_add(1, Ordering::Relaxed) + 1;
                        tracing::info!("[{}] Fetched {}", done, filename);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to fetch {}: {}", candidate, e);
                    }
                }
            })
            .await;

        self.completed()
    }

    async fn fetch_one(&self, url: &str, filename: &str) -> Result<()> {
        let body = {
            // Permit held for the duration of the network request only.
            let _permit = self.semaphore.acquire().await.expect("semaphore closed");
            self.transport.fetch_document(url).await?
        };

        let dir = self.filings_dir.join(issuer_bucket(&body));
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(filename), body).await?;
        Ok(())
    }
}
