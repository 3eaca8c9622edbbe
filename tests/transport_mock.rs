//! Fetcher behavior against instrumented transports.

use async_trait::async_trait;
use insiderkit::{FilingFetcher, FilingTransport, Result, known_filenames};
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Semaphore;
use url::Url;

const BODY: &str =
    "<ownershipDocument><issuer><issuerName>Test Corp</issuerName></issuer></ownershipDocument>";

/// Counts every fetch call it receives.
#[derive(Default)]
struct CountingTransport {
    calls: AtomicUsize,
}

#[async_trait]
impl FilingTransport for CountingTransport {
    async fn fetch_document(&self, _url: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(BODY.to_string())
    }
}

/// Tracks how many fetches are in flight simultaneously.
#[derive(Default)]
struct GaugeTransport {
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

#[async_trait]
impl FilingTransport for GaugeTransport {
    async fn fetch_document(&self, _url: &str) -> Result<String> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        // Hold the slot long enough for the scheduler to pile up siblings
        tokio::time::sleep(Duration::from_millis(25)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(BODY.to_string())
    }
}

fn archive_url(n: usize) -> String {
    format!("https://www.sec.gov/Archives/edgar/data/100{}/000100{}/form4.xml", n, n)
}

#[tokio::test]
async fn known_filenames_are_never_fetched() {
    let scratch = tempfile::tempdir().unwrap();
    let urls = vec![archive_url(1), archive_url(2)];
    let known = known_filenames(
        &urls
            .iter()
            .map(|u| Url::parse(u).unwrap())
            .collect::<Vec<_>>(),
    );

    let transport = CountingTransport::default();
    let fetcher = FilingFetcher::new(
        transport,
        scratch.path().join("filings"),
        Arc::new(Semaphore::new(5)),
        known,
    );

    let fetched = fetcher.fetch_all(&urls).await;
    assert_eq!(fetched, 0);
}

#[tokio::test]
async fn unknown_filenames_are_fetched_once_each() {
    let scratch = tempfile::tempdir().unwrap();
    let urls: Vec<String> = (0..4).map(archive_url).collect();

    let fetcher = FilingFetcher::new(
        CountingTransport::default(),
        scratch.path().join("filings"),
        Arc::new(Semaphore::new(5)),
        HashSet::new(),
    );

    let fetched = fetcher.fetch_all(&urls).await;
    assert_eq!(fetched, 4);
    assert_eq!(fetcher.completed(), 4);

    // All bodies parsed to the same issuer, so they share one bucket
    let bucket = scratch.path().join("filings").join("Test Corp");
    assert_eq!(std::fs::read_dir(&bucket).unwrap().count(), 4);
}

#[tokio::test]
async fn in_flight_requests_never_exceed_the_permit_count() {
    let scratch = tempfile::tempdir().unwrap();
    let urls: Vec<String> = (0..25).map(archive_url).collect();

    let fetcher = FilingFetcher::new(
        GaugeTransport::default(),
        scratch.path().join("filings"),
        Arc::new(Semaphore::new(5)),
        HashSet::new(),
    );

    let fetched = fetcher.fetch_all(&urls).await;
    assert_eq!(fetched, 25);

    let max = fetcher.transport().max_in_flight.load(Ordering::SeqCst);
    assert!(max <= 5, "observed {} concurrent fetches", max);
    assert!(max > 1, "fetches did not overlap at all");
}
