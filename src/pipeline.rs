//! Pipeline run context and phase driver.
//!
//! A `Pipeline` owns the shared mutable state of one run — the HTTP client,
//! the global fetch semaphore and the dedup snapshot — as explicit fields
//! rather than ambient globals, so multiple pipelines can coexist in one
//! process and tests can construct them deterministically.
//!
//! Phase order: store init → dedup snapshot → URL refresh → download → load.
//! Only setup failures (store, filesystem, ledger write) are fatal; every
//! per-company and per-document failure is logged and skipped downstream.

use super::config::PipelineConfig;
use super::core::Edgar;
use super::error::Result;
use super::fetcher::{FilingFetcher, known_filenames};
use super::ledger::UrlLedger;
use super::loader::{LoadReport, Loader};
use super::locator::FilingLocator;
use super::store::TransactionStore;
use super::traits::CompanyOperations;
use super::universe::UniverseProvider;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Per-run switches, mirroring the CLI surface.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Skip the URL-refresh phase and reuse the persisted ledger.
    pub skip_url_refresh: bool,
    /// Skip downloading; only process documents already on disk.
    pub no_download: bool,
    /// Process at most this many companies from the universe.
    pub company_limit: Option<usize>,
}

pub struct Pipeline {
    config: PipelineConfig,
    client: Edgar,
    semaphore: Arc<Semaphore>,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let client = Edgar::with_config(&config)?;
        let semaphore = Arc::new(Semaphore::new(config.fetch_permits));
        Ok(Self {
            config,
            client,
            semaphore,
        })
    }

    pub fn client(&self) -> &Edgar {
        &self.client
    }

    /// Executes a full run and returns the load-pass report.
    pub async fn run(
        &self,
        universe: &dyn UniverseProvider,
        options: RunOptions,
    ) -> Result<LoadReport> {
        tokio::fs::create_dir_all(&self.config.data_dir).await?;
        let store = TransactionStore::open(self.config.db_path()).await?;

        let ledger = UrlLedger::new(self.config.ledger_path());
        // Snapshot before the refresh truncates the ledger; this is the
        // dedup set for the whole run.
        let recorded = ledger.load().await?;
        let known = known_filenames(&recorded);

        let urls = if options.skip_url_refresh {
            tracing::info!("Skipping URL refresh, reusing {} recorded URLs", recorded.len());
            recorded.iter().map(|u| u.to_string()).collect()
        } else {
            let urls = self.refresh_urls(universe, options.company_limit).await?;
            ledger.replace(&urls).await?;
            urls
        };

        if options.no_download {
            tracing::info!("Skipping download, processing existing files only");
        } else {
            let fetcher = FilingFetcher::new(
                self.client.clone(),
                self.config.filings_dir(),
                Arc::clone(&self.semaphore),
                known,
            );
            let fetched = fetcher.fetch_all(&urls).await;
            tracing::info!("Downloaded {} new documents", fetched);
        }

        let loader = Loader::new(store, self.config.filings_dir());
        loader.load_all().await
    }

    /// URL-refresh phase: universe → CIK resolution → located document URLs.
    async fn refresh_urls(
        &self,
        universe: &dyn UniverseProvider,
        company_limit: Option<usize>,
    ) -> Result<Vec<String>> {
        let mut tickers = universe.tickers().await?;
        if let Some(limit) = company_limit {
            if limit < tickers.len() {
                tracing::info!("Limiting to the first {} of {} companies", limit, tickers.len());
                tickers.truncate(limit);
            }
        }

        let ticker_map = match self.client.ticker_map().await {
            Ok(map) => map,
            Err(e) => {
                tracing::warn!("Failed to fetch ticker mapping: {}. No filings will be located.", e);
                return Ok(Vec::new());
            }
        };

        let companies: Vec<(String, u64)> = tickers
            .into_iter()
            .filter_map(|ticker| match ticker_map.get(&ticker) {
                Some(&cik) => Some((ticker, cik)),
                None => {
                    tracing::warn!("No CIK found for {}, skipping", ticker);
                    None
                }
            })
            .collect();
        tracing::info!("Locating filings for {} companies", companies.len());

        let locator = FilingLocator::new(
            self.client.clone(),
            self.config.lookback_days,
            self.config.max_filings_per_company,
            self.config.locator_workers,
        );
        let references = locator
            .locate_all(companies, Arc::clone(&self.semaphore))
            .await;

        Ok(references.into_iter().map(|r| r.url).collect())
    }
}
