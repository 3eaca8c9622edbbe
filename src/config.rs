use std::path::PathBuf;
use std::time::Duration;

/// Configuration for a pipeline run.
///
/// Everything a run needs is collected here so that multiple pipelines with
/// different settings can coexist in one process. The defaults follow SEC.gov
/// fair-access guidance: the stated ceiling is 10 requests per second, and the
/// fetch permit count of 5 deliberately halves it for safety margin.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// User agent string sent with every request, in the
    /// `app-name (contact@email)` form the SEC requires
    pub user_agent: String,
    /// Client-side rate limit in requests per second
    pub rate_limit: u32,
    /// Maximum number of simultaneously in-flight HTTP requests,
    /// shared between metadata lookups and document fetches
    pub fetch_permits: usize,
    /// Worker bound for per-company metadata lookups
    pub locator_workers: usize,
    /// HTTP request timeout
    pub timeout: Duration,
    /// Base URLs for the EDGAR services
    pub base_urls: EdgarUrls,
    /// Directory holding fetched documents, the URL ledger and the database
    pub data_dir: PathBuf,
    /// Only filings reported strictly after `today - lookback_days` are kept
    pub lookback_days: i64,
    /// Maximum number of filings requested per company
    pub max_filings_per_company: usize,
}

/// Base URLs for different EDGAR services
#[derive(Debug, Clone)]
pub struct EdgarUrls {
    /// Base URL for EDGAR archives
    pub archives: String,
    /// Base URL for EDGAR data
    pub data: String,
    /// Base URL for EDGAR files
    pub files: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            user_agent: "insiderkit/0.1.0 (insiderkit@example.com)".to_string(),
            rate_limit: 10,
            fetch_permits: 5,
            locator_workers: 10,
            timeout: Duration::from_secs(30),
            base_urls: EdgarUrls::default(),
            data_dir: PathBuf::from("data"),
            lookback_days: 365,
            max_filings_per_company: 50,
        }
    }
}

impl Default for EdgarUrls {
    fn default() -> Self {
        Self {
            archives: "https://www.sec.gov/Archives/edgar".to_string(),
            data: "https://data.sec.gov".to_string(),
            files: "https://www.sec.gov/files".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Directory fetched filings are written to, bucketed by issuer.
    pub fn filings_dir(&self) -> PathBuf {
        self.data_dir.join("filings")
    }

    /// Path of the newline-delimited URL ledger.
    pub fn ledger_path(&self) -> PathBuf {
        self.data_dir.join("filing_urls.txt")
    }

    /// Path of the SQLite database file.
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("insider_trading.db")
    }
}
