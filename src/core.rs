use governor::{
    Quota, RateLimiter, clock::DefaultClock, middleware::NoOpMiddleware, state::InMemoryState,
    state::NotKeyed,
};
use reqwest::header::{ACCEPT_ENCODING, HeaderMap, HeaderValue, USER_AGENT};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use super::config::PipelineConfig;
use super::error::{InsiderError, Result};

const MAX_RETRIES: u32 = 5;
const INITIAL_BACKOFF_MS: u64 = 1000; // 1 second

type Governor = RateLimiter<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>;

/// Rate-limited HTTP client for the SEC EDGAR endpoints.
///
/// All network traffic in the pipeline goes through this client. It enforces
/// SEC.gov's fair-access rules twice over: a token bucket paces requests per
/// second, and callers additionally hold a permit of the pipeline's global
/// semaphore while a request is in flight. Rate-limit responses (HTTP 429)
/// are retried with exponential backoff and jitter; other failures surface
/// to the caller, which decides whether they are fatal or per-item.
///
/// Every request carries the identification headers the SEC access policy
/// mandates: a `User-Agent` naming the application and a contact address, and
/// an `Accept-Encoding` value.
///
/// # Examples
///
/// ```rust
/// # use insiderkit::Edgar;
/// let edgar = Edgar::new("my_app/1.0 (my@email.com)")?;
/// # Ok::<(), insiderkit::InsiderError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Edgar {
    /// HTTP client for making requests
    pub(crate) client: reqwest::Client,

    /// Token bucket rate limiter for SEC compliance
    pub(crate) rate_limiter: Arc<Governor>,

    /// Base URL for EDGAR archives
    pub(crate) edgar_archives_url: String,

    /// Base URL for EDGAR data API
    pub(crate) edgar_data_url: String,

    /// Base URL for EDGAR files
    pub(crate) edgar_files_url: String,
}

impl Edgar {
    /// Creates a client with default settings and the given user agent.
    ///
    /// The user agent must identify the requesting application and a contact
    /// address, e.g. `"my_app/1.0 (me@example.com)"`. The SEC uses it to reach
    /// you if your traffic causes problems; provide real contact information.
    pub fn new(user_agent: &str) -> Result<Self> {
        let config = PipelineConfig {
            user_agent: user_agent.to_string(),
            ..PipelineConfig::default()
        };
        Self::with_config(&config)
    }

    /// Creates a client from an explicit configuration.
    ///
    /// Use this to point the client at a mock server in tests (override
    /// `base_urls`) or to adjust the rate limit and timeout.
    ///
    /// # Errors
    ///
    /// Returns `InsiderError::ConfigError` if the user agent is not a valid
    /// header value, the rate limit is zero, or the HTTP client cannot be
    /// built.
    pub fn with_config(config: &PipelineConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| InsiderError::ConfigError(format!("Invalid user agent: {}", e)))?,
        );
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip, deflate"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| InsiderError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_second(
            NonZeroU32::new(config.rate_limit).ok_or_else(|| {
                InsiderError::ConfigError("Rate limit must be greater than zero".to_string())
            })?,
        )));

        Ok(Edgar {
            client,
            rate_limiter,
            edgar_archives_url: config.base_urls.archives.clone(),
            edgar_data_url: config.base_urls.data.clone(),
            edgar_files_url: config.base_urls.files.clone(),
        })
    }

    /// Wait duration before retry attempt `retry` (0-indexed).
    ///
    /// Exponential backoff (1s, 2s, 4s, ...) with ±20% jitter so that many
    /// backed-off clients do not retry in lockstep.
    fn calculate_backoff(retry: u32) -> Duration {
        let backoff_ms = INITIAL_BACKOFF_MS * (2_u64.pow(retry));
        let jitter = (backoff_ms as f64 * 0.2 * (fastrand::f64() - 0.5)) as i64;
        Duration::from_millis((backoff_ms as i64 + jitter) as u64)
    }

    /// Fetches a text resource with rate limiting and retries.
    ///
    /// This is the single entry point for all pipeline traffic: submissions
    /// JSON, the ticker mapping, constituents CSVs, and filing documents.
    ///
    /// # Retry behavior
    ///
    /// - HTTP 429: retried up to 5 times, honoring a `Retry-After` header
    ///   when present, otherwise backing off exponentially
    /// - transport errors: retried up to 5 times with exponential backoff
    /// - HTTP 404: returned immediately as `InsiderError::NotFound`
    /// - other statuses: returned immediately as `InsiderError::InvalidResponse`
    ///   with a preview of the body
    pub async fn get(&self, url: &str) -> Result<String> {
        let mut retries = 0;

        loop {
            self.rate_limiter.until_ready().await;

            let response = match self.client.get(url).send().await {
                Ok(response) => response,
                Err(e) => {
                    if retries >= MAX_RETRIES {
                        return Err(InsiderError::RequestError(e));
                    }
                    let backoff = Self::calculate_backoff(retries);
                    tracing::warn!(
                        "Request failed for {}: {:?}. Attempt {}/{}. Retrying in {:?}.",
                        url,
                        e,
                        retries + 1,
                        MAX_RETRIES + 1,
                        backoff
                    );
                    sleep(backoff).await;
                    retries += 1;
                    continue;
                }
            };

            match response.status() {
                reqwest::StatusCode::OK => {
                    return response.text().await.map_err(InsiderError::RequestError);
                }
                reqwest::StatusCode::NOT_FOUND => {
                    return Err(InsiderError::NotFound);
                }
                reqwest::StatusCode::TOO_MANY_REQUESTS => {
                    if retries >= MAX_RETRIES {
                        return Err(InsiderError::RateLimitExceeded);
                    }
                    let retry_after = response
                        .headers()
                        .get("retry-after")
                        .and_then(|h| h.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .map(Duration::from_secs)
                        .unwrap_or_else(|| Self::calculate_backoff(retries));
                    tracing::warn!(
                        "Rate limit hit (429) for {}. Attempt {}/{}. Waiting {:?} before retry.",
                        url,
                        retries + 1,
                        MAX_RETRIES + 1,
                        retry_after
                    );
                    sleep(retry_after).await;
                    retries += 1;
                    continue;
                }
                status => {
                    let body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Failed to read error body".to_string());
                    return Err(InsiderError::InvalidResponse(format!(
                        "Unexpected status code: {} for URL: {}. Response preview: {}",
                        status,
                        url,
                        body.chars().take(200).collect::<String>()
                    )));
                }
            }
        }
    }

    /// Returns the base URL for EDGAR archives.
    pub fn archives_url(&self) -> &str {
        &self.edgar_archives_url
    }

    /// Returns the base URL for the EDGAR data API.
    pub fn data_url(&self) -> &str {
        &self.edgar_data_url
    }

    /// Returns the base URL for EDGAR files.
    pub fn files_url(&self) -> &str {
        &self.edgar_files_url
    }
}
