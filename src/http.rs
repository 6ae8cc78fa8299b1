//! Page retrieval with retry and exponential backoff.
//!
//! The module uses a trait-based design so the aggregator never talks to
//! `reqwest` directly:
//! - [`Fetch`]: core trait, "GET this URL and give me the body"
//! - [`HttpFetcher`]: the real implementation on a shared `reqwest::Client`
//! - [`RetryFetch`]: decorator that retries transient failures of any `Fetch`
//!
//! # Retry Strategy
//!
//! - Only [`FetchError::is_retryable`] errors are retried
//! - Exponential backoff from the configured base delay, capped at 5 seconds
//! - Random jitter (0-100ms) added to each delay
//!
//! The caller's per-source timeout covers all attempts together.

use crate::config::PipelineConfig;
use crate::error::FetchError;
use rand::{Rng, rng};
use std::fmt;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, error, instrument, warn};
use url::Url;

/// Something that can retrieve the body of a URL.
pub trait Fetch {
    /// GET `url` and return the response body as text.
    ///
    /// Non-2xx responses are errors.
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// [`Fetch`] over HTTP(S) using a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a client with the configured user agent and a transport timeout
    /// matching the per-source timeout.
    ///
    /// # Arguments
    ///
    /// * `config` - Supplies `user_agent` and `timeout`
    ///
    /// # Returns
    ///
    /// The fetcher, or the `reqwest` error if the TLS backend cannot be
    /// initialised.
    pub fn new(config: &PipelineConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let t0 = Instant::now();
        let resp = self.client.get(url.clone()).send().await?;
        let status = resp.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Non-success response");
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = resp.text().await?;
        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched page"
        );
        Ok(body)
    }
}

/// Wrapper that adds exponential backoff retry logic to any [`Fetch`].
///
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..100ms)
/// ```
pub struct RetryFetch<T> {
    inner: T,
    max_retries: usize,
    base_delay: Duration,
    max_delay: Duration,
}

impl<T> RetryFetch<T>
where
    T: Fetch,
{
    pub fn new(inner: T, max_retries: usize, base_delay: Duration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: Duration::from_secs(5),
        }
    }

    fn backoff(&self, attempt: usize) -> Duration {
        let shift = attempt.saturating_sub(1).min(16) as u32;
        self.base_delay.saturating_mul(1 << shift).min(self.max_delay)
    }
}

impl<T> fmt::Debug for RetryFetch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryFetch")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> Fetch for RetryFetch<T>
where
    T: Fetch + Sync,
{
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let mut attempt = 0usize;

        loop {
            match self.inner.fetch(url).await {
                Ok(body) => return Ok(body),
                Err(e) => {
                    attempt += 1;
                    if !e.is_retryable() {
                        return Err(e);
                    }
                    if attempt > self.max_retries {
                        error!(%url, attempt, max = self.max_retries, error = %e, "fetch exhausted retries");
                        return Err(e);
                    }

                    let jitter_ms: u64 = rng().random_range(0..=100);
                    let delay = self.backoff(attempt) + Duration::from_millis(jitter_ms);
                    warn!(%url, attempt, max = self.max_retries, ?delay, error = %e, "fetch failed; backing off");
                    sleep(delay).await;
                }
            }
        }
    }
}
