//! Error types for source fetching and configuration loading.

use std::time::Duration;
use thiserror::Error;

/// Why a single source contributed nothing to the aggregate.
///
/// These never reach API clients; the aggregator logs them and moves on.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("feed could not be parsed: {0}")]
    Feed(String),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("unexpected fault while scraping: {0}")]
    Fault(String),
}

impl FetchError {
    /// Transient failures worth another attempt: transport timeouts and
    /// connection errors, HTTP 429, and HTTP 5xx.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Request(e) => e.is_timeout() || e.is_connect(),
            FetchError::Status { status, .. } => *status == 429 || (500..600).contains(status),
            FetchError::Feed(_) | FetchError::Timeout(_) | FetchError::Fault(_) => false,
        }
    }
}

/// Failure to build the pipeline configuration at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid URL {url:?}: {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },
}
