//! Fan-out over every registered source and fan-in in registration order.
//!
//! All sources are fetched concurrently with `futures::future::join_all`,
//! which keeps results in input order no matter which fetch finishes first.
//! Each source runs under the configured timeout and behind a panic guard, so
//! one slow, broken or misbehaving source only ever costs its own items.
//!
//! Dropping the future returned by [`Aggregator::collect`] drops every
//! in-flight fetch with it; nothing is spawned detached.

use crate::config::{PipelineConfig, SourceSpec};
use crate::error::FetchError;
use crate::http::Fetch;
use crate::models::{ContentItem, Source};
use crate::scrapers;
use futures::FutureExt;
use futures::future::join_all;
use itertools::Itertools;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::timeout;
use tracing::{error, info, instrument};

/// What one source contributed to a single aggregate call.
#[derive(Debug)]
pub enum SourceOutcome {
    Fetched {
        source: Source,
        items: Vec<ContentItem>,
    },
    Failed {
        source: Source,
        error: FetchError,
    },
}

impl SourceOutcome {
    pub fn source(&self) -> Source {
        match self {
            SourceOutcome::Fetched { source, .. } | SourceOutcome::Failed { source, .. } => *source,
        }
    }

    /// Items to publish; a failed source publishes none.
    pub fn into_items(self) -> Vec<ContentItem> {
        match self {
            SourceOutcome::Fetched { items, .. } => items,
            SourceOutcome::Failed { .. } => Vec::new(),
        }
    }
}

/// Runs the source adapters described by a shared [`PipelineConfig`].
#[derive(Debug)]
pub struct Aggregator<F> {
    fetcher: F,
    config: Arc<PipelineConfig>,
}

impl<F> Aggregator<F>
where
    F: Fetch + Sync,
{
    pub fn new(fetcher: F, config: Arc<PipelineConfig>) -> Self {
        Self { fetcher, config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The combined listing: every source's items, grouped by source in
    /// registration order.
    ///
    /// Sources are fetched concurrently, each bounded by the configured
    /// timeout. A per-source summary is logged once all have finished.
    ///
    /// # Returns
    ///
    /// Every item from every source that succeeded. Never fails; failed
    /// sources are logged and contribute nothing, so a total outage yields
    /// an empty vector.
    #[instrument(level = "info", skip_all)]
    pub async fn collect(&self) -> Vec<ContentItem> {
        let t0 = Instant::now();
        let outcomes = self.collect_outcomes().await;

        let summary = outcomes
            .iter()
            .map(|outcome| match outcome {
                SourceOutcome::Fetched { items, .. } => format!("{}={}", outcome.source(), items.len()),
                SourceOutcome::Failed { .. } => format!("{}=failed", outcome.source()),
            })
            .join(", ");

        let items: Vec<ContentItem> = outcomes
            .into_iter()
            .flat_map(SourceOutcome::into_items)
            .collect();

        info!(
            total = items.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            sources = %summary,
            "Aggregated legal content"
        );
        items
    }

    /// One outcome per registered source, in registration order.
    pub async fn collect_outcomes(&self) -> Vec<SourceOutcome> {
        join_all(self.config.sources.iter().map(|spec| self.run_source(spec))).await
    }

    #[instrument(level = "info", skip_all, fields(source = %spec.source, url = %spec.url))]
    async fn run_source(&self, spec: &SourceSpec) -> SourceOutcome {
        let limit = self.config.timeout;
        let work = AssertUnwindSafe(async {
            let body = self.fetcher.fetch(&spec.url).await?;
            scrapers::extract(spec, &body)
        })
        .catch_unwind();

        let result = match timeout(limit, work).await {
            Err(_) => Err(FetchError::Timeout(limit)),
            Ok(Err(panic)) => Err(FetchError::Fault(panic_message(panic.as_ref()))),
            Ok(Ok(result)) => result,
        };

        match result {
            Ok(items) => {
                info!(count = items.len(), "Source fetched");
                SourceOutcome::Fetched {
                    source: spec.source,
                    items,
                }
            }
            Err(error) => {
                error!(error = %error, "Source failed; contributing no items");
                SourceOutcome::Failed {
                    source: spec.source,
                    error,
                }
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
