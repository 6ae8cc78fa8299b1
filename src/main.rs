//! # LegalCurrent Feed
//!
//! Aggregates the latest Australian legal news and judgments from several
//! independently structured public sources and serves them as one JSON
//! listing.
//!
//! ## Sources
//!
//! - Lawyers Weekly (RSS feed)
//! - AustLII recent Federal Court judgments (HTML `<pre>` listing)
//! - Federal Court of Australia judgments (HTML table)
//! - Law Society of NSW news (HTML article blocks)
//!
//! ## Usage
//!
//! ```sh
//! legalcurrent_feed --bind 0.0.0.0:5000
//! curl http://localhost:5000/api/latest-legal-content
//! ```
//!
//! ## Architecture
//!
//! Each request runs a fresh pipeline:
//! 1. **Fetching**: every source is retrieved concurrently, each under its own timeout
//! 2. **Extraction**: a per-source adapter pulls at most five candidates from the page
//! 3. **Normalization**: candidates become uniform items with absolute links
//! 4. **Aggregation**: results are concatenated in fixed source order; failed sources contribute nothing

use clap::Parser;
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{debug, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod aggregator;
mod cli;
mod config;
mod error;
mod feed;
mod http;
mod models;
mod normalize;
mod outputs;
mod scrapers;
mod server;
mod utils;

use aggregator::Aggregator;
use cli::Cli;
use config::PipelineConfig;
use http::{HttpFetcher, RetryFetch};
use server::{AppState, create_router};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // ---- Configuration (read-only from here on) ----
    let mut config = PipelineConfig::load(args.config.as_deref()).await?;
    if let Some(secs) = args.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    let config = Arc::new(config);
    for spec in &config.sources {
        info!(source = %spec.source, url = %spec.url, "Registered source");
    }

    let http = HttpFetcher::new(&config)?;
    let fetcher = RetryFetch::new(http, config.max_retries, config.retry_base_delay);
    let aggregator = Aggregator::new(fetcher, Arc::clone(&config));
    info!(
        timeout = ?aggregator.config().timeout,
        max_retries = aggregator.config().max_retries,
        "Pipeline ready"
    );

    // ---- One-shot mode ----
    if args.once {
        let items = aggregator.collect().await;
        outputs::json::write_items(&items, args.output.as_deref()).await?;
        return Ok(());
    }

    // ---- Serve ----
    let app = create_router(AppState { aggregator });
    let listener = TcpListener::bind(&args.bind).await?;
    info!(addr = %args.bind, "legalcurrent_feed listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C so `axum::serve` can drain in-flight requests.
///
/// If the signal handler cannot be installed the server keeps running
/// until it is killed.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C; graceful shutdown disabled");
        std::future::pending::<()>().await;
    }
    info!("Ctrl-C received; shutting down");
}
