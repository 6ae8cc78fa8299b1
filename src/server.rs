//! HTTP API handlers and routes using axum.
//!
//! Routes:
//! - GET / - Welcome banner
//! - GET /health - Health check
//! - GET /api/latest-legal-content - Aggregated listing from every source
//!
//! The listing endpoint always answers 200 with a JSON array. Source outages
//! shrink the array; they never turn into an error response.

use crate::aggregator::Aggregator;
use crate::http::Fetch;
use crate::models::ContentItem;
use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::instrument;

/// Application state shared across handlers.
pub struct AppState<F> {
    pub aggregator: Aggregator<F>,
}

/// Create the API router.
pub fn create_router<F>(state: AppState<F>) -> Router
where
    F: Fetch + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/api/latest-legal-content", get(latest_legal_content::<F>))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

/// GET /
async fn index_handler() -> &'static str {
    "Welcome to LegalCurrent! Latest legal content is at /api/latest-legal-content"
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// GET /health
async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// GET /api/latest-legal-content
#[instrument(level = "info", skip_all)]
async fn latest_legal_content<F>(State(state): State<Arc<AppState<F>>>) -> Json<Vec<ContentItem>>
where
    F: Fetch + Send + Sync + 'static,
{
    Json(state.aggregator.collect().await)
}
