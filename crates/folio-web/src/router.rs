//! Axum router: maps all URL paths to handlers.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::CorsLayer,
    trace::TraceLayer,
    compression::CompressionLayer,
};
use crate::state::SharedState;
use crate::handlers::{
    page::publications_page,
    publications::{api_fetch, api_publications, api_select_source},
    system::{health, not_found},
};
use crate::sse::sse_handler;

/// Build and return the full Axum router.
pub fn build_router(shared: SharedState) -> Router {
    Router::new()
        // Pages
        .route("/",       get(publications_page))
        .route("/health", get(health))

        // SSE streaming
        .route("/api/events", get(sse_handler))

        // API endpoints
        .route("/api/publications",        get(api_publications))
        .route("/api/publications/source", post(api_select_source))
        .route("/api/publications/fetch",  get(api_fetch))

        .fallback(not_found)

        // Middleware
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}
