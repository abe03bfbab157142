//! Folio web server
//!
//! Run with: cargo run -p folio-web

use std::sync::Arc;

use folio_common::Config;
use folio_ingestion::SourceKind;
use folio_web::selection::Selection;
use folio_web::state::{select_source, AppState};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("folio=debug,info")),
        )
        .init();

    info!("Folio starting, version {}", env!("CARGO_PKG_VERSION"));

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            warn!("Could not load folio.toml: {e}; falling back to defaults");
            let mut c = Config::default();
            c.apply_env_overrides(|k| std::env::var(k).ok());
            c
        }
    };

    if config.scholar.api_key.is_empty() {
        warn!("No Scholar API key configured (set scholar.api_key or FOLIO_SERPAPI_KEY); the Scholar source will return nothing");
    }

    let state = Arc::new(AppState::from_config(&config)?);

    // ORCID needs no key, so it is the initial selection.
    select_source(state.clone(), Selection { source: SourceKind::Orcid, author_id: None }).await;

    let router = folio_web::router::build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    info!("Publications page listening on http://{}", config.server.bind);

    axum::serve(listener, router).await?;

    Ok(())
}
