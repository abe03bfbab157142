//! Liveness and fallback handlers.

use axum::{extract::State, Json};
use serde::Serialize;

use folio_common::ApiError;

use crate::state::SharedState;

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub version: &'static str,
    pub generation: u64,
}

/// GET /health
pub async fn health(State(state): State<SharedState>) -> Json<Health> {
    let generation = state.selection.snapshot().await.generation;
    Json(Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        generation,
    })
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound("no such route".to_string())
}
