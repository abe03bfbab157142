//! Publications JSON API.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use folio_common::ApiError;
use folio_ingestion::{filter_by_type, Publication, SourceKind, TypeFilter};

use crate::selection::{LoadStatus, Selection};
use crate::state::{select_source, SharedState};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(rename = "type", default)]
    pub filter: TypeFilter,
}

#[derive(Debug, Serialize)]
pub struct PublicationsResponse {
    pub generation: u64,
    pub selection: Option<Selection>,
    pub status: LoadStatus,
    pub filter: TypeFilter,
    pub total: usize,
    pub publications: Vec<Publication>,
}

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub source: String,
    pub id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SelectResponse {
    pub generation: u64,
    pub source: SourceKind,
}

#[derive(Debug, Deserialize)]
pub struct FetchQuery {
    pub source: String,
    pub id: Option<String>,
    #[serde(rename = "type", default)]
    pub filter: TypeFilter,
}

#[derive(Debug, Serialize)]
pub struct FetchResponse {
    pub source: SourceKind,
    pub total: usize,
    pub publications: Vec<Publication>,
}

fn parse_source(raw: &str) -> Result<SourceKind, ApiError> {
    raw.parse::<SourceKind>()
        .map_err(|e| ApiError::BadRequest(e.to_string()))
}

/// GET /api/publications - current selection, optionally filtered by type
pub async fn api_publications(
    State(state): State<SharedState>,
    Query(query): Query<ListQuery>,
) -> Json<PublicationsResponse> {
    let snap = state.selection.snapshot().await;
    let publications = filter_by_type(&snap.publications, query.filter);

    Json(PublicationsResponse {
        generation: snap.generation,
        selection: snap.selection,
        status: snap.status,
        filter: query.filter,
        total: snap.publications.len(),
        publications,
    })
}

/// POST /api/publications/source - switch source; the fetch runs in the background
pub async fn api_select_source(
    State(state): State<SharedState>,
    Json(req): Json<SelectRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let source = parse_source(&req.source)?;
    let author_id = req.id.filter(|id| !id.trim().is_empty());
    let generation = select_source(state, Selection { source, author_id }).await;

    Ok((StatusCode::ACCEPTED, Json(SelectResponse { generation, source })))
}

/// GET /api/publications/fetch - one-shot fetch that reports upstream failures
pub async fn api_fetch(
    State(state): State<SharedState>,
    Query(query): Query<FetchQuery>,
) -> Result<Json<FetchResponse>, ApiError> {
    let source = parse_source(&query.source)?;
    let all = state
        .aggregator
        .try_fetch(source, query.id.as_deref())
        .await
        .map_err(|e| ApiError::Upstream(e.to_string()))?;

    Ok(Json(FetchResponse {
        source,
        total: all.len(),
        publications: filter_by_type(&all, query.filter),
    }))
}
