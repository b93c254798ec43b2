//! Research library endpoints
//!
//! All state is the calling visitor's; results merge into the shared list.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::{ApiError, CurrentVisitor};
use crate::views::library::run_search;
use crate::views::{LibraryError, LibrarySnapshot, SearchSummary};
use crate::AppState;

async fn snapshot(state: &AppState, visitor: &CurrentVisitor) -> LibrarySnapshot {
    let papers = state.store.snapshot().await;
    visitor.0.library.lock().await.snapshot(&papers)
}

/// GET /api/library
pub async fn get_library(
    State(state): State<AppState>,
    visitor: CurrentVisitor,
) -> Json<LibrarySnapshot> {
    Json(snapshot(&state, &visitor).await)
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    /// None when the query was blank and nothing ran
    pub search: Option<SearchSummary>,
    pub library: LibrarySnapshot,
}

/// POST /api/library/search
pub async fn search(
    State(state): State<AppState>,
    visitor: CurrentVisitor,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let search = run_search(&visitor.0.library, &state.query, &state.store, &request.query).await?;
    Ok(Json(SearchResponse {
        search,
        library: snapshot(&state, &visitor).await,
    }))
}

#[derive(Debug, Deserialize)]
pub struct TagRequest {
    pub tag: String,
}

/// POST /api/library/tags/toggle
pub async fn toggle_tag(
    State(state): State<AppState>,
    visitor: CurrentVisitor,
    Json(request): Json<TagRequest>,
) -> Json<LibrarySnapshot> {
    visitor.0.library.lock().await.toggle_tag(&request.tag);
    Json(snapshot(&state, &visitor).await)
}

/// POST /api/library/tags/clear
pub async fn clear_tags(
    State(state): State<AppState>,
    visitor: CurrentVisitor,
) -> Json<LibrarySnapshot> {
    visitor.0.library.lock().await.clear_tags();
    Json(snapshot(&state, &visitor).await)
}

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub id: String,
}

/// POST /api/library/select
pub async fn select(
    State(state): State<AppState>,
    visitor: CurrentVisitor,
    Json(request): Json<SelectRequest>,
) -> Result<Json<LibrarySnapshot>, ApiError> {
    let papers = state.store.snapshot().await;
    let mut view = visitor.0.library.lock().await;
    view.select(&papers, &request.id)?;
    Ok(Json(view.snapshot(&papers)))
}

/// POST /api/library/back
pub async fn back(State(state): State<AppState>, visitor: CurrentVisitor) -> Json<LibrarySnapshot> {
    visitor.0.library.lock().await.back();
    Json(snapshot(&state, &visitor).await)
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub id: String,
    pub summary: String,
}

/// GET /api/library/papers/:id/summary
pub async fn summary(
    State(state): State<AppState>,
    _visitor: CurrentVisitor,
    Path(id): Path<String>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let paper = state
        .store
        .get(&id)
        .await
        .ok_or_else(|| LibraryError::PaperNotFound(id.clone()))?;
    let summary = state.query.summarize(&paper).await;
    Ok(Json(SummaryResponse { id, summary }))
}
