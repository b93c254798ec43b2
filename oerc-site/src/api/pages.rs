//! Public, visitor-independent content: the shared paper list, the home
//! carousel and the static pages

use axum::{
    extract::{Query, State},
    Json,
};
use oerc_common::catalog::{consortium_events, faq_entries, global_conferences};
use oerc_common::models::{Event, FaqEntry, Paper};
use serde::{Deserialize, Serialize};

use crate::services::ListingSource;
use crate::views::{featured, FeaturedWindow};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct PapersResponse {
    pub source: ListingSource,
    pub total: usize,
    pub papers: Vec<Paper>,
}

/// GET /api/papers
pub async fn list_papers(State(state): State<AppState>) -> Json<PapersResponse> {
    let papers = state.store.snapshot().await;
    Json(PapersResponse {
        source: state.listing_source().await,
        total: papers.len(),
        papers,
    })
}

#[derive(Debug, Deserialize)]
pub struct FeaturedQuery {
    #[serde(default)]
    pub index: usize,
}

/// GET /api/home/featured?index=n
pub async fn featured_papers(
    State(state): State<AppState>,
    Query(query): Query<FeaturedQuery>,
) -> Json<FeaturedWindow> {
    Json(featured(&state.store.snapshot().await, query.index))
}

/// GET /api/pages/events
pub async fn events() -> Json<Vec<Event>> {
    Json(consortium_events())
}

/// GET /api/pages/conferences
pub async fn conferences() -> Json<Vec<Event>> {
    Json(global_conferences())
}

/// GET /api/pages/faq
pub async fn faq() -> Json<Vec<FaqEntry>> {
    Json(faq_entries())
}
