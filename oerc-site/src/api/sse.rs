//! Server-Sent Events for paper list changes

use crate::AppState;
use axum::{
    extract::State,
    response::sse::{Event, Sse},
};
use futures::stream::Stream;
use std::convert::Infallible;

/// GET /api/papers/stream
///
/// Streams `PapersReplaced`, `PapersMerged`, `PaperInserted` and
/// `PaperRemoved` events after an initial `ConnectionStatus`.
pub async fn paper_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    oerc_common::sse::store_event_stream(&state.store)
}
