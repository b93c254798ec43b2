//! Server-Sent Events (SSE) utilities
//!
//! Streams paper store changes to connected browsers so open library and
//! admin views can refresh after another visitor's upload or delete.

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::{Stream, StreamExt};
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{info, warn};

use crate::store::PaperStore;

/// Keep-alive interval for idle SSE connections
pub const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(15);

/// Create an SSE stream of [`crate::store::StoreEvent`]s
///
/// The first frame is a `ConnectionStatus` event so clients can show their
/// connection indicator before any change happens. Lagged receivers skip
/// the missed events and keep streaming.
///
/// # Example
/// ```rust,ignore
/// pub async fn paper_stream(
///     State(state): State<AppState>,
/// ) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
///     oerc_common::sse::store_event_stream(&state.store)
/// }
/// ```
pub fn store_event_stream(
    store: &PaperStore,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    info!("New SSE client connected to paper events");

    let updates = BroadcastStream::new(store.subscribe()).filter_map(|result| async move {
        match result {
            Ok(store_event) => Event::default()
                .event(store_event.event_type())
                .json_data(&store_event)
                .ok()
                .map(Ok),
            Err(e) => {
                warn!("SSE client lagged: {:?}", e);
                None
            }
        }
    });

    let stream = async_stream::stream! {
        yield Ok(Event::default()
            .event("ConnectionStatus")
            .data("connected"));

        futures::pin_mut!(updates);
        while let Some(item) = updates.next().await {
            yield item;
        }
    };

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(KEEP_ALIVE_INTERVAL)
            .text("heartbeat"),
    )
}
