//! Server-Sent Events stream of selection progress.
//!
//! A new subscriber first gets a `connected` event describing the current
//! selection, then every [`AppEvent`] as it happens. The SSE `id` is the
//! event's generation so clients can ignore events for selections they
//! have already moved past.

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures_core::Stream;
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;
use tracing::debug;

use crate::state::{AppEvent, SharedState};

fn to_sse(event: &AppEvent) -> Option<Event> {
    let data = serde_json::to_string(event).ok()?;
    Some(
        Event::default()
            .event(event.name())
            .id(event.generation().to_string())
            .data(data),
    )
}

/// GET /api/events
pub async fn sse_handler(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    // Subscribe before reading the snapshot so nothing falls in between.
    let rx = state.subscribe();
    let snap = state.selection.snapshot().await;
    let hello = AppEvent::Connected {
        generation: snap.generation,
        source: snap.selection.map(|s| s.source),
        count: snap.publications.len(),
    };

    let live = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(event) => to_sse(&event).map(Ok),
        Err(e) => {
            debug!(error = %e, "SSE subscriber lagged");
            None
        }
    });
    let stream = tokio_stream::iter(to_sse(&hello).map(Ok)).chain(live);

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}
