//! Shared application state for the web server.

use std::sync::Arc;

use folio_common::{Config, FolioError};
use folio_ingestion::{PublicationAggregator, SourceKind};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::selection::{Completion, Selection, SelectionTracker};

/// Events pushed to connected clients via SSE.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppEvent {
    /// Sent once to each new subscriber with the selection as it stands
    Connected { generation: u64, source: Option<SourceKind>, count: usize },
    /// A new source was selected and its fetch started
    SelectionStarted { generation: u64, source: SourceKind },
    /// The current selection finished loading
    PublicationsLoaded { generation: u64, source: SourceKind, count: usize },
    /// The current selection failed to load
    FetchFailed { generation: u64, source: SourceKind, message: String },
    /// A superseded fetch finished and was ignored
    StaleResultDiscarded { generation: u64, current: u64 },
}

impl AppEvent {
    /// SSE event name, matching the serialized `type` tag.
    pub fn name(&self) -> &'static str {
        match self {
            AppEvent::Connected { .. }            => "connected",
            AppEvent::SelectionStarted { .. }     => "selection_started",
            AppEvent::PublicationsLoaded { .. }   => "publications_loaded",
            AppEvent::FetchFailed { .. }          => "fetch_failed",
            AppEvent::StaleResultDiscarded { .. } => "stale_result_discarded",
        }
    }

    /// Generation the event belongs to.
    pub fn generation(&self) -> u64 {
        match self {
            AppEvent::Connected { generation, .. }
            | AppEvent::SelectionStarted { generation, .. }
            | AppEvent::PublicationsLoaded { generation, .. }
            | AppEvent::FetchFailed { generation, .. }
            | AppEvent::StaleResultDiscarded { generation, .. } => *generation,
        }
    }
}

/// Shared state injected into every Axum handler.
pub struct AppState {
    pub aggregator: PublicationAggregator,
    pub selection: SelectionTracker,
    /// Broadcast channel for SSE push events
    pub event_tx: broadcast::Sender<AppEvent>,
}

impl AppState {
    pub fn new(aggregator: PublicationAggregator) -> Self {
        let (event_tx, _) = broadcast::channel(256);
        Self {
            aggregator,
            selection: SelectionTracker::new(),
            event_tx,
        }
    }

    pub fn from_config(cfg: &Config) -> Result<Self, FolioError> {
        Ok(Self::new(PublicationAggregator::from_config(cfg)?))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.event_tx.subscribe()
    }

    fn emit(&self, event: AppEvent) {
        // No subscribers is fine.
        let _ = self.event_tx.send(event);
    }
}

pub type SharedState = Arc<AppState>;

/// Switch to `selection` and fetch it in the background.
///
/// Returns the new generation immediately. The fetch result lands in
/// [`AppState::selection`] only if no newer selection was made meanwhile.
pub async fn select_source(state: SharedState, selection: Selection) -> u64 {
    let source = selection.source;
    let author_id = selection.author_id.clone();
    let generation = state.selection.begin(selection).await;
    info!(generation, %source, "Publications source selected");
    state.emit(AppEvent::SelectionStarted { generation, source });

    tokio::spawn(async move {
        let result = state.aggregator.try_fetch(source, author_id.as_deref()).await;
        let event = match state.selection.complete(generation, result).await {
            Completion::Applied { count } => AppEvent::PublicationsLoaded { generation, source, count },
            Completion::Failed { message } => {
                warn!(generation, %source, %message, "Publications fetch failed");
                AppEvent::FetchFailed { generation, source, message }
            }
            Completion::Stale { current } => AppEvent::StaleResultDiscarded { generation, current },
        };
        state.emit(event);
    });

    generation
}
