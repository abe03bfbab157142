//! Which source the page currently shows, and what it loaded.
//!
//! Every new selection bumps a generation counter. A fetch carries the
//! generation it was started for and its result is applied only if that
//! generation is still current, so a slow response for an old selection
//! can never overwrite a newer one. Old fetches are not cancelled; their
//! results are dropped on arrival.

use chrono::{DateTime, Utc};
use folio_ingestion::{FetchError, Publication, SourceKind};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub source: SourceKind,
    /// `None` means the configured default identifier.
    pub author_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LoadStatus {
    Idle,
    Loading,
    Ready,
    Failed { message: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub generation: u64,
    pub selection: Option<Selection>,
    pub status: LoadStatus,
    pub publications: Vec<Publication>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            generation: 0,
            selection: None,
            status: LoadStatus::Idle,
            publications: vec![],
            updated_at: None,
        }
    }
}

/// What happened to a finished fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Applied { count: usize },
    Failed { message: String },
    /// A newer selection exists; the result was dropped.
    Stale { current: u64 },
}

#[derive(Debug, Default)]
pub struct SelectionTracker {
    inner: RwLock<Snapshot>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new selection and return its generation.
    /// The previous list stays visible until the new one arrives.
    pub async fn begin(&self, selection: Selection) -> u64 {
        let mut snap = self.inner.write().await;
        snap.generation += 1;
        snap.selection = Some(selection);
        snap.status = LoadStatus::Loading;
        snap.generation
    }

    /// Apply a fetch result if `generation` is still current.
    pub async fn complete(
        &self,
        generation: u64,
        result: Result<Vec<Publication>, FetchError>,
    ) -> Completion {
        let mut snap = self.inner.write().await;
        if snap.generation != generation {
            debug!(generation, current = snap.generation, "Discarding stale publications result");
            return Completion::Stale { current: snap.generation };
        }

        snap.updated_at = Some(Utc::now());
        match result {
            Ok(publications) => {
                let count = publications.len();
                snap.publications = publications;
                snap.status = LoadStatus::Ready;
                Completion::Applied { count }
            }
            Err(e) => {
                let message = e.to_string();
                snap.publications.clear();
                snap.status = LoadStatus::Failed { message: message.clone() };
                Completion::Failed { message }
            }
        }
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.inner.read().await.clone()
    }
}
