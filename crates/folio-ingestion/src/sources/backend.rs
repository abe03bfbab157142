//! Custom publications backend.
//!
//! GET `{api_url}/publications` returning a JSON array of records already in
//! roughly the [`Publication`] shape. Each field is read on its own: a missing
//! or wrongly typed field gets the usual placeholder and a missing `type` is
//! re-derived from the venue.

use async_trait::async_trait;
use folio_common::config::BackendConfig;
use folio_common::SandboxClient as Client;
use serde_json::Value;
use tracing::{debug, instrument};

use super::{generated_id, id_value, non_empty_str, parse_year, PublicationSource};
use crate::classify::classify;
use crate::error::FetchError;
use crate::models::{
    Publication, PublicationType, SourceKind, NO_URL, UNKNOWN_AUTHORS, UNKNOWN_VENUE, UNTITLED,
};

pub struct BackendClient {
    client: Client,
    api_url: String,
}

impl BackendClient {
    pub fn new(mut client: Client, cfg: &BackendConfig) -> Self {
        client.allow_url(&cfg.api_url);
        Self {
            client,
            api_url: cfg.api_url.trim_end_matches('/').to_string(),
        }
    }

    #[instrument(skip(self))]
    pub async fn fetch_records(&self) -> Result<Vec<Publication>, FetchError> {
        let url = format!("{}/publications", self.api_url);
        let resp = self.client.get(&url)?.send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status { status: status.as_u16(), url });
        }

        let records: Vec<Value> = resp
            .json()
            .await
            .map_err(|e| FetchError::InvalidBody(format!("backend publications: {e}")))?;

        debug!(n = records.len(), "Backend publications fetched");
        Ok(records.iter().map(record_to_publication).collect())
    }
}

#[async_trait]
impl PublicationSource for BackendClient {
    fn kind(&self) -> SourceKind {
        SourceKind::Backend
    }

    /// The backend serves a single author; the id is ignored.
    async fn fetch_publications(&self, _author_id: &str) -> Result<Vec<Publication>, FetchError> {
        self.fetch_records().await
    }
}

/// Unknown type strings are ignored rather than failing the record.
fn parse_type(s: &str) -> Option<PublicationType> {
    match s.to_lowercase().as_str() {
        "journal"    => Some(PublicationType::Journal),
        "conference" => Some(PublicationType::Conference),
        "review"     => Some(PublicationType::Review),
        "other"      => Some(PublicationType::Other),
        _            => None,
    }
}

fn record_to_publication(record: &Value) -> Publication {
    let venue = non_empty_str(&record["venue"]).unwrap_or_else(|| UNKNOWN_VENUE.to_string());
    let kind = non_empty_str(&record["type"])
        .as_deref()
        .and_then(parse_type)
        .unwrap_or_else(|| classify(&venue));

    Publication {
        id:        id_value(&record["id"]).unwrap_or_else(generated_id),
        title:     non_empty_str(&record["title"]).unwrap_or_else(|| UNTITLED.to_string()),
        authors:   non_empty_str(&record["authors"]).unwrap_or_else(|| UNKNOWN_AUTHORS.to_string()),
        year:      parse_year(&record["year"]).unwrap_or(0),
        url:       non_empty_str(&record["url"]).unwrap_or_else(|| NO_URL.to_string()),
        citations: record["citations"].as_u64().and_then(|c| u32::try_from(c).ok()),
        venue,
        kind,
    }
}
