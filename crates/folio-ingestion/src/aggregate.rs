//! Aggregator entry points: pick a source, fetch everything, sort.
//!
//! Two shapes are offered. The `try_*` methods return a tagged
//! `Result` so callers can tell "no publications" from "fetch failed".
//! The plain methods log the error and return an empty list; they are the
//! ones a page renderer should call when it must never fail.

use folio_common::{Config, FolioError, SandboxClient};
use tracing::{info, instrument, warn};

use crate::error::FetchError;
use crate::models::{Publication, SourceKind, TypeFilter};
use crate::sources::backend::BackendClient;
use crate::sources::orcid::OrcidClient;
use crate::sources::scholar::ScholarClient;
use crate::sources::PublicationSource;

pub struct PublicationAggregator {
    scholar: ScholarClient,
    orcid: OrcidClient,
    backend: BackendClient,
    default_scholar_author: String,
    default_orcid_id: String,
}

impl PublicationAggregator {
    pub fn from_config(cfg: &Config) -> Result<Self, FolioError> {
        let client = SandboxClient::from_config(&cfg.http)?;
        Ok(Self {
            scholar: ScholarClient::new(client.clone(), cfg.scholar.clone()),
            orcid: OrcidClient::new(client.clone(), &cfg.orcid),
            backend: BackendClient::new(client, &cfg.backend),
            default_scholar_author: cfg.scholar.author_id.clone(),
            default_orcid_id: cfg.orcid.orcid_id.clone(),
        })
    }

    fn source(&self, kind: SourceKind) -> &dyn PublicationSource {
        match kind {
            SourceKind::Google  => &self.scholar,
            SourceKind::Orcid   => &self.orcid,
            SourceKind::Backend => &self.backend,
        }
    }

    /// Configured default identifier for `kind`; blank input counts as omitted.
    fn resolve_id<'a>(&'a self, kind: SourceKind, id: Option<&'a str>) -> &'a str {
        match id.map(str::trim).filter(|s| !s.is_empty()) {
            Some(id) => id,
            None => match kind {
                SourceKind::Google  => &self.default_scholar_author,
                SourceKind::Orcid   => &self.default_orcid_id,
                SourceKind::Backend => "",
            },
        }
    }

    /// Fetch and sort, reporting failures.
    #[instrument(skip(self))]
    pub async fn try_fetch(
        &self,
        kind: SourceKind,
        id: Option<&str>,
    ) -> Result<Vec<Publication>, FetchError> {
        let author_id = self.resolve_id(kind, id);
        let source = self.source(kind);
        let mut publications = source.fetch_publications(author_id).await?;
        sort_publications(&mut publications);
        info!(source = %source.kind(), author_id, n = publications.len(), "Publications fetched");
        Ok(publications)
    }

    /// Fetch and sort; any failure is logged and becomes an empty list.
    pub async fn fetch(&self, kind: SourceKind, id: Option<&str>) -> Vec<Publication> {
        match self.try_fetch(kind, id).await {
            Ok(publications) => publications,
            Err(e) => {
                warn!(source = %kind, error = %e, "Error fetching publications");
                vec![]
            }
        }
    }

    pub async fn try_fetch_from_google_scholar(
        &self,
        author_id: Option<&str>,
    ) -> Result<Vec<Publication>, FetchError> {
        self.try_fetch(SourceKind::Google, author_id).await
    }

    pub async fn fetch_from_google_scholar(&self, author_id: Option<&str>) -> Vec<Publication> {
        self.fetch(SourceKind::Google, author_id).await
    }

    pub async fn try_fetch_from_orcid(
        &self,
        orcid_id: Option<&str>,
    ) -> Result<Vec<Publication>, FetchError> {
        self.try_fetch(SourceKind::Orcid, orcid_id).await
    }

    pub async fn fetch_from_orcid(&self, orcid_id: Option<&str>) -> Vec<Publication> {
        self.fetch(SourceKind::Orcid, orcid_id).await
    }

    pub async fn try_fetch_from_custom_backend(&self) -> Result<Vec<Publication>, FetchError> {
        self.try_fetch(SourceKind::Backend, None).await
    }

    pub async fn fetch_from_custom_backend(&self) -> Vec<Publication> {
        self.fetch(SourceKind::Backend, None).await
    }
}

/// Newest first; within a year, most cited first. Stable for full ties.
pub fn sort_publications(publications: &mut [Publication]) {
    publications.sort_by(|a, b| {
        b.year
            .cmp(&a.year)
            .then_with(|| b.citation_count().cmp(&a.citation_count()))
    });
}

/// Records whose type passes `filter`, in their existing order.
pub fn filter_by_type(publications: &[Publication], filter: TypeFilter) -> Vec<Publication> {
    publications
        .iter()
        .filter(|p| filter.matches(p.kind))
        .cloned()
        .collect()
}
