//! ORCID public API client.
//!
//! Endpoint: https://pub.orcid.org/v3.0/{orcid}/works
//!
//! The works endpoint returns `group`s of duplicate submissions; the first
//! `work-summary` in each group is used. Every field is extracted on its own
//! and falls back to a placeholder, so one odd field never drops a record.

use async_trait::async_trait;
use folio_common::config::OrcidConfig;
use folio_common::SandboxClient as Client;
use reqwest::header::ACCEPT;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::{generated_id, id_value, non_empty_str, parse_year, PublicationSource};
use crate::classify::classify_orcid_type;
use crate::error::FetchError;
use crate::models::{
    Publication, SourceKind, NO_URL, UNKNOWN_AUTHOR, UNKNOWN_AUTHORS, UNKNOWN_VENUE, UNTITLED,
};

const DOI_RESOLVER: &str = "https://doi.org/";

pub struct OrcidClient {
    client: Client,
    base_url: String,
}

impl OrcidClient {
    pub fn new(mut client: Client, cfg: &OrcidConfig) -> Self {
        client.allow_url(&cfg.base_url);
        Self {
            client,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch and normalise all works for `orcid_id`.
    #[instrument(skip(self))]
    pub async fn fetch_works(&self, orcid_id: &str) -> Result<Vec<Publication>, FetchError> {
        let url = format!("{}/{}/works", self.base_url, orcid_id.trim());
        let resp = self.client
            .get(&url)?
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status { status: status.as_u16(), url });
        }

        let text = resp.text().await?;
        let body: Value = serde_json::from_str(&text)
            .map_err(|e| FetchError::InvalidBody(format!("ORCID works body: {e}")))?;

        let Some(groups) = body["group"].as_array() else {
            warn!(%orcid_id, "ORCID response has no `group` array");
            return Err(FetchError::InvalidBody("ORCID works body has no `group` array".to_string()));
        };

        let works: Vec<Publication> = groups
            .iter()
            .filter_map(|g| g["work-summary"].as_array().and_then(|s| s.first()))
            .map(summary_to_publication)
            .collect();

        debug!(groups = groups.len(), works = works.len(), "ORCID works fetched");
        Ok(works)
    }
}

#[async_trait]
impl PublicationSource for OrcidClient {
    fn kind(&self) -> SourceKind {
        SourceKind::Orcid
    }

    async fn fetch_publications(&self, orcid_id: &str) -> Result<Vec<Publication>, FetchError> {
        self.fetch_works(orcid_id).await
    }
}

// ── Field extraction ───────────────────────────────────────────────────────

pub(crate) fn summary_to_publication(summary: &Value) -> Publication {
    let work_type = non_empty_str(&summary["type"]);

    Publication {
        id:        id_value(&summary["put-code"]).unwrap_or_else(generated_id),
        title:     extract_title(summary).unwrap_or_else(|| UNTITLED.to_string()),
        authors:   extract_authors(summary).unwrap_or_else(|| UNKNOWN_AUTHORS.to_string()),
        venue:     extract_venue(summary).unwrap_or_else(|| UNKNOWN_VENUE.to_string()),
        year:      extract_year(summary).unwrap_or(0),
        url:       extract_url(summary).unwrap_or_else(|| NO_URL.to_string()),
        citations: None,
        kind:      classify_orcid_type(work_type.as_deref()),
    }
}

fn extract_title(summary: &Value) -> Option<String> {
    non_empty_str(&summary["title"]["title"]["value"])
}

fn extract_year(summary: &Value) -> Option<i32> {
    parse_year(&summary["publication-date"]["year"]["value"])
}

/// `None` only when there is no contributor list at all.
fn extract_authors(summary: &Value) -> Option<String> {
    let contributors = summary["contributors"]["contributor"].as_array()?;
    if contributors.is_empty() {
        return None;
    }
    let names: Vec<String> = contributors
        .iter()
        .map(|c| non_empty_str(&c["credit-name"]["value"]).unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()))
        .collect();
    Some(names.join(", "))
}

fn extract_venue(summary: &Value) -> Option<String> {
    non_empty_str(&summary["journal-title"]["value"])
        .or_else(|| non_empty_str(&summary["type"]))
}

/// DOI first, then a URL-typed external id, then the work's own url.
fn extract_url(summary: &Value) -> Option<String> {
    let ids = summary["external-ids"]["external-id"]
        .as_array()
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    let of_type = |wanted: &[&str]| {
        ids.iter().find(|id| {
            id["external-id-type"]
                .as_str()
                .map(|t| wanted.iter().any(|w| t.eq_ignore_ascii_case(w)))
                .unwrap_or(false)
        })
    };

    if let Some(doi) = of_type(&["doi"][..]).and_then(|id| non_empty_str(&id["external-id-value"])) {
        return Some(doi_url(&doi));
    }

    if let Some(id) = of_type(&["uri", "url"][..]) {
        let link = non_empty_str(&id["external-id-url"]["value"])
            .or_else(|| non_empty_str(&id["external-id-value"]));
        if link.is_some() {
            return link;
        }
    }

    non_empty_str(&summary["url"]["value"])
}

/// Prefixes stripped (case-insensitively) before re-resolving a DOI.
const DOI_PREFIXES: &[&str] = &[
    "https://doi.org/",
    "http://doi.org/",
    "https://dx.doi.org/",
    "http://dx.doi.org/",
    "doi:",
];

/// `10.1/x`, `doi:10.1/x` and resolver URLs all map to `https://doi.org/10.1/x`.
fn doi_url(doi: &str) -> String {
    let doi = doi.trim();
    let bare = DOI_PREFIXES
        .iter()
        .find_map(|prefix| {
            doi.get(..prefix.len())
                .filter(|head| head.eq_ignore_ascii_case(prefix))
                .map(|_| doi[prefix.len()..].trim_start())
        })
        .unwrap_or(doi);
    format!("{DOI_RESOLVER}{bare}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PublicationType;
    use serde_json::json;

    fn full_summary() -> Value {
        json!({
            "put-code": 98765,
            "type": "journal-article",
            "title": { "title": { "value": "Reinforcement Learning for Aerial Manipulation" } },
            "journal-title": { "value": "Journal of Artificial Intelligence Research" },
            "publication-date": { "year": { "value": "2020" }, "month": { "value": "06" } },
            "external-ids": { "external-id": [
                { "external-id-type": "uri", "external-id-value": "https://example.org/p/1",
                  "external-id-url": { "value": "https://example.org/p/1" } },
                { "external-id-type": "doi", "external-id-value": "10.1613/jair.1.12345" }
            ]},
            "contributors": { "contributor": [
                { "credit-name": { "value": "A. Johnson" } },
                { "credit-name": null },
                { "credit-name": { "value": "M. Davis" } }
            ]}
        })
    }

    #[test]
    fn test_full_summary() {
        let p = summary_to_publication(&full_summary());
        assert_eq!(p.id, "98765");
        assert_eq!(p.title, "Reinforcement Learning for Aerial Manipulation");
        assert_eq!(p.venue, "Journal of Artificial Intelligence Research");
        assert_eq!(p.year, 2020);
        assert_eq!(p.authors, "A. Johnson, Unknown Author, M. Davis");
        assert_eq!(p.citations, None);
        assert_eq!(p.kind, PublicationType::Journal);
    }

    #[test]
    fn test_doi_preferred_over_url() {
        let p = summary_to_publication(&full_summary());
        assert_eq!(p.url, "https://doi.org/10.1613/jair.1.12345");
    }

    #[test]
    fn test_url_external_id_used_without_doi() {
        let s = json!({
            "external-ids": { "external-id": [
                { "external-id-type": "url", "external-id-value": "https://example.org/paper" }
            ]}
        });
        assert_eq!(summary_to_publication(&s).url, "https://example.org/paper");
    }

    #[test]
    fn test_missing_contributors() {
        let mut s = full_summary();
        s.as_object_mut().unwrap().remove("contributors");
        assert_eq!(summary_to_publication(&s).authors, UNKNOWN_AUTHORS);
    }

    #[test]
    fn test_venue_falls_back_to_work_type() {
        let s = json!({ "type": "conference-paper" });
        let p = summary_to_publication(&s);
        assert_eq!(p.venue, "conference-paper");
        assert_eq!(p.kind, PublicationType::Conference);
    }

    #[test]
    fn test_empty_summary_uses_placeholders() {
        let p = summary_to_publication(&json!({}));
        assert_eq!(p.title, UNTITLED);
        assert_eq!(p.authors, UNKNOWN_AUTHORS);
        assert_eq!(p.venue, UNKNOWN_VENUE);
        assert_eq!(p.year, 0);
        assert_eq!(p.url, NO_URL);
        assert_eq!(p.kind, PublicationType::Other);
        assert!(!p.id.is_empty());
    }

    #[test]
    fn test_wrongly_typed_fields_do_not_abort() {
        let s = json!({
            "put-code": "abc",
            "title": "flat string instead of object",
            "publication-date": { "year": { "value": 2017 } },
            "external-ids": { "external-id": "oops" },
            "contributors": { "contributor": {} }
        });
        let p = summary_to_publication(&s);
        assert_eq!(p.id, "abc");
        assert_eq!(p.title, UNTITLED);
        assert_eq!(p.year, 2017);
        assert_eq!(p.url, NO_URL);
        assert_eq!(p.authors, UNKNOWN_AUTHORS);
    }

    #[test]
    fn test_doi_url_normalisation() {
        assert_eq!(doi_url("10.1/x"), "https://doi.org/10.1/x");
        assert_eq!(doi_url("doi:10.1/x"), "https://doi.org/10.1/x");
        assert_eq!(doi_url("https://doi.org/10.1/x"), "https://doi.org/10.1/x");
        assert_eq!(doi_url("http://doi.org/10.1/x"), "https://doi.org/10.1/x");
        assert_eq!(doi_url("https://dx.doi.org/10.1/x"), "https://doi.org/10.1/x");
        assert_eq!(doi_url("http://dx.doi.org/10.1/x"), "https://doi.org/10.1/x");
        assert_eq!(doi_url("DOI:10.1/x"), "https://doi.org/10.1/x");
        assert_eq!(doi_url(" HTTPS://DOI.ORG/10.1/x "), "https://doi.org/10.1/x");
    }
}
