//! Google Scholar client.
//!
//! Scholar has no public API, so author profiles are read through a
//! SerpAPI-compatible aggregation endpoint (`engine=google_scholar_author`),
//! optionally behind a CORS relay. Results are paged with `start`/`num`.
//!
//! Paging stops on the first short page. A page whose body is not JSON or
//! has no `articles` array also stops paging, keeping what was collected.

use async_trait::async_trait;
use folio_common::config::ScholarConfig;
use folio_common::SandboxClient as Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

use super::{generated_id, non_empty_str, parse_year, PublicationSource};
use crate::classify::classify;
use crate::error::FetchError;
use crate::models::{Publication, SourceKind, NO_URL, UNKNOWN_AUTHORS, UNKNOWN_VENUE, UNTITLED};

const ENGINE: &str = "google_scholar_author";

pub struct ScholarClient {
    client: Client,
    cfg: ScholarConfig,
}

/// Outcome of reading one page.
#[derive(Debug)]
enum Page {
    Articles(Vec<Value>),
    Malformed(String),
}

impl ScholarClient {
    pub fn new(mut client: Client, cfg: ScholarConfig) -> Self {
        client.allow_url(&cfg.base_url);
        if let Some(proxy) = &cfg.proxy_url {
            client.allow_url(proxy);
        }
        Self { client, cfg }
    }

    fn page_size(&self) -> usize {
        self.cfg.page_size.max(1)
    }

    /// URL for the page starting at `start`, wrapped by the relay if configured.
    fn page_url(&self, author_id: &str, start: usize) -> Result<String, FetchError> {
        let start = start.to_string();
        let num = self.page_size().to_string();
        let target = Url::parse_with_params(
            &self.cfg.base_url,
            &[
                ("engine", ENGINE),
                ("author_id", author_id),
                ("api_key", self.cfg.api_key.as_str()),
                ("start", start.as_str()),
                ("num", num.as_str()),
            ],
        )
        .map_err(|e| FetchError::InvalidBody(format!("bad Scholar base URL: {e}")))?;

        Ok(match &self.cfg.proxy_url {
            Some(proxy) => {
                let encoded: String =
                    url::form_urlencoded::byte_serialize(target.as_str().as_bytes()).collect();
                format!("{proxy}{encoded}")
            }
            None => target.into(),
        })
    }

    async fn fetch_page(&self, url: &str) -> Result<Page, FetchError> {
        let resp = self.client.get(url)?.send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status { status: status.as_u16(), url: url.to_string() });
        }

        let text = resp.text().await?;
        let body: Value = match serde_json::from_str(&text) {
            Ok(v) => v,
            Err(e) => return Ok(Page::Malformed(format!("body is not JSON: {e}"))),
        };

        Ok(match body.get("articles").and_then(Value::as_array) {
            Some(articles) => Page::Articles(articles.clone()),
            None => Page::Malformed("missing `articles` array".to_string()),
        })
    }

    /// Walk every page for `author_id`.
    #[instrument(skip(self))]
    pub async fn fetch_all(&self, author_id: &str) -> Result<Vec<Publication>, FetchError> {
        let page_size = self.page_size();
        let delay = Duration::from_millis(self.cfg.page_delay_ms);
        let mut publications = Vec::new();
        let mut start = 0;

        for page_no in 0..self.cfg.max_pages {
            let url = self.page_url(author_id, start)?;
            let articles = match self.fetch_page(&url).await? {
                Page::Articles(a) => a,
                Page::Malformed(reason) => {
                    warn!(page = page_no, %reason, kept = publications.len(), "Malformed Scholar page, stopping");
                    break;
                }
            };

            let n = articles.len();
            debug!(page = page_no, start, n, "Scholar page fetched");
            publications.extend(articles.iter().map(article_to_publication));

            if n < page_size {
                break;
            }
            if page_no + 1 == self.cfg.max_pages {
                warn!(max_pages = self.cfg.max_pages, "Scholar page limit reached");
                break;
            }

            start += page_size;
            tokio::time::sleep(delay).await;
        }

        Ok(publications)
    }
}

#[async_trait]
impl PublicationSource for ScholarClient {
    fn kind(&self) -> SourceKind {
        SourceKind::Google
    }

    async fn fetch_publications(&self, author_id: &str) -> Result<Vec<Publication>, FetchError> {
        self.fetch_all(author_id).await
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────

fn article_to_publication(article: &Value) -> Publication {
    let venue = non_empty_str(&article["publication"]).unwrap_or_else(|| UNKNOWN_VENUE.to_string());
    let kind = classify(&venue);

    Publication {
        id:        non_empty_str(&article["citation_id"]).unwrap_or_else(generated_id),
        title:     non_empty_str(&article["title"]).unwrap_or_else(|| UNTITLED.to_string()),
        authors:   non_empty_str(&article["authors"]).unwrap_or_else(|| UNKNOWN_AUTHORS.to_string()),
        year:      parse_year(&article["year"]).unwrap_or(0),
        url:       non_empty_str(&article["link"]).unwrap_or_else(|| NO_URL.to_string()),
        citations: Some(
            article["cited_by"]["value"]
                .as_u64()
                .and_then(|c| u32::try_from(c).ok())
                .unwrap_or(0),
        ),
        venue,
        kind,
    }
}
