//! Configuration loading for Folio.
//! Reads folio.toml from the current directory or the path in FOLIO_CONFIG,
//! then applies environment overrides (a `.env` file is honoured).

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

use crate::error::FolioError;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub scholar: ScholarConfig,
    #[serde(default)]
    pub orcid: OrcidConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

// ── Server ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String { "127.0.0.1:3000".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

// ── Scholar source ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScholarConfig {
    /// Search-aggregation endpoint (SerpAPI-compatible).
    #[serde(default = "default_scholar_base")]
    pub base_url: String,
    /// Optional CORS relay prefix; the encoded target URL is appended to it.
    #[serde(default)]
    pub proxy_url: Option<String>,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_scholar_author")]
    pub author_id: String,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
}

fn default_scholar_base()   -> String { "https://serpapi.com/search.json".to_string() }
fn default_scholar_author() -> String { "qc6CJjYAAAAJ".to_string() }
fn default_page_size()      -> usize  { 20 }
fn default_page_delay_ms()  -> u64    { 500 }
fn default_max_pages()      -> usize  { 50 }

impl Default for ScholarConfig {
    fn default() -> Self {
        Self {
            base_url: default_scholar_base(),
            proxy_url: None,
            api_key: String::new(),
            author_id: default_scholar_author(),
            page_size: default_page_size(),
            page_delay_ms: default_page_delay_ms(),
            max_pages: default_max_pages(),
        }
    }
}

// ── ORCID source ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrcidConfig {
    #[serde(default = "default_orcid_base")]
    pub base_url: String,
    #[serde(default = "default_orcid_id")]
    pub orcid_id: String,
}

fn default_orcid_base() -> String { "https://pub.orcid.org/v3.0".to_string() }
fn default_orcid_id()   -> String { "0000-0002-1825-0097".to_string() }

impl Default for OrcidConfig {
    fn default() -> Self {
        Self {
            base_url: default_orcid_base(),
            orcid_id: default_orcid_id(),
        }
    }
}

// ── Custom backend ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

fn default_api_url() -> String { "https://api.example.com".to_string() }

impl Default for BackendConfig {
    fn default() -> Self {
        Self { api_url: default_api_url() }
    }
}

// ── HTTP client ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub extra_allowed_hosts: Vec<String>,
}

fn default_timeout_secs() -> u64 { 30 }

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            extra_allowed_hosts: vec![],
        }
    }
}


impl Config {
    /// Load configuration from folio.toml.
    /// Checks FOLIO_CONFIG env var first, then current directory.
    /// A missing file is not an error: defaults are used.
    pub fn load() -> Result<Self, FolioError> {
        // A missing .env is fine; only the process environment matters then.
        let _ = dotenvy::dotenv();

        let path = std::env::var("FOLIO_CONFIG")
            .unwrap_or_else(|_| "folio.toml".to_string());

        let mut config = if Path::new(&path).exists() {
            debug!(%path, "Reading configuration file");
            Self::from_path(&path)?
        } else {
            warn!(%path, "Config file not found, using defaults");
            Self::default()
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse a TOML config file without applying overrides.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FolioError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, FolioError> {
        toml::from_str(content).map_err(|e| FolioError::Config(e.to_string()))
    }

    /// Overlay environment values. `lookup` is injected so tests don't
    /// have to mutate the process environment.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("FOLIO_SERPAPI_KEY") {
            self.scholar.api_key = key;
        }
        if let Some(author) = non_empty("FOLIO_SCHOLAR_AUTHOR") {
            self.scholar.author_id = author;
        }
        if let Some(orcid) = non_empty("FOLIO_ORCID_ID") {
            self.orcid.orcid_id = orcid;
        }
        if let Some(api_url) = non_empty("FOLIO_API_URL") {
            self.backend.api_url = api_url;
        }
        if let Some(bind) = non_empty("FOLIO_BIND") {
            self.server.bind = bind;
        }
    }
}
