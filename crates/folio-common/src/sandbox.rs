use reqwest::{Client, ClientBuilder};
use std::collections::HashSet;
use std::time::Duration;
use url::Url;

use crate::config::HttpConfig;
use crate::error::FolioError;

/// Hosts every Folio deployment needs to reach.
const DEFAULT_HOSTS: &[&str] = &[
    "serpapi.com",     // Scholar aggregation API
    "corsproxy.io",    // CORS relay in front of the Scholar API
    "pub.orcid.org",   // ORCID public works API
    "localhost",
    "127.0.0.1",
];

/// An HTTP client that only talks to an allowlist of hosts.
///
/// Every outbound request made by the publication sources goes through
/// here, so a misconfigured URL fails fast with [`FolioError::Security`]
/// instead of reaching an arbitrary host.
#[derive(Debug, Clone)]
pub struct SandboxClient {
    client: Client,
    allowlist: HashSet<String>,
}

impl SandboxClient {
    /// Creates a client with the default allowlist and a 30s timeout.
    pub fn new() -> Result<Self, FolioError> {
        Self::from_config(&HttpConfig::default())
    }

    /// Creates a client honouring the `[http]` section of the config.
    pub fn from_config(cfg: &HttpConfig) -> Result<Self, FolioError> {
        let mut allowlist: HashSet<String> =
            DEFAULT_HOSTS.iter().map(|h| h.to_string()).collect();
        for host in &cfg.extra_allowed_hosts {
            allowlist.insert(host.trim().to_lowercase());
        }

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .user_agent(concat!("folio/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FolioError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, allowlist })
    }

    /// Appends an exact hostname to the allowlist.
    pub fn allow_domain(&mut self, domain: &str) {
        self.allowlist.insert(domain.to_lowercase());
    }

    /// Allows the host of `url`, if it parses. Used for configured base URLs.
    pub fn allow_url(&mut self, url: &str) {
        if let Some(host) = Url::parse(url).ok().and_then(|u| u.host_str().map(String::from)) {
            self.allow_domain(&host);
        }
    }

    /// Validates if a URL is permitted under the current policy.
    pub fn is_allowed(&self, url: &str) -> bool {
        if let Ok(parsed) = Url::parse(url) {
            if let Some(host) = parsed.host_str() {
                // Exact match or a subdomain of an allowed host
                for allowed in &self.allowlist {
                    if host == allowed || host.ends_with(&format!(".{}", allowed)) {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Builds a GET request if the URL passes the allowlist.
    pub fn get(&self, url: &str) -> Result<reqwest::RequestBuilder, FolioError> {
        if !self.is_allowed(url) {
            return Err(FolioError::Security(format!(
                "domain not in allowlist for URL {}",
                url
            )));
        }

        Ok(self.client.get(url))
    }
}
