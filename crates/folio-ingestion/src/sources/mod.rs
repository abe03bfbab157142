//! Publication source clients.

pub mod backend;
pub mod orcid;
pub mod scholar;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::FetchError;
use crate::models::{Publication, SourceKind};

/// Common interface for all publication source clients.
#[async_trait]
pub trait PublicationSource: Send + Sync {
    fn kind(&self) -> SourceKind;

    /// Retrieve every publication for `author_id`, normalised but unsorted.
    async fn fetch_publications(&self, author_id: &str) -> Result<Vec<Publication>, FetchError>;
}

/// Fallback record id when a source does not supply one.
pub(crate) fn generated_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Non-empty trimmed string at `v`.
pub(crate) fn non_empty_str(v: &Value) -> Option<String> {
    v.as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Identifier that may be encoded as a JSON string or number.
pub(crate) fn id_value(v: &Value) -> Option<String> {
    match v {
        Value::Number(n) => Some(n.to_string()),
        other            => non_empty_str(other),
    }
}

/// Year from a number or from the leading digits of a string ("2021", "2021-05").
pub(crate) fn parse_year(v: &Value) -> Option<i32> {
    match v {
        Value::Number(n) => n.as_i64().and_then(|y| i32::try_from(y).ok()),
        Value::String(s) => {
            let digits: String = s.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse().ok()
        }
        _ => None,
    }
}
