//! Data models for the publications list.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FetchError;

pub const UNTITLED: &str = "Untitled";
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";
pub const UNKNOWN_AUTHORS: &str = "Unknown Authors";
pub const UNKNOWN_VENUE: &str = "Unknown Publication";
pub const NO_URL: &str = "#";

/// The uniform record produced regardless of source.
///
/// Every field always carries a value; extractors substitute the
/// placeholders above rather than leaving anything unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    pub id: String,
    pub title: String,
    pub authors: String,
    pub venue: String,
    /// `0` when the source gave nothing parseable.
    pub year: i32,
    pub url: String,
    /// Only the Scholar source reports citation counts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citations: Option<u32>,
    #[serde(rename = "type")]
    pub kind: PublicationType,
}

impl Publication {
    /// Citation count used for ordering; missing counts rank as zero.
    pub fn citation_count(&self) -> u32 {
        self.citations.unwrap_or(0)
    }
}

/// Derived publication category. Never taken from the source directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicationType {
    Journal,
    Conference,
    Review,
    Other,
}

impl PublicationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PublicationType::Journal    => "journal",
            PublicationType::Conference => "conference",
            PublicationType::Review     => "review",
            PublicationType::Other      => "other",
        }
    }
}

impl fmt::Display for PublicationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a publications list is fetched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Google,
    Orcid,
    Backend,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Google  => "google",
            SourceKind::Orcid   => "orcid",
            SourceKind::Backend => "backend",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "google" | "scholar" | "google-scholar" => Ok(SourceKind::Google),
            "orcid"                                 => Ok(SourceKind::Orcid),
            "backend" | "custom"                    => Ok(SourceKind::Backend),
            other => Err(FetchError::UnknownSource(other.to_string())),
        }
    }
}

/// Client-side view filter over [`PublicationType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeFilter {
    #[default]
    All,
    Journal,
    Conference,
    Review,
    Other,
}

impl TypeFilter {
    pub fn matches(&self, kind: PublicationType) -> bool {
        match self {
            TypeFilter::All        => true,
            TypeFilter::Journal    => kind == PublicationType::Journal,
            TypeFilter::Conference => kind == PublicationType::Conference,
            TypeFilter::Review     => kind == PublicationType::Review,
            TypeFilter::Other      => kind == PublicationType::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TypeFilter::All        => "all",
            TypeFilter::Journal    => "journal",
            TypeFilter::Conference => "conference",
            TypeFilter::Review     => "review",
            TypeFilter::Other      => "other",
        }
    }
}
