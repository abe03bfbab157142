use folio_common::FolioError;
use thiserror::Error;

/// Why a publications fetch produced no usable result.
///
/// Malformed Scholar pages are not represented here: pagination stops and
/// keeps what it already has.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("invalid response body: {0}")]
    InvalidBody(String),

    #[error("request blocked: {0}")]
    Blocked(String),

    #[error("unknown publication source: {0}")]
    UnknownSource(String),
}

impl From<FolioError> for FetchError {
    fn from(err: FolioError) -> Self {
        match err {
            FolioError::Http(e)          => FetchError::Transport(e),
            FolioError::Security(msg)    => FetchError::Blocked(msg),
            FolioError::Serialization(e) => FetchError::InvalidBody(e.to_string()),
            other                        => FetchError::InvalidBody(other.to_string()),
        }
    }
}
