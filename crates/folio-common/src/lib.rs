//! folio-common: Shared errors, configuration and the outbound HTTP client
//! used by every Folio crate.

pub mod config;
pub mod error;
pub mod sandbox;

pub use config::Config;
pub use error::{ApiError, FolioError, Result};
pub use sandbox::SandboxClient;
