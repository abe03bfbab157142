//! folio-ingestion: Publication retrieval and normalisation.
//! - Scholar (proxy-relayed aggregation API) with pagination
//! - ORCID public works API
//! - Custom JSON backend
//! - Heuristic publication-type classification
//! - Year/citation ordering and type filtering

pub mod aggregate;
pub mod classify;
pub mod error;
pub mod models;
pub mod sources;

pub use aggregate::{filter_by_type, sort_publications, PublicationAggregator};
pub use error::FetchError;
pub use models::{Publication, PublicationType, SourceKind, TypeFilter};
