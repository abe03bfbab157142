//! folio-web: HTTP front for the publications list.
//! Provides:
//!   - A publications page with a type filter
//!   - JSON API for selecting a source and reading the current list
//!   - SSE stream of selection events

pub mod handlers;
pub mod router;
pub mod selection;
pub mod sse;
pub mod state;
