//! HTTP handlers for all web routes.

pub mod page;
pub mod publications;
pub mod system;
