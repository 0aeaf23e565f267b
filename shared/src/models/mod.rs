//! Data models
//!
//! Shared between court-server and the rendering client (via API).
//! JSON field names are camelCase.

pub mod day_config;
pub mod reservation;

// Re-exports
pub use day_config::*;
pub use reservation::*;
