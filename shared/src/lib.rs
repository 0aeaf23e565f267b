//! Shared types for the court reservation service
//!
//! Common types used by the server and by any client rendering the grid:
//! error codes, response envelopes, data models and the deterministic
//! schedule functions.

pub mod error;
pub mod models;
pub mod schedule;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode, Guidance};
