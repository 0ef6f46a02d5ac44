//! Shared types for the Roster scheduling service
//!
//! Common types used by the server and its clients: the unified error
//! system, the data models exchanged over the API, and small utilities.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorCategory, ErrorCode, ErrorResponse};
