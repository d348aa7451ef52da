//! Shared types for the floor manager
//!
//! Domain models (areas, tables, reservations) and the unified error and
//! response types used by the floor server and its clients.

pub mod error;
pub mod models;

// Re-exports
pub use axum::Json;
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use http;
pub use serde::{Deserialize, Serialize};
