//! Availability search
//!
//! Always answers with no options; table assignment is done by staff.

use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/availability", get(availability))
}

#[derive(Debug, Default, Serialize)]
pub struct AvailabilityResponse {
    options: Vec<serde_json::Value>,
}

/// GET /api/availability
pub async fn availability() -> Json<AvailabilityResponse> {
    Json(AvailabilityResponse::default())
}
