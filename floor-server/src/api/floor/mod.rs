//! Floor API
//!
//! `GET /api/floor?at=YYYY-MM-DDTHH:MM[:SS]&areaId=` projects every table's
//! visual status at `at` (default: now in business time).

mod handler;

use axum::{Router, routing::get};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/floor", get(handler::view))
}
