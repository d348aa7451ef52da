//! Health check routes
//!
//! | Path | Method | Probe | Failure |
//! |------|--------|-------|---------|
//! | /api/health | GET | `areas` | 500 `{ok: false, error}` |
//! | /api/ready | GET | `reservations` | 503 `{ok: false, checks, error}` |

mod handler;

use axum::{Router, routing::get};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(handler::health))
        .route("/api/ready", get(handler::ready))
}
