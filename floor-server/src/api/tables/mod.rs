//! Table API
//!
//! | Path | Method | Meaning |
//! |------|--------|---------|
//! | /api/tables?areaId= | GET | tables, optionally of one area |
//! | /api/tables/{id}/release | POST | complete the reservation holding the table |
//! | /api/tables/{id}/walk-in | POST | seat a party without a booking |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/tables", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/{id}/release", post(handler::release))
        .route("/{id}/walk-in", post(handler::walk_in))
}
