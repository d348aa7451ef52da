//! Reservation API
//!
//! | Path | Method | Meaning |
//! |------|--------|---------|
//! | /api/reservations?date=&areaId= | GET | reservations of a day |
//! | /api/reservations | POST | create a reservation |
//! | /api/reservations/{id}/status | PATCH | change a reservation's status |

mod handler;

use axum::{
    Router,
    routing::{get, patch},
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/reservations", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}/status", patch(handler::update_status))
}
