//! Live floor state
//!
//! - [`projector`] - per-table visual status at an instant
//! - [`actions`] - staff actions on a table (release, walk-in)

pub mod actions;
pub mod projector;

pub use actions::{WalkInRequest, mark_walk_in, release_table};
pub use projector::{FloorView, TableWithStatus, VisualStatus, project};

use chrono::NaiveDateTime;
use shared::models::{DiningTable, Reservation};

use crate::error::ServiceResult;
use crate::reservations;
use crate::store::{self, RecordStore, TABLES};

/// Tables, optionally restricted to one area
pub async fn list_tables(
    store: &dyn RecordStore,
    area_id: Option<&str>,
) -> ServiceResult<Vec<DiningTable>> {
    let rows = store::select_by_area(store, TABLES, Vec::new(), area_id).await?;
    Ok(store::decode_rows(TABLES, rows)?)
}

/// Reservations that can claim a table at `at`
///
/// Covers the day before (bookings running past midnight), the day itself
/// and the day after (bookings imminent just before midnight).
pub async fn reservations_around(
    store: &dyn RecordStore,
    at: NaiveDateTime,
) -> ServiceResult<Vec<Reservation>> {
    let day = at.date();
    let days = [day.pred_opt(), Some(day), day.succ_opt()];

    let mut found = Vec::new();
    for date in days.into_iter().flatten() {
        found.extend(reservations::list_for_date(store, date, None).await?);
    }
    Ok(found)
}

/// Project the floor at `at` from the tables and the reservations around it
pub async fn floor_view(
    store: &dyn RecordStore,
    at: NaiveDateTime,
    area_id: Option<&str>,
) -> ServiceResult<FloorView> {
    let tables = list_tables(store, area_id).await?;
    let reservations = reservations_around(store, at).await?;
    Ok(project(&tables, &reservations, at))
}
