//! Reservation services
//!
//! - [`validator`] - request normalization
//! - [`writer`] - schema-adaptive insert
//! - [`status`] - status update with column fallback

pub mod status;
pub mod validator;
pub mod writer;

pub use validator::ReservationRequest;
pub use writer::{PayloadShape, WriteFailure, Written, insert_reservation};

use chrono::NaiveDate;
use shared::error::AppError;
use shared::models::{NewReservation, Reservation, ReservationStatus};

use crate::error::ServiceResult;
use crate::store::{self, Filter, RESERVATIONS, RecordStore};

/// Reservations on `date`, optionally restricted to one area
pub async fn list_for_date(
    store: &dyn RecordStore,
    date: NaiveDate,
    area_id: Option<&str>,
) -> ServiceResult<Vec<Reservation>> {
    let filters = vec![Filter::eq("date", date.format("%Y-%m-%d").to_string())];
    let rows = store::select_by_area(store, RESERVATIONS, filters, area_id).await?;
    Ok(store::decode_rows(RESERVATIONS, rows)?)
}

/// Persist a validated reservation and return it as stored
pub async fn create(store: &dyn RecordStore, new: &NewReservation) -> ServiceResult<Reservation> {
    let written = insert_reservation(store, new).await.map_err(AppError::from)?;
    tracing::info!(
        id = ?written.row.get("id"),
        shape = %written.shape,
        guest = %new.guest_name,
        "Reservation created"
    );
    Ok(store::decode_row(RESERVATIONS, written.row)?)
}

/// Change the status of reservation `id`
pub async fn set_status(
    store: &dyn RecordStore,
    id: &str,
    status: ReservationStatus,
) -> ServiceResult<Reservation> {
    let row = status::update_status(store, id, status).await?;
    tracing::info!(id, status = %status, "Reservation status updated");
    Ok(store::decode_row(RESERVATIONS, row)?)
}
