//! Staff actions on a single table

use chrono::{Duration, NaiveDateTime};
use serde::Deserialize;
use serde_json::Value;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    DEFAULT_DURATION_MINS, NewReservation, Reservation, ReservationStatus, WALK_IN_GUEST,
};

use super::{VisualStatus, floor_view, list_tables, project, reservations_around};
use crate::error::ServiceResult;
use crate::reservations::{self, validator};
use crate::store::RecordStore;
use crate::utils::time::to_minute;

/// Optional body of `POST /api/tables/{id}/walk-in`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WalkInRequest {
    pub party_size: Value,
    pub duration_mins: Value,
    pub is_vip: Value,
}

fn table_not_found(table_id: &str) -> AppError {
    AppError::new(ErrorCode::TableNotFound).with_detail("tableId", table_id)
}

/// Free a table by completing the reservation that holds it
pub async fn release_table(
    store: &dyn RecordStore,
    table_id: &str,
    at: NaiveDateTime,
) -> ServiceResult<Reservation> {
    let view = floor_view(store, at, None).await?;
    let table = view.table(table_id).ok_or_else(|| table_not_found(table_id))?;

    let driving = match (&table.reservation, table.visual_status.is_releasable()) {
        (Some(reservation), true) => reservation,
        _ => {
            return Err(AppError::new(ErrorCode::TableNotActive)
                .with_detail("tableId", table_id)
                .with_detail("visualStatus", table.visual_status.as_str())
                .into());
        }
    };

    tracing::info!(table_id, reservation_id = %driving.id, "Releasing table");
    reservations::set_status(store, &driving.id, ReservationStatus::Completed).await
}

/// Seat a party without a booking on a free table
///
/// A table booked later in the day only takes a walk-in that leaves
/// before the next booking starts.
pub async fn mark_walk_in(
    store: &dyn RecordStore,
    table_id: &str,
    request: WalkInRequest,
    at: NaiveDateTime,
) -> ServiceResult<Reservation> {
    let tables = list_tables(store, None).await?;
    let booked = reservations_around(store, at).await?;
    let view = project(&tables, &booked, at);
    let table = view.table(table_id).ok_or_else(|| table_not_found(table_id))?;

    if !matches!(
        table.visual_status,
        VisualStatus::Available | VisualStatus::Reserved
    ) {
        return Err(AppError::new(ErrorCode::TableOccupied)
            .with_detail("tableId", table_id)
            .with_detail("visualStatus", table.visual_status.as_str())
            .into());
    }

    let start_time = to_minute(at.time());
    let duration_mins = validator::coerce_count(&request.duration_mins, DEFAULT_DURATION_MINS);
    let starts_at = at.date().and_time(start_time);
    let ends_at = starts_at + Duration::minutes(i64::from(duration_mins));

    let next = booked
        .iter()
        .filter(|r| r.status.holds_tables() && r.claims_table(table_id) && r.starts_at() >= starts_at)
        .min_by_key(|r| r.starts_at());
    if let Some(next) = next
        && next.starts_at() < ends_at
    {
        return Err(AppError::with_message(
            ErrorCode::TableOccupied,
            "walk-in would overlap the next reservation",
        )
        .with_detail("tableId", table_id)
        .with_detail("reservationId", next.id.as_str())
        .with_detail("availableUntil", next.starts_at().format("%Y-%m-%dT%H:%M:%S").to_string())
        .into());
    }

    let new = NewReservation {
        guest_name: WALK_IN_GUEST.to_string(),
        party_size: validator::coerce_count(&request.party_size, table.table.capacity),
        date: at.date(),
        start_time,
        end_time: None,
        duration_mins,
        table_id: Some(table.table.id.clone()),
        table_ids: Vec::new(),
        is_vip: validator::truthy(&request.is_vip),
        status: ReservationStatus::Confirmed,
        notes: String::new(),
    };

    tracing::info!(table_id, party_size = new.party_size, "Seating walk-in");
    reservations::create(store, &new).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, RESERVATIONS};
    use crate::utils::time::parse_instant;
    use serde_json::json;

    fn store_with_booking() -> MemoryStore {
        let store = MemoryStore::demo();
        store.seed(
            RESERVATIONS,
            vec![json!({
                "id": "r1", "guestName": "Ana", "partySize": 2, "date": "2024-05-01",
                "startTime": "19:30:00", "durationMins": 90, "tableId": "t-bar-1",
                "tableIds": [], "isVip": false, "status": "CONFIRMED", "notes": ""
            })],
        );
        store
    }

    fn at(raw: &str) -> NaiveDateTime {
        parse_instant(raw).unwrap()
    }

    #[tokio::test]
    async fn test_release_completes_driving_reservation() {
        let store = store_with_booking();
        let released = release_table(&store, "t-bar-1", at("2024-05-01T19:45")).await.unwrap();
        assert_eq!(released.id, "r1");
        assert_eq!(released.status, ReservationStatus::Completed);

        let view = floor_view(&store, at("2024-05-01T19:46"), None).await.unwrap();
        assert_eq!(view.table("t-bar-1").unwrap().visual_status, VisualStatus::Available);
    }

    #[tokio::test]
    async fn test_release_requires_active_reservation() {
        let store = store_with_booking();

        let err: AppError = release_table(&store, "t-bar-1", at("2024-05-01T17:00"))
            .await
            .unwrap_err()
            .into();
        assert_eq!(err.code, ErrorCode::TableNotActive);

        let err: AppError = release_table(&store, "t-nope", at("2024-05-01T19:45"))
            .await
            .unwrap_err()
            .into();
        assert_eq!(err.code, ErrorCode::TableNotFound);
        assert!(store.updates().is_empty());
    }

    #[tokio::test]
    async fn test_walk_in_defaults_to_table_capacity() {
        let store = MemoryStore::demo();
        let seated = mark_walk_in(
            &store,
            "t-lobby-2",
            WalkInRequest::default(),
            at("2024-05-01T13:07:42"),
        )
        .await
        .unwrap();

        assert_eq!(seated.guest_name, WALK_IN_GUEST);
        assert_eq!(seated.party_size, 6);
        assert_eq!(seated.duration_mins, 90);
        assert_eq!(seated.start_time.to_string(), "13:07:00");
        assert_eq!(seated.table_id.as_deref(), Some("t-lobby-2"));
        assert_eq!(seated.status, ReservationStatus::Confirmed);

        let view = floor_view(&store, at("2024-05-01T13:10"), None).await.unwrap();
        let table = view.table("t-lobby-2").unwrap();
        assert_eq!(table.visual_status, VisualStatus::Occupied);
        assert!(table.reservation.as_ref().unwrap().display_name.is_none());
    }

    #[tokio::test]
    async fn test_walk_in_rejected_on_busy_table() {
        let store = store_with_booking();

        let err: AppError = mark_walk_in(
            &store,
            "t-bar-1",
            WalkInRequest::default(),
            at("2024-05-01T19:10"),
        )
        .await
        .unwrap_err()
        .into();
        assert_eq!(err.code, ErrorCode::TableOccupied);

        // A booking later in the day does not block a walk-in now
        let request = WalkInRequest {
            party_size: json!("2"),
            ..Default::default()
        };
        let seated = mark_walk_in(&store, "t-bar-1", request, at("2024-05-01T12:00"))
            .await
            .unwrap();
        assert_eq!(seated.party_size, 2);
    }

    #[tokio::test]
    async fn test_walk_in_must_leave_before_next_booking() {
        let store = store_with_booking();

        let err: AppError = mark_walk_in(
            &store,
            "t-bar-1",
            WalkInRequest::default(),
            at("2024-05-01T18:45"),
        )
        .await
        .unwrap_err()
        .into();
        assert_eq!(err.code, ErrorCode::TableOccupied);
        let details = err.details.unwrap();
        assert_eq!(details["reservationId"], "r1");
        assert_eq!(details["availableUntil"], "2024-05-01T19:30:00");
        assert!(store.inserts().is_empty());

        // A short party fits exactly
        let request = WalkInRequest {
            duration_mins: json!(45),
            ..Default::default()
        };
        let seated = mark_walk_in(&store, "t-bar-1", request, at("2024-05-01T18:45"))
            .await
            .unwrap();
        assert_eq!(seated.ends_at(), at("2024-05-01T19:30"));

        let view = floor_view(&store, at("2024-05-01T19:45"), None).await.unwrap();
        let table = view.table("t-bar-1").unwrap();
        assert_eq!(table.reservation.as_ref().unwrap().id, "r1");
    }

    fn store_with_late_booking() -> MemoryStore {
        let store = MemoryStore::demo();
        store.seed(
            RESERVATIONS,
            vec![
                json!({
                    "id": "r-late", "guestName": "Ana", "partySize": 2, "date": "2024-05-01",
                    "startTime": "23:30:00", "durationMins": 90, "tableId": "t-bar-1",
                    "status": "CONFIRMED"
                }),
                json!({
                    "id": "r-early", "guestName": "Luis", "partySize": 2, "date": "2024-05-02",
                    "startTime": "00:10:00", "tableId": "t-bar-2", "status": "CONFIRMED"
                }),
            ],
        );
        store
    }

    #[tokio::test]
    async fn test_booking_past_midnight_still_holds_table() {
        let store = store_with_late_booking();

        let view = floor_view(&store, at("2024-05-02T00:30"), None).await.unwrap();
        assert_eq!(view.table("t-bar-1").unwrap().visual_status, VisualStatus::Occupied);

        let err: AppError = mark_walk_in(
            &store,
            "t-bar-1",
            WalkInRequest::default(),
            at("2024-05-02T00:30"),
        )
        .await
        .unwrap_err()
        .into();
        assert_eq!(err.code, ErrorCode::TableOccupied);

        let released = release_table(&store, "t-bar-1", at("2024-05-02T00:30"))
            .await
            .unwrap();
        assert_eq!(released.id, "r-late");
        assert_eq!(released.status, ReservationStatus::Completed);
    }

    #[tokio::test]
    async fn test_booking_just_after_midnight_is_imminent() {
        let store = store_with_late_booking();

        let view = floor_view(&store, at("2024-05-01T23:50"), None).await.unwrap();
        let table = view.table("t-bar-2").unwrap();
        assert_eq!(table.visual_status, VisualStatus::ReservedActive);
        assert_eq!(table.reservation.as_ref().unwrap().id, "r-early");
    }
}
