//! Reservation status update
//!
//! The status column is `status` in current schemas and
//! `reservation_status` in older ones. Only an unknown-column error for the
//! column just tried moves on to the next name.

use serde_json::json;
use shared::error::{AppError, ErrorCode};
use shared::models::ReservationStatus;

use crate::error::{ServiceError, ServiceResult};
use crate::store::{RESERVATIONS, RecordStore, Row, StoreError};

/// Candidate status columns, in order
pub const STATUS_COLUMNS: [&str; 2] = ["status", "reservation_status"];

fn failed(err: StoreError) -> ServiceError {
    tracing::error!(error = %err, "Reservation status update failed");
    AppError::new(ErrorCode::StatusUpdateFailed)
        .with_detail("cause", err.to_string())
        .into()
}

/// Set the status of reservation `id`, returning the updated row
pub async fn update_status(
    store: &dyn RecordStore,
    id: &str,
    status: ReservationStatus,
) -> ServiceResult<Row> {
    let mut last_error = None;

    for column in STATUS_COLUMNS {
        let mut changes = Row::new();
        changes.insert(column.to_string(), json!(status.as_str()));

        match store.update(RESERVATIONS, id, &changes).await {
            Ok(rows) => {
                return rows.into_iter().next().ok_or_else(|| {
                    AppError::new(ErrorCode::ReservationNotFound)
                        .with_detail("id", id)
                        .into()
                });
            }
            Err(err) if err.missing_column() == Some(column) => {
                tracing::debug!(column, "Status column missing, trying next candidate");
                last_error = Some(err);
            }
            Err(err) => return Err(failed(err)),
        }
    }

    Err(failed(last_error.unwrap_or_else(|| {
        StoreError::rejected("no status column candidates")
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn store_with(columns: &[&str], row: serde_json::Value) -> MemoryStore {
        let store = MemoryStore::new().with_columns(RESERVATIONS, columns);
        store.seed(RESERVATIONS, vec![row]);
        store
    }

    #[tokio::test]
    async fn test_updates_status_column() {
        let store = store_with(&["id", "status"], json!({"id": "abc", "status": "CONFIRMED"}));
        let row = update_status(&store, "abc", ReservationStatus::Completed).await.unwrap();
        assert_eq!(row["status"], "COMPLETED");
        assert_eq!(store.updates().len(), 1);
    }

    #[tokio::test]
    async fn test_falls_back_to_reservation_status() {
        let store = store_with(
            &["id", "reservation_status"],
            json!({"id": "abc", "reservation_status": "CONFIRMED"}),
        );
        let row = update_status(&store, "abc", ReservationStatus::NoShow).await.unwrap();
        assert_eq!(row["reservation_status"], "NO_SHOW");

        let updates = store.updates();
        assert_eq!(updates.len(), 2);
        assert!(updates[0].contains_key("status"));
        assert!(updates[1].contains_key("reservation_status"));
    }

    #[tokio::test]
    async fn test_other_errors_abort_immediately() {
        let store = MemoryStore::new()
            .with_failure(RESERVATIONS, StoreError::rejected("permission denied"));
        let err: AppError = update_status(&store, "abc", ReservationStatus::Cancelled)
            .await
            .unwrap_err()
            .into();
        assert_eq!(err.code, ErrorCode::StatusUpdateFailed);
        assert_eq!(err.details.unwrap()["cause"], "permission denied");
        assert_eq!(store.updates().len(), 1);
    }

    #[tokio::test]
    async fn test_no_matching_row_is_not_found() {
        let store = store_with(&["id", "status"], json!({"id": "abc", "status": "CONFIRMED"}));
        let err: AppError = update_status(&store, "zzz", ReservationStatus::Cancelled)
            .await
            .unwrap_err()
            .into();
        assert_eq!(err.code, ErrorCode::ReservationNotFound);
    }

    #[tokio::test]
    async fn test_both_columns_missing() {
        let store = store_with(&["id", "state"], json!({"id": "abc"}));
        let err: AppError = update_status(&store, "abc", ReservationStatus::Cancelled)
            .await
            .unwrap_err()
            .into();
        assert_eq!(err.code, ErrorCode::StatusUpdateFailed);
        assert_eq!(store.updates().len(), 2);
    }
}
