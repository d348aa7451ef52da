//! Record store access
//!
//! The floor server talks to a hosted PostgREST-style API. Everything above
//! this module sees rows as JSON objects and failures as [`StoreError`];
//! the REST adapter is the only place that inspects the store's error text.
//!
//! - [`RestStore`] - reqwest client for the hosted store
//! - [`MemoryStore`] - in-process store with configurable column naming

mod memory;
mod rest;

pub use memory::MemoryStore;
pub use rest::RestStore;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use shared::models::serde_helpers::{ColumnAliases, collapse_aliases};

pub const AREAS: &str = "areas";
pub const TABLES: &str = "tables";
pub const RESERVATIONS: &str = "reservations";

/// A JSON object as sent to or received from the store
pub type Row = Map<String, Value>;

/// Equality filter on a single column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub column: String,
    pub value: String,
}

impl Filter {
    pub fn eq(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }
}

/// Store failure, classified once at the adapter boundary
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// The store does not know a column named in the request
    #[error("{message}")]
    UnknownColumn { column: String, message: String },

    /// The store answered with an error that is not a schema mismatch
    #[error("{message}")]
    Rejected {
        code: Option<String>,
        message: String,
    },

    /// The store could not be reached
    #[error("store unreachable: {0}")]
    Transport(String),

    /// The store answered with a body we could not read
    #[error("unexpected store response: {0}")]
    Decode(String),
}

impl StoreError {
    pub fn unknown_column(column: impl Into<String>, table: &str) -> Self {
        let column = column.into();
        Self::UnknownColumn {
            message: format!("Could not find the '{column}' column of '{table}' in the schema cache"),
            column,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            code: None,
            message: message.into(),
        }
    }

    /// Column named by an unknown-column error
    pub fn missing_column(&self) -> Option<&str> {
        match self {
            Self::UnknownColumn { column, .. } => Some(column),
            _ => None,
        }
    }
}

/// Query and write access to the record store
///
/// Implementations must be cheap to share behind an `Arc`; every method
/// is a single round trip with no retries of its own.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All rows of `table` matching every filter
    async fn select(&self, table: &str, filters: &[Filter]) -> Result<Vec<Row>, StoreError>;

    /// Cheapest possible query against `table`, used by health probes
    async fn probe(&self, table: &str) -> Result<(), StoreError>;

    /// Insert one row and return it as persisted
    async fn insert(&self, table: &str, row: &Row) -> Result<Option<Row>, StoreError>;

    /// Apply `changes` to the row with `id`; returns the updated rows
    async fn update(&self, table: &str, id: &str, changes: &Row) -> Result<Vec<Row>, StoreError>;
}

/// Select with an area filter, retrying on the alternate column name
///
/// Legacy schemas call the column `area`, newer ones `areaId`. The first
/// query's error is discarded when the fallback is tried.
pub async fn select_by_area(
    store: &dyn RecordStore,
    table: &str,
    mut filters: Vec<Filter>,
    area_id: Option<&str>,
) -> Result<Vec<Row>, StoreError> {
    let Some(area_id) = area_id else {
        return store.select(table, &filters).await;
    };

    filters.push(Filter::eq("area", area_id));
    match store.select(table, &filters).await {
        Ok(rows) => Ok(rows),
        Err(err) => {
            tracing::debug!(table, error = %err, "area filter failed, retrying with areaId");
            if let Some(last) = filters.last_mut() {
                last.column = "areaId".into();
            }
            store.select(table, &filters).await
        }
    }
}

/// Decode rows into a model, naming the table on failure
pub fn decode_rows<T: DeserializeOwned + ColumnAliases>(
    table: &str,
    rows: Vec<Row>,
) -> Result<Vec<T>, StoreError> {
    rows.into_iter().map(|row| decode_row(table, row)).collect()
}

/// Decode one row after collapsing columns that name the same field
pub fn decode_row<T: DeserializeOwned + ColumnAliases>(
    table: &str,
    mut row: Row,
) -> Result<T, StoreError> {
    collapse_aliases::<T>(&mut row);
    serde_json::from_value(Value::Object(row))
        .map_err(|e| StoreError::Decode(format!("{table}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_select_by_area_falls_back_to_area_id() {
        let store = MemoryStore::new().with_columns(TABLES, &["id", "areaId", "name", "capacity"]);
        store.seed(
            TABLES,
            vec![
                json!({"id": "t1", "areaId": "area-bar", "name": "B1", "capacity": 2}),
                json!({"id": "t2", "areaId": "area-vip", "name": "V1", "capacity": 3}),
            ],
        );

        let rows = select_by_area(&store, TABLES, vec![], Some("area-bar"))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], "t1");
    }

    #[tokio::test]
    async fn test_select_by_area_uses_area_column_first() {
        let store = MemoryStore::new();
        store.seed(
            TABLES,
            vec![json!({"id": "t1", "area": "area-bar", "name": "B1", "capacity": 2})],
        );

        let rows = select_by_area(&store, TABLES, vec![], Some("area-bar"))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(store.select_log(), vec!["tables?area=eq.area-bar"]);
    }

    #[test]
    fn test_decode_row_tolerates_duplicate_status_columns() {
        let row = json!({
            "id": "abc", "guestName": "Ana", "date": "2024-05-01", "startTime": "19:30:00",
            "tableId": "t-bar-1", "status": "CONFIRMED", "reservation_status": null
        });
        let Value::Object(row) = row else {
            unreachable!()
        };

        let r: shared::models::Reservation = decode_row(RESERVATIONS, row).unwrap();
        assert_eq!(r.status, shared::models::ReservationStatus::Confirmed);
    }

    #[test]
    fn test_unknown_column_message() {
        let err = StoreError::unknown_column("is_vip", RESERVATIONS);
        assert_eq!(err.missing_column(), Some("is_vip"));
        assert_eq!(
            err.to_string(),
            "Could not find the 'is_vip' column of 'reservations' in the schema cache"
        );
        assert!(StoreError::rejected("permission denied").missing_column().is_none());
    }
}
