//! In-process record store
//!
//! Behaves like the hosted store closely enough to exercise schema drift:
//! a table may be restricted to a fixed column set, in which case writes
//! and filters naming any other column fail with the same unknown-column
//! error the REST adapter produces.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

use super::{AREAS, Filter, RecordStore, Row, StoreError, TABLES};

#[derive(Default)]
struct Inner {
    rows: HashMap<String, Vec<Row>>,
    columns: HashMap<String, HashSet<String>>,
    failures: HashMap<String, StoreError>,
    inserts: Vec<Row>,
    updates: Vec<Row>,
    selects: Vec<String>,
}

/// In-memory [`RecordStore`]
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
    next_id: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Areas and tables of the demo restaurant
    ///
    /// Both tables are restricted to the demo columns, so area filters
    /// resolve through `areaId` the way a camelCase schema does.
    pub fn demo() -> Self {
        let store = Self::new()
            .with_columns(AREAS, &["id", "name", "maxTables"])
            .with_columns(TABLES, &DEMO_TABLE_COLUMNS);
        store.seed(
            AREAS,
            vec![
                json!({"id": "area-terraza", "name": "Terraza", "maxTables": 12}),
                json!({"id": "area-patio", "name": "Patio", "maxTables": 12}),
                json!({"id": "area-lobby", "name": "Lobby", "maxTables": 10}),
                json!({"id": "area-bar", "name": "Bar", "maxTables": 10}),
                json!({"id": "area-vip", "name": "Salones VIP", "maxTables": 8}),
            ],
        );
        store.seed(
            TABLES,
            vec![
                demo_table("t-terr-1", "area-terraza", 4, "standard", "T1", 16.0, 20.0, None),
                demo_table("t-terr-2", "area-terraza", 4, "standard", "T2", 42.0, 28.0, None),
                demo_table("t-patio-1", "area-patio", 2, "circular", "P1", 20.0, 22.0, None),
                demo_table("t-patio-2", "area-patio", 4, "standard", "P2", 52.0, 34.0, None),
                demo_table("t-lobby-1", "area-lobby", 4, "standard", "L1", 25.0, 26.0, None),
                demo_table("t-lobby-2", "area-lobby", 6, "standard", "L2", 58.0, 42.0, None),
                demo_table("t-bar-1", "area-bar", 2, "circular", "B1", 18.0, 24.0, None),
                demo_table("t-bar-2", "area-bar", 2, "circular", "B2", 48.0, 38.0, None),
                demo_table("t-vip-a", "area-vip", 3, "square", "Cuadrada A", 30.0, 30.0, Some("VIP_AB")),
                demo_table("t-vip-b", "area-vip", 3, "square", "Cuadrada B", 52.0, 30.0, Some("VIP_AB")),
            ],
        );
        store
    }

    /// Restrict `table` to a fixed column set
    pub fn with_columns(self, table: &str, columns: &[&str]) -> Self {
        self.inner.write().columns.insert(
            table.to_string(),
            columns.iter().map(|c| c.to_string()).collect(),
        );
        self
    }

    /// Make every operation on `table` fail with `err`
    pub fn with_failure(self, table: &str, err: StoreError) -> Self {
        self.inner.write().failures.insert(table.to_string(), err);
        self
    }

    /// Append rows to `table`; non-object values are skipped
    pub fn seed(&self, table: &str, rows: Vec<Value>) {
        let mut inner = self.inner.write();
        let stored = inner.rows.entry(table.to_string()).or_default();
        stored.extend(rows.into_iter().filter_map(|v| match v {
            Value::Object(row) => Some(row),
            _ => None,
        }));
    }

    /// Rows currently stored in `table`
    pub fn rows(&self, table: &str) -> Vec<Row> {
        self.inner.read().rows.get(table).cloned().unwrap_or_default()
    }

    /// Every insert payload received, in order, including rejected ones
    pub fn inserts(&self) -> Vec<Row> {
        self.inner.read().inserts.clone()
    }

    /// Every update payload received, in order, including rejected ones
    pub fn updates(&self) -> Vec<Row> {
        self.inner.read().updates.clone()
    }

    /// Queries in `table?column=eq.value` form
    pub fn select_log(&self) -> Vec<String> {
        self.inner.read().selects.clone()
    }
}

impl Inner {
    fn check(&self, table: &str, columns: impl IntoIterator<Item = String>) -> Result<(), StoreError> {
        if let Some(err) = self.failures.get(table) {
            return Err(err.clone());
        }
        if let Some(known) = self.columns.get(table)
            && let Some(unknown) = columns.into_iter().find(|c| !known.contains(c))
        {
            return Err(StoreError::unknown_column(unknown, table));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn select(&self, table: &str, filters: &[Filter]) -> Result<Vec<Row>, StoreError> {
        let mut inner = self.inner.write();
        let query = filters
            .iter()
            .map(|f| format!("{}=eq.{}", f.column, f.value))
            .collect::<Vec<_>>()
            .join("&");
        inner.selects.push(format!("{table}?{query}"));
        inner.check(table, filters.iter().map(|f| f.column.clone()))?;

        Ok(inner
            .rows
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| {
                        filters
                            .iter()
                            .all(|f| row.get(&f.column).and_then(as_text).as_deref() == Some(f.value.as_str()))
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn probe(&self, table: &str) -> Result<(), StoreError> {
        self.inner.read().check(table, std::iter::empty())
    }

    async fn insert(&self, table: &str, row: &Row) -> Result<Option<Row>, StoreError> {
        let mut inner = self.inner.write();
        inner.inserts.push(row.clone());
        inner.check(table, row.keys().cloned())?;

        let mut stored = row.clone();
        if !stored.contains_key("id") {
            let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
            stored.insert("id".into(), Value::String(format!("{table}-{id}")));
        }
        inner.rows.entry(table.to_string()).or_default().push(stored.clone());
        Ok(Some(stored))
    }

    async fn update(&self, table: &str, id: &str, changes: &Row) -> Result<Vec<Row>, StoreError> {
        let mut inner = self.inner.write();
        inner.updates.push(changes.clone());
        inner.check(table, changes.keys().cloned())?;

        let mut updated = Vec::new();
        for row in inner.rows.entry(table.to_string()).or_default() {
            if row.get("id").and_then(as_text).as_deref() == Some(id) {
                row.extend(changes.clone());
                updated.push(row.clone());
            }
        }
        Ok(updated)
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

const DEMO_TABLE_COLUMNS: [&str; 10] = [
    "id", "areaId", "capacity", "type", "name", "x", "y", "isVIP", "canMerge", "mergeGroup",
];

#[allow(clippy::too_many_arguments)]
fn demo_table(
    id: &str,
    area_id: &str,
    capacity: u32,
    table_type: &str,
    name: &str,
    x: f64,
    y: f64,
    merge_group: Option<&str>,
) -> Value {
    let vip = merge_group.is_some();
    json!({
        "id": id,
        "areaId": area_id,
        "capacity": capacity,
        "type": table_type,
        "name": name,
        "x": x,
        "y": y,
        "isVIP": vip,
        "canMerge": vip,
        "mergeGroup": merge_group,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::RESERVATIONS;

    #[tokio::test]
    async fn test_restricted_columns_reject_unknown_keys() {
        let store = MemoryStore::new().with_columns(RESERVATIONS, &["id", "guestName"]);
        let mut row = Row::new();
        row.insert("guestName".into(), json!("Ana"));
        row.insert("is_vip".into(), json!(false));

        let err = store.insert(RESERVATIONS, &row).await.unwrap_err();
        assert_eq!(err.missing_column(), Some("is_vip"));
        assert!(store.rows(RESERVATIONS).is_empty());
        assert_eq!(store.inserts().len(), 1);

        row.remove("is_vip");
        let saved = store.insert(RESERVATIONS, &row).await.unwrap().unwrap();
        assert_eq!(saved["id"], "reservations-1");
    }

    #[tokio::test]
    async fn test_update_matches_numeric_ids() {
        let store = MemoryStore::new();
        store.seed(RESERVATIONS, vec![json!({"id": 7, "status": "CONFIRMED"})]);

        let mut changes = Row::new();
        changes.insert("status".into(), json!("NO_SHOW"));
        let updated = store.update(RESERVATIONS, "7", &changes).await.unwrap();
        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0]["status"], "NO_SHOW");

        assert!(store.update(RESERVATIONS, "8", &changes).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failure_applies_to_every_operation() {
        let store = MemoryStore::demo().with_failure(AREAS, StoreError::rejected("permission denied"));
        assert!(store.probe(AREAS).await.is_err());
        assert!(store.select(AREAS, &[]).await.is_err());
        assert!(store.probe(TABLES).await.is_ok());
        assert_eq!(store.select(TABLES, &[]).await.unwrap().len(), 10);
    }
}
