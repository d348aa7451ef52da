//! Schema-adaptive reservation writer
//!
//! Deployed stores disagree on column naming for `reservations`: some use
//! snake_case, some camelCase, some a hybrid, and some lack optional
//! columns entirely. The writer tries each naming shape in turn and, within
//! a shape, drops optional columns the store reports as unknown.
//!
//! Which fields may be dropped is declared in [`FIELDS`]; the store adapter
//! is responsible for recognising an unknown-column error.

use serde_json::{Value, json};
use shared::error::{AppError, ErrorCode};
use shared::models::NewReservation;
use shared::models::serde_helpers::TIME_FORMAT;
use std::fmt;

use crate::store::{RESERVATIONS, RecordStore, Row, StoreError};

/// Write attempts per payload shape
///
/// [`FIELDS`] allows at most six prunes per shape, so a shape makes at
/// most seven writes under the current policy.
pub const MAX_PRUNE_ATTEMPTS: usize = 8;

/// Column naming convention of a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    Snake,
    Hybrid,
    Camel,
}

impl PayloadShape {
    /// Order in which shapes are tried
    pub const ORDER: [PayloadShape; 3] = [Self::Snake, Self::Hybrid, Self::Camel];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Snake => "snake",
            Self::Hybrid => "hybrid",
            Self::Camel => "camel",
        }
    }
}

impl fmt::Display for PayloadShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happens when the store rejects a field's column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Never dropped; the shape is abandoned instead
    Required,
    /// Dropped silently
    Optional,
    /// Dropped while another table reference still carries a value
    TableRef,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    GuestName,
    PartySize,
    Date,
    StartTime,
    EndTime,
    DurationMins,
    TableIds,
    TableId,
    IsVip,
    Status,
    Notes,
}

/// Column names and drop policy of one reservation field
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub field: Field,
    pub snake: &'static str,
    pub camel: &'static str,
    /// The hybrid shape uses the snake name for this field
    pub hybrid_snake: bool,
    pub presence: Presence,
}

impl FieldSpec {
    pub fn column(&self, shape: PayloadShape) -> &'static str {
        match shape {
            PayloadShape::Snake => self.snake,
            PayloadShape::Camel => self.camel,
            PayloadShape::Hybrid if self.hybrid_snake => self.snake,
            PayloadShape::Hybrid => self.camel,
        }
    }
}

const fn spec(
    field: Field,
    snake: &'static str,
    camel: &'static str,
    hybrid_snake: bool,
    presence: Presence,
) -> FieldSpec {
    FieldSpec {
        field,
        snake,
        camel,
        hybrid_snake,
        presence,
    }
}

/// Field policy table, in payload order
pub static FIELDS: [FieldSpec; 11] = [
    spec(Field::GuestName, "guest_name", "guestName", false, Presence::Required),
    spec(Field::PartySize, "party_size", "partySize", false, Presence::Required),
    spec(Field::Date, "date", "date", false, Presence::Required),
    spec(Field::StartTime, "start_time", "startTime", false, Presence::Required),
    spec(Field::EndTime, "end_time", "endTime", false, Presence::Optional),
    spec(Field::DurationMins, "duration_mins", "durationMins", true, Presence::Optional),
    spec(Field::TableIds, "table_ids", "tableIds", false, Presence::TableRef),
    spec(Field::TableId, "table_id", "tableId", true, Presence::TableRef),
    spec(Field::IsVip, "is_vip", "isVip", false, Presence::Optional),
    spec(Field::Status, "status", "status", false, Presence::Optional),
    spec(Field::Notes, "notes", "notes", false, Presence::Optional),
];

/// Why an unknown column could not be dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PruneRefusal {
    NotInPayload,
    Required,
    LastTableRef,
}

/// One candidate payload: field values keyed by a shape's column names
#[derive(Debug, Clone)]
pub struct Payload {
    shape: PayloadShape,
    entries: Vec<(&'static FieldSpec, Value)>,
}

impl Payload {
    pub fn build(new: &NewReservation, shape: PayloadShape) -> Self {
        let entries = FIELDS
            .iter()
            .map(|spec| (spec, field_value(new, spec.field)))
            .collect();
        Self { shape, entries }
    }

    pub fn shape(&self) -> PayloadShape {
        self.shape
    }

    pub fn columns(&self) -> Vec<&'static str> {
        self.entries
            .iter()
            .map(|(spec, _)| spec.column(self.shape))
            .collect()
    }

    pub fn to_row(&self) -> Row {
        self.entries
            .iter()
            .map(|(spec, value)| (spec.column(self.shape).to_string(), value.clone()))
            .collect()
    }

    /// Remove `column` if the field policy allows it
    pub fn prune(&mut self, column: &str) -> Result<Field, PruneRefusal> {
        let index = self
            .entries
            .iter()
            .position(|(spec, _)| spec.column(self.shape) == column)
            .ok_or(PruneRefusal::NotInPayload)?;

        let spec = self.entries[index].0;
        match spec.presence {
            Presence::Required => return Err(PruneRefusal::Required),
            Presence::TableRef => {
                let other_ref = self.entries.iter().enumerate().any(|(i, (s, value))| {
                    i != index && s.presence == Presence::TableRef && carries_table(value)
                });
                if !other_ref {
                    return Err(PruneRefusal::LastTableRef);
                }
            }
            Presence::Optional => {}
        }

        self.entries.remove(index);
        Ok(spec.field)
    }
}

fn carries_table(value: &Value) -> bool {
    match value {
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => false,
    }
}

fn field_value(new: &NewReservation, field: Field) -> Value {
    match field {
        Field::GuestName => json!(new.guest_name),
        Field::PartySize => json!(new.party_size),
        Field::Date => json!(new.date.format("%Y-%m-%d").to_string()),
        Field::StartTime => json!(new.start_time.format(TIME_FORMAT).to_string()),
        Field::EndTime => json!(new.end_time.map(|t| t.format(TIME_FORMAT).to_string())),
        Field::DurationMins => json!(new.duration_mins),
        Field::TableIds => json!(new.table_ids),
        Field::TableId => json!(new.table_id),
        Field::IsVip => json!(new.is_vip),
        Field::Status => json!(new.status.as_str()),
        Field::Notes => json!(new.notes),
    }
}

/// One rejected write
#[derive(Debug, Clone)]
pub struct Attempt {
    pub shape: PayloadShape,
    pub error: String,
}

/// Every rejected write of one insert, oldest first
#[derive(Debug, Clone, Default)]
pub struct WriteReport {
    pub attempts: Vec<Attempt>,
}

impl WriteReport {
    fn record(&mut self, shape: PayloadShape, error: &StoreError) {
        self.attempts.push(Attempt {
            shape,
            error: error.to_string(),
        });
    }

    pub fn messages(&self) -> Vec<String> {
        self.attempts.iter().map(|a| a.error.clone()).collect()
    }
}

/// A persisted reservation row and how it was written
#[derive(Debug, Clone)]
pub struct Written {
    pub row: Row,
    pub shape: PayloadShape,
    pub dropped: Vec<Field>,
    pub report: WriteReport,
}

/// All shapes failed
#[derive(Debug, Clone)]
pub struct WriteFailure {
    pub last_error: StoreError,
    pub report: WriteReport,
}

impl From<WriteFailure> for AppError {
    fn from(failure: WriteFailure) -> Self {
        AppError::new(ErrorCode::ReservationWriteFailed)
            .with_detail("cause", failure.last_error.to_string())
            .with_detail("attempts", failure.report.messages())
    }
}

/// Insert a reservation, adapting the payload to the store's schema
///
/// Shapes are tried in [`PayloadShape::ORDER`]. Within a shape, an
/// unknown-column error for a droppable field removes that field and
/// retries, up to [`MAX_PRUNE_ATTEMPTS`] writes. Any other error moves on
/// to the next shape. The first stored row wins.
pub async fn insert_reservation(
    store: &dyn RecordStore,
    new: &NewReservation,
) -> Result<Written, WriteFailure> {
    insert_with_limit(store, new, MAX_PRUNE_ATTEMPTS).await
}

async fn insert_with_limit(
    store: &dyn RecordStore,
    new: &NewReservation,
    max_writes: usize,
) -> Result<Written, WriteFailure> {
    let mut report = WriteReport::default();
    let mut last_error = None;

    for shape in PayloadShape::ORDER {
        let mut payload = Payload::build(new, shape);
        let mut dropped = Vec::new();

        for _ in 0..max_writes {
            let err = match store.insert(RESERVATIONS, &payload.to_row()).await {
                Ok(Some(row)) => {
                    if !dropped.is_empty() {
                        tracing::info!(%shape, ?dropped, "Reservation written without columns the store lacks");
                    }
                    return Ok(Written {
                        row,
                        shape,
                        dropped,
                        report,
                    });
                }
                Ok(None) => StoreError::Decode("insert returned no row".into()),
                Err(err) => err,
            };

            tracing::debug!(%shape, error = %err, "Reservation insert rejected");
            report.record(shape, &err);

            let pruned = err.missing_column().map(|column| payload.prune(column));
            last_error = Some(err);
            match pruned {
                Some(Ok(field)) => dropped.push(field),
                Some(Err(refusal)) => {
                    tracing::debug!(%shape, ?refusal, "Unknown column cannot be dropped");
                    break;
                }
                None => break,
            }
        }
    }

    let last_error = last_error.unwrap_or_else(|| StoreError::rejected("no payload shape attempted"));
    tracing::warn!(
        attempts = report.attempts.len(),
        errors = ?report.messages(),
        "Reservation insert failed for every payload shape"
    );
    Err(WriteFailure { last_error, report })
}
