//! Table status projection
//!
//! Derives what the floor looks like at a given instant from the table
//! list and the reservations of the day. Nothing here is persisted; the
//! projection is recomputed on every read.

use chrono::{Duration, NaiveDateTime, NaiveTime};
use serde::Serialize;
use shared::models::serde_helpers::hms;
use shared::models::{DiningTable, Reservation, ReservationStatus};
use std::cmp::Reverse;

/// A reservation starting within this many minutes counts as imminent
pub const IMMINENT_WINDOW_MINS: i64 = 30;

/// Point-in-time display state of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualStatus {
    Available,
    /// Booked later on the same day
    Reserved,
    /// Booking starts within the imminent window
    ReservedActive,
    Occupied,
    /// Active VIP booking spanning tables of one merge group
    VipCombined,
}

impl VisualStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Reserved => "reserved",
            Self::ReservedActive => "reserved_active",
            Self::Occupied => "occupied",
            Self::VipCombined => "vip_combined",
        }
    }

    /// Tables in these states can be released by staff
    pub fn is_releasable(&self) -> bool {
        matches!(self, Self::Occupied | Self::ReservedActive | Self::VipCombined)
    }
}

/// The reservation driving a table's status
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationSummary {
    pub id: String,
    pub guest_name: String,
    /// Guest name for display; absent for walk-ins
    pub display_name: Option<String>,
    #[serde(with = "hms")]
    pub start_time: NaiveTime,
    pub ends_at: NaiveDateTime,
    pub is_vip: bool,
    pub status: ReservationStatus,
}

impl From<&Reservation> for ReservationSummary {
    fn from(r: &Reservation) -> Self {
        Self {
            id: r.id.clone(),
            guest_name: r.guest_name.clone(),
            display_name: (!r.is_walk_in()).then(|| r.guest_name.clone()),
            start_time: r.start_time,
            ends_at: r.ends_at(),
            is_vip: r.is_vip,
            status: r.status,
        }
    }
}

/// A table with its derived status
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableWithStatus {
    #[serde(flatten)]
    pub table: DiningTable,
    pub visual_status: VisualStatus,
    pub reservation: Option<ReservationSummary>,
}

/// The whole floor at one instant
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorView {
    pub at: NaiveDateTime,
    pub tables: Vec<TableWithStatus>,
    /// Ids of tables whose status allows a release
    pub releasable: Vec<String>,
}

impl FloorView {
    pub fn table(&self, id: &str) -> Option<&TableWithStatus> {
        self.tables.iter().find(|t| t.table.id == id)
    }
}

/// How a reservation relates to the reference instant, weakest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Claim {
    Later,
    Imminent,
    Active,
}

fn claim(reservation: &Reservation, at: NaiveDateTime) -> Option<Claim> {
    if !reservation.status.holds_tables() {
        return None;
    }
    let start = reservation.starts_at();
    if start <= at && at < reservation.ends_at() {
        Some(Claim::Active)
    } else if start > at && start - at <= Duration::minutes(IMMINENT_WINDOW_MINS) {
        Some(Claim::Imminent)
    } else if start > at && reservation.date == at.date() {
        Some(Claim::Later)
    } else {
        None
    }
}

/// Whether `reservation` is a VIP booking spanning at least two tables of
/// `table`'s merge group
fn is_vip_combination(reservation: &Reservation, table: &DiningTable, tables: &[DiningTable]) -> bool {
    let Some(group) = table.merge_group.as_deref() else {
        return false;
    };
    if !reservation.is_vip {
        return false;
    }
    let grouped = reservation
        .table_refs()
        .into_iter()
        .filter(|id| {
            tables
                .iter()
                .any(|t| t.id == *id && t.merge_group.as_deref() == Some(group))
        })
        .count();
    grouped >= 2
}

/// Compute each table's status at `at`
///
/// When several reservations claim a table, the strongest claim wins
/// (active over imminent over later) and ties go to the earliest start.
pub fn project(tables: &[DiningTable], reservations: &[Reservation], at: NaiveDateTime) -> FloorView {
    let projected: Vec<TableWithStatus> = tables
        .iter()
        .map(|table| {
            let driving = reservations
                .iter()
                .filter(|r| r.claims_table(&table.id))
                .filter_map(|r| claim(r, at).map(|c| (c, r)))
                .max_by_key(|(c, r)| (*c, Reverse(r.starts_at())));

            let (visual_status, reservation) = match driving {
                None => (VisualStatus::Available, None),
                Some((Claim::Active, r)) if is_vip_combination(r, table, tables) => {
                    (VisualStatus::VipCombined, Some(r))
                }
                Some((Claim::Active, r)) => (VisualStatus::Occupied, Some(r)),
                Some((Claim::Imminent, r)) => (VisualStatus::ReservedActive, Some(r)),
                Some((Claim::Later, r)) => (VisualStatus::Reserved, Some(r)),
            };

            TableWithStatus {
                table: table.clone(),
                visual_status,
                reservation: reservation.map(ReservationSummary::from),
            }
        })
        .collect();

    let releasable = projected
        .iter()
        .filter(|t| t.visual_status.is_releasable())
        .map(|t| t.table.id.clone())
        .collect();

    FloorView {
        at,
        tables: projected,
        releasable,
    }
}
