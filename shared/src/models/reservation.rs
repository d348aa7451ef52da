//! Reservation Model

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use super::serde_helpers::{
    ColumnAliases, bool_false, flexible_id, flexible_id_list, flexible_id_opt, hms, hms_opt,
};

/// Guest name used for ad-hoc seatings without a booking
pub const WALK_IN_GUEST: &str = "Walk-in";

/// Default booking length when the client does not send one
pub const DEFAULT_DURATION_MINS: u32 = 90;

/// Reservation status
///
/// Unrecognized input normalizes to `Confirmed`, so a stored or submitted
/// status is always one of these five values.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    Pending,
    #[default]
    Confirmed,
    Cancelled,
    Completed,
    NoShow,
}

impl ReservationStatus {
    pub const ALL: [ReservationStatus; 5] = [
        Self::Pending,
        Self::Confirmed,
        Self::Cancelled,
        Self::Completed,
        Self::NoShow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Cancelled => "CANCELLED",
            Self::Completed => "COMPLETED",
            Self::NoShow => "NO_SHOW",
        }
    }

    /// Case-insensitive parse that falls back to `Confirmed`
    pub fn normalize(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.parse().ok()).unwrap_or_default()
    }

    /// Whether a reservation in this status holds its tables
    pub fn holds_tables(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }
}

impl FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == upper)
            .ok_or_else(|| format!("unknown reservation status: {s}"))
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ReservationStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(Self::normalize(raw.as_deref()))
    }
}

fn default_party_size() -> u32 {
    1
}

fn default_duration() -> u32 {
    DEFAULT_DURATION_MINS
}

/// Reservation entity as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    #[serde(deserialize_with = "flexible_id")]
    pub id: String,
    #[serde(alias = "guest_name")]
    pub guest_name: String,
    #[serde(default = "default_party_size", alias = "party_size")]
    pub party_size: u32,
    pub date: NaiveDate,
    #[serde(alias = "start_time", with = "hms")]
    pub start_time: NaiveTime,
    #[serde(default, alias = "end_time", with = "hms_opt")]
    pub end_time: Option<NaiveTime>,
    #[serde(default = "default_duration", alias = "duration_mins")]
    pub duration_mins: u32,
    #[serde(default, alias = "table_id", deserialize_with = "flexible_id_opt")]
    pub table_id: Option<String>,
    #[serde(default, alias = "table_ids", deserialize_with = "flexible_id_list")]
    pub table_ids: Vec<String>,
    #[serde(
        default,
        alias = "is_vip",
        alias = "isVIP",
        deserialize_with = "bool_false"
    )]
    pub is_vip: bool,
    #[serde(default, alias = "reservation_status")]
    pub status: ReservationStatus,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(
        default,
        alias = "area",
        alias = "area_id",
        deserialize_with = "flexible_id_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub area_id: Option<String>,
}

impl ColumnAliases for Reservation {
    const ALIASES: &'static [&'static [&'static str]] = &[
        &["guestName", "guest_name"],
        &["partySize", "party_size"],
        &["startTime", "start_time"],
        &["endTime", "end_time"],
        &["durationMins", "duration_mins"],
        &["tableId", "table_id"],
        &["tableIds", "table_ids"],
        &["isVip", "is_vip", "isVIP"],
        &["status", "reservation_status"],
        &["areaId", "area", "area_id"],
    ];
}

impl Reservation {
    /// Every table this reservation claims, `tableIds` first, without duplicates
    pub fn table_refs(&self) -> Vec<&str> {
        let mut refs: Vec<&str> = Vec::with_capacity(self.table_ids.len() + 1);
        for id in self.table_ids.iter().map(String::as_str).chain(self.table_id.as_deref()) {
            if !refs.contains(&id) {
                refs.push(id);
            }
        }
        refs
    }

    pub fn claims_table(&self, table_id: &str) -> bool {
        self.table_id.as_deref() == Some(table_id) || self.table_ids.iter().any(|t| t == table_id)
    }

    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.start_time)
    }

    /// End of the booking window (exclusive)
    ///
    /// An explicit end time wins when it lies after the start time;
    /// otherwise the window is `durationMins` long.
    pub fn ends_at(&self) -> NaiveDateTime {
        match self.end_time {
            Some(end) if end > self.start_time => self.date.and_time(end),
            _ => self.starts_at() + Duration::minutes(i64::from(self.duration_mins.max(1))),
        }
    }

    pub fn is_walk_in(&self) -> bool {
        self.guest_name == WALK_IN_GUEST
    }
}

/// A validated reservation ready to be written
///
/// Produced by the request validator; all invariants hold by construction:
/// at least one table reference, party size and duration at least 1.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReservation {
    pub guest_name: String,
    pub party_size: u32,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: Option<NaiveTime>,
    pub duration_mins: u32,
    pub table_id: Option<String>,
    pub table_ids: Vec<String>,
    pub is_vip: bool,
    pub status: ReservationStatus,
    pub notes: String,
}
