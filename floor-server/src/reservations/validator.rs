//! Reservation request validation
//!
//! Clients send loosely typed JSON (numbers as strings, flags as 0/1,
//! `tableIds` mixed with nulls). [`ReservationRequest`] accepts any JSON
//! type per field and [`ReservationRequest::validate`] turns it into a
//! [`NewReservation`] whose invariants hold by construction.

use serde::Deserialize;
use serde_json::Value;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{DEFAULT_DURATION_MINS, NewReservation, ReservationStatus};

use crate::utils::time::{parse_clock, parse_date};

/// Raw body of `POST /api/reservations`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReservationRequest {
    pub guest_name: Value,
    pub party_size: Value,
    pub date: Value,
    pub start_time: Value,
    pub end_time: Value,
    pub duration_mins: Value,
    pub table_ids: Value,
    pub table_id: Value,
    pub is_vip: Value,
    pub status: Value,
    pub notes: Value,
}

impl ReservationRequest {
    pub fn validate(self) -> AppResult<NewReservation> {
        let guest_name = match &self.guest_name {
            Value::String(name) if !name.trim().is_empty() => name.trim().to_string(),
            _ => return Err(AppError::invalid_field(ErrorCode::GuestNameRequired, "guestName")),
        };

        let date = self
            .date
            .as_str()
            .and_then(parse_date)
            .ok_or_else(|| AppError::invalid_field(ErrorCode::InvalidDate, "date"))?;

        let start_time = self
            .start_time
            .as_str()
            .and_then(parse_clock)
            .ok_or_else(|| AppError::invalid_field(ErrorCode::InvalidTime, "startTime"))?;

        let end_time = if truthy(&self.end_time) {
            let end = self
                .end_time
                .as_str()
                .and_then(parse_clock)
                .ok_or_else(|| AppError::invalid_field(ErrorCode::InvalidTime, "endTime"))?;
            Some(end)
        } else {
            None
        };

        let table_ids: Vec<String> = match &self.table_ids {
            Value::Array(ids) => ids
                .iter()
                .filter_map(|id| id.as_str())
                .filter(|id| !id.is_empty())
                .map(String::from)
                .collect(),
            _ => Vec::new(),
        };
        let table_id = match &self.table_id {
            Value::String(id) if !id.is_empty() => Some(id.clone()),
            _ => table_ids.first().cloned(),
        };
        if table_id.is_none() {
            return Err(AppError::new(ErrorCode::TableSelectionRequired));
        }

        Ok(NewReservation {
            guest_name,
            party_size: coerce_count(&self.party_size, 1),
            date,
            start_time,
            end_time,
            duration_mins: coerce_count(&self.duration_mins, DEFAULT_DURATION_MINS),
            table_id,
            table_ids,
            is_vip: truthy(&self.is_vip),
            status: ReservationStatus::normalize(self.status.as_str()),
            notes: self.notes.as_str().unwrap_or_default().to_string(),
        })
    }
}

/// Numeric reading of a JSON value, `None` when it is not a finite number
fn as_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) if s.trim().is_empty() => 0.0,
        Value::String(s) => s.trim().parse().ok()?,
        Value::Bool(b) => f64::from(u8::from(*b)),
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Positive whole count; `default` when the value is missing or not numeric
pub fn coerce_count(value: &Value, default: u32) -> u32 {
    match as_number(value) {
        Some(n) => n.trunc().clamp(1.0, f64::from(u32::MAX)) as u32,
        None => default.max(1),
    }
}

/// Loose truthiness: false, 0, "", null are false; everything else is true
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use serde_json::json;

    fn validate(body: Value) -> AppResult<NewReservation> {
        serde_json::from_value::<ReservationRequest>(body)
            .unwrap()
            .validate()
    }

    fn base() -> Value {
        json!({"guestName": "Ana", "date": "2024-05-01", "startTime": "19:30", "tableId": "t-bar-1"})
    }

    fn with(field: &str, value: Value) -> Value {
        let mut body = base();
        body[field] = value;
        body
    }

    #[test]
    fn test_minimal_request_gets_defaults() {
        let r = validate(base()).unwrap();
        assert_eq!(r.guest_name, "Ana");
        assert_eq!(r.party_size, 1);
        assert_eq!(r.duration_mins, 90);
        assert_eq!(r.status, ReservationStatus::Confirmed);
        assert_eq!(r.start_time, NaiveTime::from_hms_opt(19, 30, 0).unwrap());
        assert_eq!(r.date, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert_eq!(r.table_id.as_deref(), Some("t-bar-1"));
        assert!(r.table_ids.is_empty());
        assert!(r.end_time.is_none());
        assert!(!r.is_vip);
        assert_eq!(r.notes, "");
    }

    #[test]
    fn test_guest_name_is_trimmed_and_required() {
        let r = validate(with("guestName", json!("  Ana López "))).unwrap();
        assert_eq!(r.guest_name, "Ana López");

        for bad in [json!(null), json!(""), json!("   "), json!(42)] {
            let err = validate(with("guestName", bad)).unwrap_err();
            assert_eq!(err.code, ErrorCode::GuestNameRequired);
            assert_eq!(err.message, "missing guest name");
        }
    }

    #[test]
    fn test_date_and_time_formats() {
        for bad in [json!(null), json!("2024-13-01"), json!("01/05/2024"), json!(20240501)] {
            let err = validate(with("date", bad)).unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidDate);
            assert_eq!(err.details.unwrap()["field"], "date");
        }

        let err = validate(with("startTime", json!("7:30"))).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidTime);
        assert_eq!(err.details.unwrap()["field"], "startTime");

        let r = validate(with("startTime", json!("19:30:15"))).unwrap();
        assert_eq!(r.start_time, NaiveTime::from_hms_opt(19, 30, 15).unwrap());
    }

    #[test]
    fn test_end_time_optional() {
        for empty in [json!(null), json!("")] {
            assert!(validate(with("endTime", empty)).unwrap().end_time.is_none());
        }
        let r = validate(with("endTime", json!("21:00"))).unwrap();
        assert_eq!(r.end_time, NaiveTime::from_hms_opt(21, 0, 0));

        let err = validate(with("endTime", json!("9pm"))).unwrap_err();
        assert_eq!(err.details.unwrap()["field"], "endTime");
    }

    #[test]
    fn test_numeric_coercion() {
        let cases = [
            (json!(4), 4),
            (json!("6"), 6),
            (json!(2.9), 2),
            (json!(0), 1),
            (json!(-3), 1),
            (json!(""), 1),
            (json!("many"), 1),
            (json!(null), 1),
            (json!(true), 1),
        ];
        for (raw, expected) in cases {
            let r = validate(with("partySize", raw.clone())).unwrap();
            assert_eq!(r.party_size, expected, "partySize {raw}");
        }

        assert_eq!(validate(with("durationMins", json!("120"))).unwrap().duration_mins, 120);
        assert_eq!(validate(with("durationMins", json!("soon"))).unwrap().duration_mins, 90);
        assert_eq!(validate(with("durationMins", json!(0))).unwrap().duration_mins, 1);
    }

    #[test]
    fn test_table_selection() {
        let mut body = base();
        body.as_object_mut().unwrap().remove("tableId");
        body["tableIds"] = json!(["", 7, null, "t-vip-a", "t-vip-b"]);
        let r = validate(body).unwrap();
        assert_eq!(r.table_ids, vec!["t-vip-a", "t-vip-b"]);
        assert_eq!(r.table_id.as_deref(), Some("t-vip-a"));

        for (table_id, table_ids) in [
            (json!(null), json!(null)),
            (json!(""), json!([])),
            (json!(12), json!("t-bar-1")),
            (json!(null), json!(["", null])),
        ] {
            let mut body = with("tableId", table_id);
            body["tableIds"] = table_ids;
            let err = validate(body).unwrap_err();
            assert_eq!(err.code, ErrorCode::TableSelectionRequired);
            assert_eq!(err.message, "must supply tableId or tableIds");
        }
    }

    #[test]
    fn test_status_notes_and_vip() {
        for (raw, expected) in [
            (json!("pending"), ReservationStatus::Pending),
            (json!("No_Show"), ReservationStatus::NoShow),
            (json!("seated"), ReservationStatus::Confirmed),
            (json!(3), ReservationStatus::Confirmed),
        ] {
            assert_eq!(validate(with("status", raw)).unwrap().status, expected);
        }

        assert_eq!(validate(with("notes", json!("window seat"))).unwrap().notes, "window seat");
        assert_eq!(validate(with("notes", json!({"a": 1}))).unwrap().notes, "");

        assert!(validate(with("isVip", json!(1))).unwrap().is_vip);
        assert!(validate(with("isVip", json!("yes"))).unwrap().is_vip);
        assert!(!validate(with("isVip", json!(0))).unwrap().is_vip);
        assert!(!validate(with("isVip", json!(""))).unwrap().is_vip);
    }
}
