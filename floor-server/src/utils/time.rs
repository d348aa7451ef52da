//! Time helpers: strict wire formats and the business clock
//!
//! Dates travel as `YYYY-MM-DD`, times of day as `HH:MM` or `HH:MM:SS`,
//! instants as `YYYY-MM-DDTHH:MM[:SS]` in local business time.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use chrono_tz::Tz;

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Parse `YYYY-MM-DD`; rejects other layouts and impossible dates
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let mut parts = raw.split('-');
    let (year, month, day) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some()
        || year.len() != 4
        || month.len() != 2
        || day.len() != 2
        || ![year, month, day].iter().all(|p| is_digits(p))
    {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

/// Parse `HH:MM` or `HH:MM:SS` (00-23, 00-59, 00-59)
pub fn parse_clock(raw: &str) -> Option<NaiveTime> {
    let parts: Vec<&str> = raw.split(':').collect();
    if !(2..=3).contains(&parts.len()) || !parts.iter().all(|p| p.len() == 2 && is_digits(p)) {
        return None;
    }
    let hour = parts[0].parse().ok()?;
    let minute = parts[1].parse().ok()?;
    let second = parts.get(2).map_or(Some(0), |s| s.parse().ok())?;
    NaiveTime::from_hms_opt(hour, minute, second)
}

/// Parse `YYYY-MM-DDTHH:MM[:SS]`
pub fn parse_instant(raw: &str) -> Option<NaiveDateTime> {
    let (date, time) = raw.split_once('T')?;
    Some(parse_date(date)?.and_time(parse_clock(time)?))
}

/// Drop seconds and sub-seconds
pub fn to_minute(time: NaiveTime) -> NaiveTime {
    time.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(time)
}

/// Source of "now" for floor operations
#[derive(Debug, Clone, Copy)]
pub enum Clock {
    /// Wall clock in the business time zone
    System(Tz),
    /// Frozen instant
    Fixed(NaiveDateTime),
}

impl Clock {
    pub fn now(&self) -> NaiveDateTime {
        match self {
            Self::System(tz) => Utc::now().with_timezone(tz).naive_local(),
            Self::Fixed(at) => *at,
        }
    }
}
