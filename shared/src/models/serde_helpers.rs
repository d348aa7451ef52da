//! Serde helpers for rows coming back from the record store
//!
//! The store's schema is not pinned: identifiers may be text or integers,
//! booleans and lists may be NULL, and `time` columns may or may not carry
//! seconds. These helpers absorb that drift at decode time.

use chrono::NaiveTime;
use serde::{Deserialize, Deserializer, Serializer};
use serde_json::{Map, Value};

/// Wire format for times of day
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Column names a model accepts for the same field, canonical name first
///
/// A schema caught mid-migration can return several of them in one row,
/// which serde aliases reject as duplicate fields.
pub trait ColumnAliases {
    const ALIASES: &'static [&'static [&'static str]];
}

/// Reduce each alias group of `row` to its canonical column
///
/// The first non-null candidate wins. A group whose candidates are all
/// null keeps a null under the canonical name.
pub fn collapse_aliases<T: ColumnAliases>(row: &mut Map<String, Value>) {
    for group in T::ALIASES {
        let Some(canonical) = group.first() else {
            continue;
        };
        let mut chosen: Option<Value> = None;
        for name in group.iter() {
            if let Some(value) = row.remove(*name)
                && chosen.as_ref().is_none_or(Value::is_null)
            {
                chosen = Some(value);
            }
        }
        if let Some(value) = chosen {
            row.insert((*canonical).to_string(), value);
        }
    }
}

/// Deserialize bool that treats null as false
pub fn bool_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<bool>::deserialize(deserializer).map(|opt| opt.unwrap_or(false))
}

/// Deserialize an identifier stored either as text or as an integer
pub fn flexible_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

/// Optional variant of [`flexible_id`]; null and empty strings become `None`
pub fn flexible_id_opt<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) if !s.is_empty() => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        _ => Ok(None),
    }
}

/// Deserialize a list of identifiers, treating null as empty
pub fn flexible_id_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .filter_map(|v| match v {
            Value::String(s) if !s.is_empty() => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .collect())
}

/// Parse `HH:MM:SS` or `HH:MM`
pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .ok()
}

/// `NaiveTime` as `HH:MM:SS`, accepting `HH:MM` on input
pub mod hms {
    use super::*;

    pub fn serialize<S>(time: &NaiveTime, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(&time.format(TIME_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;

        let raw = String::deserialize(deserializer)?;
        parse_time(&raw).ok_or_else(|| D::Error::custom(format!("invalid time: {raw}")))
    }
}

/// Optional [`hms`]; null and empty strings become `None`
pub mod hms_opt {
    use super::*;

    pub fn serialize<S>(time: &Option<NaiveTime>, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match time {
            Some(t) => s.serialize_str(&t.format(TIME_FORMAT).to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;

        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) if raw.is_empty() => Ok(None),
            Some(raw) => parse_time(&raw)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid time: {raw}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Debug, Deserialize, Serialize)]
    struct Row {
        #[serde(deserialize_with = "flexible_id")]
        id: String,
        #[serde(default, deserialize_with = "flexible_id_list")]
        ids: Vec<String>,
        #[serde(with = "hms")]
        at: NaiveTime,
        #[serde(default, with = "hms_opt")]
        until: Option<NaiveTime>,
        #[serde(default, deserialize_with = "bool_false")]
        flag: bool,
    }

    #[test]
    fn test_numeric_ids_become_strings() {
        let row: Row = serde_json::from_str(
            r#"{"id": 42, "ids": [7, "t-2", "", null], "at": "19:30", "flag": null}"#,
        )
        .unwrap();
        assert_eq!(row.id, "42");
        assert_eq!(row.ids, vec!["7", "t-2"]);
        assert_eq!(row.at, NaiveTime::from_hms_opt(19, 30, 0).unwrap());
        assert!(row.until.is_none());
        assert!(!row.flag);
    }

    #[test]
    fn test_time_serializes_with_seconds() {
        let row: Row =
            serde_json::from_str(r#"{"id": "r1", "ids": null, "at": "08:05:09", "until": "09:00"}"#)
                .unwrap();
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["at"], "08:05:09");
        assert_eq!(json["until"], "09:00:00");
        assert!(row.ids.is_empty());
    }

    #[test]
    fn test_rejects_bad_time() {
        let result: Result<Row, _> = serde_json::from_str(r#"{"id": "r1", "at": "25:00"}"#);
        assert!(result.is_err());
    }
}
