//! Dining Table Model

use serde::{Deserialize, Serialize};

use super::serde_helpers::{ColumnAliases, bool_false, flexible_id, flexible_id_opt};

/// Dining table entity
///
/// Seed data managed outside this service. `merge_group` links tables
/// that can be pushed together; tables sharing a non-null group may be
/// combined for a single party.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiningTable {
    #[serde(deserialize_with = "flexible_id")]
    pub id: String,
    #[serde(alias = "area", alias = "area_id", deserialize_with = "flexible_id")]
    pub area_id: String,
    #[serde(default)]
    pub capacity: u32,
    /// Shape tag used by the floor canvas (standard, circular, square...)
    #[serde(rename = "type", default)]
    pub table_type: String,
    pub name: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(
        default,
        alias = "isVIP",
        alias = "is_vip",
        deserialize_with = "bool_false"
    )]
    pub is_vip: bool,
    #[serde(default, alias = "can_merge", deserialize_with = "bool_false")]
    pub can_merge: bool,
    #[serde(default, alias = "merge_group", deserialize_with = "flexible_id_opt")]
    pub merge_group: Option<String>,
}

impl ColumnAliases for DiningTable {
    const ALIASES: &'static [&'static [&'static str]] = &[
        &["areaId", "area", "area_id"],
        &["isVip", "isVIP", "is_vip"],
        &["canMerge", "can_merge"],
        &["mergeGroup", "merge_group"],
    ];
}
