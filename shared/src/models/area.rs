//! Area Model

use serde::{Deserialize, Serialize};

use super::serde_helpers::{ColumnAliases, flexible_id};

/// Area entity (a named zone of the restaurant: terrace, patio, bar...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Area {
    #[serde(deserialize_with = "flexible_id")]
    pub id: String,
    pub name: String,
    #[serde(default, alias = "max_tables")]
    pub max_tables: Option<u32>,
}

impl ColumnAliases for Area {
    const ALIASES: &'static [&'static [&'static str]] = &[&["maxTables", "max_tables"]];
}
