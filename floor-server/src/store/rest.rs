//! REST adapter for the hosted record store
//!
//! Speaks the PostgREST dialect: `GET /rest/v1/{table}?col=eq.value`,
//! `POST` for inserts and `PATCH ?id=eq.{id}` for updates, with
//! `Prefer: return=representation` so writes echo the stored rows.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use std::time::Duration;

use super::{Filter, RecordStore, Row, StoreError};
use crate::config::Config;

/// PostgREST: column missing from the schema cache
const PGRST_UNKNOWN_COLUMN: &str = "PGRST204";
/// Postgres: undefined_column
const PG_UNDEFINED_COLUMN: &str = "42703";

/// Error body returned by PostgREST
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    details: Option<String>,
}

/// Record store backed by the hosted REST API
#[derive(Clone)]
pub struct RestStore {
    client: Client,
    base_url: String,
    key: String,
}

impl RestStore {
    pub fn new(config: &Config) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.store_timeout_ms))
            .build()
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: format!("{}/rest/v1", config.store_url),
            key: config.store_key.clone(),
        })
    }

    fn request(&self, method: reqwest::Method, table: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}/{table}", self.base_url))
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Vec<Row>, StoreError> {
        let response = request
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(classify(status, &body));
        }
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&body).map_err(|e| StoreError::Decode(e.to_string()))
    }
}

fn eq_params(filters: &[Filter]) -> Vec<(String, String)> {
    filters
        .iter()
        .map(|f| (f.column.clone(), format!("eq.{}", f.value)))
        .collect()
}

#[async_trait]
impl RecordStore for RestStore {
    async fn select(&self, table: &str, filters: &[Filter]) -> Result<Vec<Row>, StoreError> {
        let request = self
            .request(reqwest::Method::GET, table)
            .query(&[("select", "*")])
            .query(&eq_params(filters));
        self.send(request).await
    }

    async fn probe(&self, table: &str) -> Result<(), StoreError> {
        let request = self
            .request(reqwest::Method::GET, table)
            .query(&[("select", "id"), ("limit", "1")]);
        self.send(request).await.map(|_| ())
    }

    async fn insert(&self, table: &str, row: &Row) -> Result<Option<Row>, StoreError> {
        let request = self
            .request(reqwest::Method::POST, table)
            .header("Prefer", "return=representation")
            .json(&[row]);
        Ok(self.send(request).await?.into_iter().next())
    }

    async fn update(&self, table: &str, id: &str, changes: &Row) -> Result<Vec<Row>, StoreError> {
        let request = self
            .request(reqwest::Method::PATCH, table)
            .header("Prefer", "return=representation")
            .query(&[("id", format!("eq.{id}"))])
            .json(changes);
        self.send(request).await
    }
}

/// Turn an error response into a typed [`StoreError`]
fn classify(status: StatusCode, body: &str) -> StoreError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = parsed
        .message
        .clone()
        .or(parsed.details.clone())
        .unwrap_or_else(|| format!("store returned {status}: {body}"));

    let column = match parsed.code.as_deref() {
        Some(PGRST_UNKNOWN_COLUMN) => quoted_column(&message),
        Some(PG_UNDEFINED_COLUMN) => undefined_column(&message),
        // Older gateways drop the code but keep the message
        _ => quoted_column(&message).filter(|_| message.starts_with("Could not find the")),
    };

    match column {
        Some(column) => StoreError::UnknownColumn { column, message },
        None => StoreError::Rejected {
            code: parsed.code,
            message,
        },
    }
}

/// `Could not find the 'is_vip' column of 'reservations' in the schema cache`
fn quoted_column(message: &str) -> Option<String> {
    let rest = message.split_once("the '")?.1;
    let (column, _) = rest.split_once("' column")?;
    (!column.is_empty()).then(|| column.to_string())
}

/// `column "is_vip" does not exist` or `column reservations.is_vip does not exist`
fn undefined_column(message: &str) -> Option<String> {
    let rest = message.split_once("column ")?.1;
    let name = match rest.strip_prefix('"') {
        Some(quoted) => quoted.split_once('"')?.0,
        None => rest.split_whitespace().next()?,
    };
    let column = name.rsplit('.').next()?.trim_matches('"');
    (!column.is_empty()).then(|| column.to_string())
}
