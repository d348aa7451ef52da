//! Health check handlers

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use http::StatusCode;
use serde::Serialize;
use shared::error::ErrorCode;

use crate::state::AppState;
use crate::store::{AREAS, RESERVATIONS};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    key_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadyChecks {
    /// ok | error
    store: &'static str,
    key_role: String,
}

#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    ok: bool,
    /// Error code, present on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<ErrorCode>,
    checks: ReadyChecks,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// GET /api/health - the store answers a query on `areas`
pub async fn health(State(state): State<AppState>) -> Response {
    match state.store().probe(AREAS).await {
        Ok(()) => Json(HealthResponse {
            ok: true,
            key_role: Some(state.config.key_role_label().to_string()),
            error: None,
        })
        .into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Health probe failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthResponse {
                    ok: false,
                    key_role: None,
                    error: Some(e.to_string()),
                }),
            )
                .into_response()
        }
    }
}

/// GET /api/ready - the store answers a query on `reservations`
pub async fn ready(State(state): State<AppState>) -> Response {
    let probe = state.store().probe(RESERVATIONS).await;
    let checks = ReadyChecks {
        store: if probe.is_ok() { "ok" } else { "error" },
        key_role: state.config.key_role_label().to_string(),
    };

    match probe {
        Ok(()) => Json(ReadyResponse {
            ok: true,
            code: None,
            checks,
            error: None,
        })
        .into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness probe failed");
            (
                ErrorCode::NotReady.http_status(),
                Json(ReadyResponse {
                    ok: false,
                    code: Some(ErrorCode::NotReady),
                    checks,
                    error: Some(e.to_string()),
                }),
            )
                .into_response()
        }
    }
}
