//! OpenAPI document route

use axum::{
    Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
};
use http::header::CONTENT_TYPE;
use shared::error::{AppError, AppResult};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.yaml", get(document))
}

/// GET /openapi.yaml - served from `OPENAPI_PATH` when configured
pub async fn document(State(state): State<AppState>) -> AppResult<Response> {
    let not_found = || AppError::not_found("OpenAPI document");
    let path = state.config.openapi_path.as_ref().ok_or_else(not_found)?;
    let body = tokio::fs::read_to_string(path).await.map_err(|e| {
        tracing::debug!(path = %path.display(), error = %e, "OpenAPI document unavailable");
        not_found()
    })?;
    Ok(([(CONTENT_TYPE, "text/yaml; charset=utf-8")], body).into_response())
}
