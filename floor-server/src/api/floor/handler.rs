//! Floor API Handlers

use axum::extract::{Query, State};
use serde::Deserialize;
use shared::error::{ApiResponse, AppError, AppResult, ErrorCode};

use crate::floor::{self, FloorView};
use crate::state::AppState;
use crate::utils::time::parse_instant;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorQuery {
    pub at: Option<String>,
    pub area_id: Option<String>,
}

/// GET /api/floor - live table statuses
pub async fn view(
    State(state): State<AppState>,
    Query(query): Query<FloorQuery>,
) -> AppResult<ApiResponse<FloorView>> {
    let at = match query.at.as_deref().filter(|raw| !raw.is_empty()) {
        Some(raw) => parse_instant(raw).ok_or_else(|| {
            AppError::with_message(ErrorCode::InvalidFormat, "at must be YYYY-MM-DDTHH:MM[:SS]")
                .with_detail("field", "at")
        })?,
        None => state.clock.now(),
    };
    let area_id = query.area_id.as_deref().filter(|id| !id.trim().is_empty());

    let view = floor::floor_view(state.store(), at, area_id).await?;
    Ok(ApiResponse::success(view))
}
