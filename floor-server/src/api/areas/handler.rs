//! Area API Handlers

use axum::extract::State;
use shared::error::{ApiResponse, AppResult};
use shared::models::Area;

use crate::state::AppState;
use crate::store::{self, AREAS};

/// GET /api/areas - all areas
pub async fn list(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<Area>>> {
    let rows = state.store().select(AREAS, &[]).await?;
    let areas = store::decode_rows(AREAS, rows)?;
    Ok(ApiResponse::success(areas))
}
