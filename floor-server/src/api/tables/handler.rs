//! Table API Handlers

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
};
use shared::error::{ApiResponse, AppResult};
use shared::models::{DiningTable, Reservation};

use crate::api::{AreaFilter, parse_body};
use crate::floor::{self, WalkInRequest};
use crate::state::AppState;

/// GET /api/tables - all tables, or those of `areaId`
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<AreaFilter>,
) -> AppResult<ApiResponse<Vec<DiningTable>>> {
    let tables = floor::list_tables(state.store(), filter.area_id()).await?;
    Ok(ApiResponse::success(tables))
}

/// POST /api/tables/:id/release - complete the active reservation
pub async fn release(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Reservation>> {
    let reservation = floor::release_table(state.store(), &id, state.clock.now()).await?;
    Ok(ApiResponse::success(reservation))
}

/// POST /api/tables/:id/walk-in - seat a walk-in party now
pub async fn walk_in(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> AppResult<ApiResponse<Reservation>> {
    let request: WalkInRequest = parse_body(&body)?;
    let reservation = floor::mark_walk_in(state.store(), &id, request, state.clock.now()).await?;
    Ok(ApiResponse::success(reservation))
}
