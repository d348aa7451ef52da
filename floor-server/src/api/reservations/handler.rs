//! Reservation API Handlers

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use serde_json::Value;
use shared::error::{ApiResponse, AppError, AppResult, ErrorCode};
use shared::models::{Reservation, ReservationStatus};

use crate::api::parse_body;
use crate::reservations::{self, ReservationRequest};
use crate::state::AppState;
use crate::utils::time::parse_date;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub date: Option<String>,
    pub area_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StatusRequest {
    pub status: Value,
}

/// GET /api/reservations - reservations of `date`, optionally of `areaId`
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<ApiResponse<Vec<Reservation>>> {
    let date = query.date.as_deref().and_then(parse_date).ok_or_else(|| {
        AppError::with_message(
            ErrorCode::InvalidDate,
            "query parameter date is required, expected YYYY-MM-DD",
        )
        .with_detail("field", "date")
    })?;
    let area_id = query.area_id.as_deref().filter(|id| !id.trim().is_empty());

    let reservations = reservations::list_for_date(state.store(), date, area_id).await?;
    Ok(ApiResponse::success(reservations))
}

/// POST /api/reservations - validate and persist a reservation
pub async fn create(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<ApiResponse<Reservation>> {
    let request: ReservationRequest = parse_body(&body)?;
    let new = request.validate()?;
    let reservation = reservations::create(state.store(), &new).await?;
    Ok(ApiResponse::success(reservation))
}

/// PATCH /api/reservations/:id/status - change a reservation's status
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> AppResult<ApiResponse<Reservation>> {
    let id = id.trim();
    if id.is_empty() {
        return Err(AppError::invalid_field(ErrorCode::InvalidRequest, "id"));
    }

    let request: StatusRequest = parse_body(&body)?;
    let status = ReservationStatus::normalize(request.status.as_str());
    let reservation = reservations::set_status(state.store(), id, status).await?;
    Ok(ApiResponse::success(reservation))
}
