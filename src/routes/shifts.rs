use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use validator::Validate;

use crate::{
    dto::attendance_dto::{ClockRequest, ShiftListQuery, ShiftStatusResponse},
    error::Result,
    middleware::auth::Identity,
    models::shift::Shift,
    routes::JsonBody,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/shifts/clock-in",
    request_body = ClockRequest,
    responses(
        (status = 201, description = "Shift opened", body = Shift),
        (status = 400, description = "Invalid coordinates or note"),
        (status = 403, description = "Outside the perimeter or not registered"),
        (status = 409, description = "Already clocked in or no zone configured")
    )
)]
#[axum::debug_handler]
pub async fn clock_in(
    State(state): State<AppState>,
    identity: Identity,
    JsonBody(payload): JsonBody<ClockRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let shift = state.attendance.clock_in(&identity, &payload).await?;
    Ok((StatusCode::CREATED, Json(shift)))
}

#[utoipa::path(
    post,
    path = "/api/shifts/clock-out",
    request_body = ClockRequest,
    responses(
        (status = 200, description = "Shift closed", body = Shift),
        (status = 400, description = "Invalid coordinates or note"),
        (status = 409, description = "No active shift")
    )
)]
#[axum::debug_handler]
pub async fn clock_out(
    State(state): State<AppState>,
    identity: Identity,
    JsonBody(payload): JsonBody<ClockRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let shift = state.attendance.clock_out(&identity, &payload).await?;
    Ok(Json(shift))
}

#[utoipa::path(
    get,
    path = "/api/shifts/me",
    params(
        ("limit" = Option<i64>, Query, description = "Maximum number of shifts, newest first")
    ),
    responses(
        (status = 200, description = "Caller's shifts", body = Vec<Shift>)
    )
)]
#[axum::debug_handler]
pub async fn my_shifts(
    State(state): State<AppState>,
    identity: Identity,
    Query(query): Query<ShiftListQuery>,
) -> Result<impl IntoResponse> {
    let shifts = state.attendance.shifts_for_user(&identity, query.limit).await?;
    Ok(Json(shifts))
}

#[utoipa::path(
    get,
    path = "/api/shifts/me/status",
    responses(
        (status = 200, description = "Clock state, running shift and hours today", body = ShiftStatusResponse)
    )
)]
#[axum::debug_handler]
pub async fn my_status(State(state): State<AppState>, identity: Identity) -> Result<impl IntoResponse> {
    let status = state.attendance.status(&identity).await?;
    Ok(Json(status))
}
