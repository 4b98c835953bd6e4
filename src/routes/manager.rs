use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Json},
};
use validator::Validate;

use crate::{
    dto::dashboard_dto::{DashboardQuery, DashboardResponse, ShiftHistoryQuery, ShiftRecordResponse},
    dto::zone_dto::{UpsertZoneRequest, WorkerTypeResponse, ZoneResponse},
    error::{Error, Result},
    middleware::auth::Identity,
    models::role::Role,
    services::export_service::{ExportService, XLSX_CONTENT_TYPE},
    utils::time::now,
    routes::JsonBody,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/manager/zones",
    responses(
        (status = 200, description = "Every worker type with its zone", body = Vec<WorkerTypeResponse>),
        (status = 403, description = "Manager access required")
    )
)]
#[axum::debug_handler]
pub async fn list_zones(State(state): State<AppState>, identity: Identity) -> Result<impl IntoResponse> {
    state.users.require_manager(&identity).await?;
    let types = state.zones.list_worker_types().await?;
    Ok(Json(types))
}

#[utoipa::path(
    put,
    path = "/api/manager/zones/{role}",
    params(
        ("role" = String, Path, description = "Worker role, e.g. NURSE")
    ),
    request_body = UpsertZoneRequest,
    responses(
        (status = 200, description = "Zone created or replaced", body = ZoneResponse),
        (status = 400, description = "Unknown role or invalid zone"),
        (status = 403, description = "Manager access required")
    )
)]
#[axum::debug_handler]
pub async fn upsert_zone(
    State(state): State<AppState>,
    identity: Identity,
    Path(role): Path<String>,
    JsonBody(payload): JsonBody<UpsertZoneRequest>,
) -> Result<impl IntoResponse> {
    let manager = state.users.require_manager(&identity).await?;
    let role: Role = role.parse().map_err(Error::BadRequest)?;
    payload.validate()?;
    let zone = state.zones.upsert_zone(role, &payload).await?;
    tracing::info!(manager_id = %manager.id, role = %role, "zone updated by manager");
    Ok(Json(zone))
}

#[utoipa::path(
    get,
    path = "/api/manager/shifts/active",
    responses(
        (status = 200, description = "Workers currently clocked in", body = Vec<ShiftRecordResponse>),
        (status = 403, description = "Manager access required")
    )
)]
#[axum::debug_handler]
pub async fn active_shifts(State(state): State<AppState>, identity: Identity) -> Result<impl IntoResponse> {
    state.users.require_manager(&identity).await?;
    let active = state.analytics.active_workers().await?;
    Ok(Json(active))
}

#[utoipa::path(
    get,
    path = "/api/manager/shifts",
    params(
        ("from" = Option<String>, Query, description = "RFC 3339 lower bound on clock-in (inclusive)"),
        ("to" = Option<String>, Query, description = "RFC 3339 upper bound on clock-in (exclusive)"),
        ("limit" = Option<i64>, Query, description = "Maximum number of rows, newest first")
    ),
    responses(
        (status = 200, description = "Clock history across all workers", body = Vec<ShiftRecordResponse>),
        (status = 403, description = "Manager access required")
    )
)]
#[axum::debug_handler]
pub async fn shift_history(
    State(state): State<AppState>,
    identity: Identity,
    Query(query): Query<ShiftHistoryQuery>,
) -> Result<impl IntoResponse> {
    state.users.require_manager(&identity).await?;
    let history = state.analytics.history(&query).await?;
    Ok(Json(history))
}

#[utoipa::path(
    get,
    path = "/api/manager/shifts/export",
    params(
        ("from" = Option<String>, Query, description = "RFC 3339 lower bound on clock-in (inclusive)"),
        ("to" = Option<String>, Query, description = "RFC 3339 upper bound on clock-in (exclusive)"),
        ("limit" = Option<i64>, Query, description = "Maximum number of rows")
    ),
    responses(
        (status = 200, description = "Timesheet workbook", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        (status = 403, description = "Manager access required")
    )
)]
#[axum::debug_handler]
pub async fn export_shifts(
    State(state): State<AppState>,
    identity: Identity,
    Query(query): Query<ShiftHistoryQuery>,
) -> Result<impl IntoResponse> {
    state.users.require_manager(&identity).await?;
    let records = state.analytics.history_records(&query).await?;
    let now = now();
    let buffer = ExportService::generate_timesheet_xlsx(&records, now, state.analytics.offset())?;

    let filename = format!("timesheet_{}.xlsx", now.format("%Y%m%d"));
    let disposition = format!("attachment; filename=\"{}\"", filename);
    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        buffer,
    ))
}

#[utoipa::path(
    get,
    path = "/api/manager/dashboard",
    params(
        ("days" = Option<u32>, Query, description = "Reporting window in days (default 7, max 31)")
    ),
    responses(
        (status = 200, description = "Staffing and hours overview", body = DashboardResponse),
        (status = 403, description = "Manager access required")
    )
)]
#[axum::debug_handler]
pub async fn dashboard(
    State(state): State<AppState>,
    identity: Identity,
    Query(query): Query<DashboardQuery>,
) -> Result<impl IntoResponse> {
    state.users.require_manager(&identity).await?;
    let stats = state.analytics.dashboard(query.days).await?;
    Ok(Json(stats))
}
