pub mod health;
pub mod manager;
pub mod shifts;
pub mod users;
pub mod zones;

use axum::{
    extract::FromRequest,
    middleware::from_fn_with_state,
    routing::{get, patch, post, put},
    Json, Router,
};
use utoipa::OpenApi;

use crate::{
    dto::{attendance_dto, dashboard_dto, user_dto, zone_dto},
    error::Error,
    middleware::{auth::require_bearer_auth, rate_limit::rps_middleware},
    models::{role::Role, shift, user::User},
    utils::geo::GeoPoint,
    AppState,
};

/// `Json` body extractor whose rejections render as `{"error": …}` 400s.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct JsonBody<T>(pub T);

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        users::me,
        users::register,
        users::update_me,
        zones::my_zone,
        zones::check_my_zone,
        shifts::clock_in,
        shifts::clock_out,
        shifts::my_shifts,
        shifts::my_status,
        manager::list_zones,
        manager::upsert_zone,
        manager::active_shifts,
        manager::shift_history,
        manager::export_shifts,
        manager::dashboard,
    ),
    components(schemas(
        Role,
        User,
        GeoPoint,
        shift::Shift,
        shift::ClockState,
        attendance_dto::ClockRequest,
        attendance_dto::ShiftStatusResponse,
        user_dto::RegisterUserRequest,
        user_dto::RegisterUserResponse,
        user_dto::UpdateUserRequest,
        user_dto::CurrentUserResponse,
        zone_dto::ZoneResponse,
        zone_dto::WorkerTypeResponse,
        zone_dto::UpsertZoneRequest,
        zone_dto::PerimeterCheckRequest,
        zone_dto::PerimeterCheckResponse,
        dashboard_dto::ShiftRecordResponse,
        dashboard_dto::DailyHours,
        dashboard_dto::StaffTotals,
        dashboard_dto::DashboardResponse,
    ))
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Every route of the service. Everything under `/api` requires a bearer
/// token and is rate limited per caller.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/api/me", get(users::me))
        .route("/api/users/register", post(users::register))
        .route("/api/users/me", patch(users::update_me))
        .route("/api/zones/me", get(zones::my_zone))
        .route("/api/zones/me/check", post(zones::check_my_zone))
        .route("/api/shifts/clock-in", post(shifts::clock_in))
        .route("/api/shifts/clock-out", post(shifts::clock_out))
        .route("/api/shifts/me", get(shifts::my_shifts))
        .route("/api/shifts/me/status", get(shifts::my_status))
        .route("/api/manager/zones", get(manager::list_zones))
        .route("/api/manager/zones/:role", put(manager::upsert_zone))
        .route("/api/manager/shifts", get(manager::shift_history))
        .route("/api/manager/shifts/active", get(manager::active_shifts))
        .route("/api/manager/shifts/export", get(manager::export_shifts))
        .route("/api/manager/dashboard", get(manager::dashboard))
        // Layers run bottom-up: auth first, then the limiter keys on the identity.
        .layer(from_fn_with_state(state.limiter.clone(), rps_middleware))
        .layer(from_fn_with_state(state.verifier.clone(), require_bearer_auth));

    Router::new()
        .route("/health", get(health::health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .merge(api)
        .with_state(state)
}
