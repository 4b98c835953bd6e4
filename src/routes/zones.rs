use axum::{
    extract::State,
    response::{IntoResponse, Json},
};
use validator::Validate;

use crate::{
    dto::zone_dto::{PerimeterCheckRequest, PerimeterCheckResponse, WorkerTypeResponse},
    error::Result,
    middleware::auth::Identity,
    routes::JsonBody,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/zones/me",
    responses(
        (status = 200, description = "Caller's worker type and zone", body = WorkerTypeResponse),
        (status = 403, description = "Caller is not registered")
    )
)]
#[axum::debug_handler]
pub async fn my_zone(State(state): State<AppState>, identity: Identity) -> Result<impl IntoResponse> {
    let zone = state.zones.zone_for_user(&identity).await?;
    Ok(Json(zone))
}

#[utoipa::path(
    post,
    path = "/api/zones/me/check",
    request_body = PerimeterCheckRequest,
    responses(
        (status = 200, description = "Whether the position is inside the zone", body = PerimeterCheckResponse),
        (status = 409, description = "No zone configured for the caller's role")
    )
)]
#[axum::debug_handler]
pub async fn check_my_zone(
    State(state): State<AppState>,
    identity: Identity,
    JsonBody(payload): JsonBody<PerimeterCheckRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let check = state.zones.check_perimeter(&identity, &payload).await?;
    Ok(Json(check))
}
