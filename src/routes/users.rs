use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use validator::Validate;

use crate::{
    dto::user_dto::{CurrentUserResponse, RegisterUserRequest, RegisterUserResponse, UpdateUserRequest},
    error::Result,
    middleware::auth::Identity,
    models::user::User,
    routes::JsonBody,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/me",
    responses(
        (status = 200, description = "Current user, or null before registration", body = CurrentUserResponse),
        (status = 401, description = "Missing or invalid bearer token")
    )
)]
#[axum::debug_handler]
pub async fn me(State(state): State<AppState>, identity: Identity) -> Result<impl IntoResponse> {
    let user = state.users.current_user(&identity).await?;
    Ok(Json(CurrentUserResponse { user }))
}

#[utoipa::path(
    post,
    path = "/api/users/register",
    request_body = RegisterUserRequest,
    responses(
        (status = 201, description = "User registered", body = RegisterUserResponse),
        (status = 200, description = "User was already registered", body = RegisterUserResponse),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Missing or invalid bearer token")
    )
)]
#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    identity: Identity,
    JsonBody(payload): JsonBody<RegisterUserRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let resp = state.users.register(&identity, payload).await?;
    let status = if resp.is_new_user {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(resp)))
}

#[utoipa::path(
    patch,
    path = "/api/users/me",
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Profile updated", body = User),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Caller is not registered")
    )
)]
#[axum::debug_handler]
pub async fn update_me(
    State(state): State<AppState>,
    identity: Identity,
    JsonBody(payload): JsonBody<UpdateUserRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let user = state.users.update_profile(&identity, payload).await?;
    Ok(Json(user))
}
