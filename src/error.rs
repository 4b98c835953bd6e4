use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

use crate::models::role::Role;
use crate::utils::geo::meters_to_km;

pub type Result<T> = std::result::Result<T, Error>;

/// Outcomes of the attendance state machine that the caller has to resolve
/// before trying again.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClockError {
    #[error("Not authenticated")]
    Unauthenticated,

    #[error("User is not registered")]
    NotRegistered,

    #[error("Work zone not configured for role {0}")]
    ZoneNotConfigured(Role),

    #[error("Already clocked in")]
    AlreadyClockedIn,

    #[error("You are outside the allowed area. Move within {:.2} km ({radius_m:.0} m) of the workplace", radius_km(.radius_m))]
    OutsidePerimeter { radius_m: f64, distance_m: f64 },

    #[error("No active shift to clock out of")]
    NoActiveShift,
}

fn radius_km(radius_m: &f64) -> f64 {
    meters_to_km(*radius_m)
}

impl ClockError {
    pub fn code(&self) -> &'static str {
        match self {
            ClockError::Unauthenticated => "UNAUTHENTICATED",
            ClockError::NotRegistered => "NOT_REGISTERED",
            ClockError::ZoneNotConfigured(_) => "ZONE_NOT_CONFIGURED",
            ClockError::AlreadyClockedIn => "ALREADY_CLOCKED_IN",
            ClockError::OutsidePerimeter { .. } => "OUTSIDE_PERIMETER",
            ClockError::NoActiveShift => "NO_ACTIVE_SHIFT",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ClockError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ClockError::NotRegistered | ClockError::OutsidePerimeter { .. } => StatusCode::FORBIDDEN,
            ClockError::ZoneNotConfigured(_)
            | ClockError::AlreadyClockedIn
            | ClockError::NoActiveShift => StatusCode::CONFLICT,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Clock(#[from] ClockError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid JSON body: {0}")]
    Json(#[from] JsonRejection),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Excel export error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        if let Error::Clock(err) = &self {
            let mut body = json!({ "error": err.to_string(), "code": err.code() });
            if let ClockError::OutsidePerimeter { radius_m, distance_m } = err {
                body["allowed_radius_m"] = json!(radius_m);
                body["distance_m"] = json!(distance_m);
            }
            return (err.status(), Json(body)).into_response();
        }

        let (status, error_message) = match self {
            Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Error::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            Error::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Error::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Error::Json(err) => (StatusCode::BAD_REQUEST, err.body_text()),
            Error::Database(err) => {
                tracing::error!(error = ?err, "database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            }
            Error::Xlsx(err) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Export error: {}", err)),
            Error::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
            }
            other => {
                tracing::error!(error = ?other, "unhandled error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Error::NotFound("Resource not found".to_string()),
            other => Error::Database(other),
        }
    }
}
