use axum::http::{header, HeaderValue, Method};
use tower_http::cors::CorsLayer;

/// Restricts CORS to the dashboard origin when one is configured.
pub fn cors_layer(allowed_origin: Option<&str>) -> CorsLayer {
    let Some(origin) = allowed_origin.and_then(|o| HeaderValue::from_str(o).ok()) else {
        if let Some(raw) = allowed_origin {
            tracing::warn!(origin = %raw, "invalid CORS origin, falling back to permissive CORS");
        }
        return CorsLayer::permissive();
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}
