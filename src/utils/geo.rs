use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Mean earth radius in meters. Every distance in this crate is in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Great-circle distance between two points on a spherical earth.
pub fn haversine_distance_m(a: GeoPoint, b: GeoPoint) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let d_phi = (b.lat - a.lat).to_radians();
    let d_lambda = (b.lng - a.lng).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

/// The perimeter is closed: a point exactly on the radius is inside.
pub fn is_within_radius(point: GeoPoint, center: GeoPoint, radius_m: f64) -> bool {
    haversine_distance_m(point, center) <= radius_m
}

pub fn km_to_meters(km: f64) -> f64 {
    km * 1000.0
}

pub fn meters_to_km(meters: f64) -> f64 {
    meters / 1000.0
}
