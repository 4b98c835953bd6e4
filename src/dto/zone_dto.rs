use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::error::{Error, Result};
use crate::models::role::Role;
use crate::models::worker_zone::{WorkerType, WorkerZone};
use crate::utils::geo::{km_to_meters, meters_to_km, GeoPoint};

pub const MAX_RADIUS_M: f64 = 100_000.0;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ZoneResponse {
    pub id: Uuid,
    pub lat: f64,
    pub lng: f64,
    pub radius_m: f64,
    pub radius_km: f64,
}

impl From<WorkerZone> for ZoneResponse {
    fn from(zone: WorkerZone) -> Self {
        Self {
            id: zone.id,
            lat: zone.latitude,
            lng: zone.longitude,
            radius_m: zone.radius_m,
            radius_km: meters_to_km(zone.radius_m),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WorkerTypeResponse {
    pub role: Role,
    pub label: Option<String>,
    pub worker_zone: Option<ZoneResponse>,
}

impl From<WorkerType> for WorkerTypeResponse {
    fn from(wt: WorkerType) -> Self {
        Self {
            role: wt.role,
            label: wt.label,
            worker_zone: wt.zone.map(Into::into),
        }
    }
}

/// Zone edit from the manager map. The radius may be given in meters or in
/// kilometers, but not both.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpsertZoneRequest {
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: f64,
    #[validate(range(min = 1.0, max = 100000.0))]
    pub radius_m: Option<f64>,
    #[validate(range(min = 0.001, max = 100.0))]
    pub radius_km: Option<f64>,
}

impl UpsertZoneRequest {
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }

    pub fn radius_in_meters(&self) -> Result<f64> {
        match (self.radius_m, self.radius_km) {
            (Some(m), None) => Ok(m),
            (None, Some(km)) => Ok(km_to_meters(km)),
            (Some(_), Some(_)) => Err(Error::BadRequest(
                "Provide either radius_m or radius_km, not both".into(),
            )),
            (None, None) => Err(Error::BadRequest("radius_m or radius_km is required".into())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct PerimeterCheckRequest {
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PerimeterCheckResponse {
    pub within: bool,
    pub distance_m: f64,
    pub radius_m: f64,
    pub radius_km: f64,
}
