use std::sync::Arc;

use crate::database::repository::Repository;
use crate::dto::zone_dto::{
    PerimeterCheckRequest, PerimeterCheckResponse, UpsertZoneRequest, WorkerTypeResponse,
    ZoneResponse, MAX_RADIUS_M,
};
use crate::error::{ClockError, Error, Result};
use crate::middleware::auth::Identity;
use crate::models::role::Role;
use crate::models::worker_zone::WorkerType;
use crate::services::user_service::registered_user;
use crate::utils::geo::{meters_to_km, GeoPoint};

#[derive(Clone)]
pub struct ZoneService {
    repo: Arc<dyn Repository>,
}

impl ZoneService {
    pub fn new(repo: Arc<dyn Repository>) -> Self {
        Self { repo }
    }

    /// The caller's worker type together with its zone, if one is set.
    pub async fn zone_for_user(&self, identity: &Identity) -> Result<WorkerTypeResponse> {
        let user = registered_user(self.repo.as_ref(), identity).await?;
        let worker_type = self
            .repo
            .list_worker_types()
            .await?
            .into_iter()
            .find(|wt| wt.role == user.role);

        let worker_type = match worker_type {
            Some(wt) => wt,
            None => WorkerType {
                role: user.role,
                label: None,
                zone: self.repo.find_zone_by_role(user.role).await?,
            },
        };
        Ok(worker_type.into())
    }

    /// Tells the caller whether `req` lies inside their zone without
    /// touching any shift.
    pub async fn check_perimeter(
        &self,
        identity: &Identity,
        req: &PerimeterCheckRequest,
    ) -> Result<PerimeterCheckResponse> {
        let user = registered_user(self.repo.as_ref(), identity).await?;
        let zone = self
            .repo
            .find_zone_by_role(user.role)
            .await?
            .ok_or(ClockError::ZoneNotConfigured(user.role))?;

        let (within, distance_m) = zone.check(GeoPoint::new(req.lat, req.lng));
        Ok(PerimeterCheckResponse {
            within,
            distance_m,
            radius_m: zone.radius_m,
            radius_km: meters_to_km(zone.radius_m),
        })
    }

    pub async fn list_worker_types(&self) -> Result<Vec<WorkerTypeResponse>> {
        let types = self.repo.list_worker_types().await?;
        Ok(types.into_iter().map(Into::into).collect())
    }

    pub async fn upsert_zone(&self, role: Role, req: &UpsertZoneRequest) -> Result<ZoneResponse> {
        let radius_m = req.radius_in_meters()?;
        if !(radius_m > 0.0 && radius_m <= MAX_RADIUS_M) {
            return Err(Error::BadRequest(format!(
                "Radius must be greater than 0 and at most {} m",
                MAX_RADIUS_M
            )));
        }

        let zone = self.repo.upsert_zone(role, req.center(), radius_m).await?;
        tracing::info!(
            role = %role,
            lat = zone.latitude,
            lng = zone.longitude,
            radius_m = zone.radius_m,
            "worker zone saved"
        );
        Ok(zone.into())
    }
}
