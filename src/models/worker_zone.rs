use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::role::Role;
use crate::utils::geo::{haversine_distance_m, is_within_radius, GeoPoint};

/// Circular perimeter a role must be inside to clock in. Radius is in meters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct WorkerZone {
    pub id: Uuid,
    pub role: Role,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_m: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WorkerZone {
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }

    pub fn distance_from_center_m(&self, point: GeoPoint) -> f64 {
        haversine_distance_m(point, self.center())
    }

    /// Whether `point` is inside the perimeter, and how far it is from the
    /// center. Every clock and preview decision goes through here.
    pub fn check(&self, point: GeoPoint) -> (bool, f64) {
        let within = is_within_radius(point, self.center(), self.radius_m);
        (within, self.distance_from_center_m(point))
    }

    pub fn contains(&self, point: GeoPoint) -> bool {
        self.check(point).0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerType {
    pub role: Role,
    pub label: Option<String>,
    pub zone: Option<WorkerZone>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(lat: f64, lng: f64, radius_m: f64) -> WorkerZone {
        WorkerZone {
            id: Uuid::new_v4(),
            role: Role::Nurse,
            latitude: lat,
            longitude: lng,
            radius_m,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn contains_center_and_rejects_distant_points() {
        let z = zone(0.0, 0.0, 1000.0);
        assert!(z.contains(GeoPoint::new(0.0, 0.0)));
        assert!(!z.contains(GeoPoint::new(10.0, 10.0)));
    }

    #[test]
    fn check_reports_distance_and_boundary_is_inside() {
        let z = zone(0.0, 0.0, 1000.0);
        let edge = GeoPoint::new(0.0, 0.01);
        let (_, d) = z.check(edge);
        assert!(d > 1000.0);

        let exact = zone(0.0, 0.0, d);
        assert_eq!(exact.check(edge), (true, d));
        assert_eq!(z.check(GeoPoint::new(0.0, 0.0)), (true, 0.0));
    }

    #[test]
    fn hospital_campus_radius() {
        let z = zone(40.7128, -74.0060, 2000.0);
        assert!(z.contains(GeoPoint::new(40.7138, -74.0050)));
        assert!(!z.contains(GeoPoint::new(40.7580, -73.9855)));
    }
}
