use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::role::Role;
use crate::utils::geo::GeoPoint;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Shift {
    pub id: Uuid,
    pub user_id: Uuid,
    pub clock_in: DateTime<Utc>,
    pub clock_in_lat: f64,
    pub clock_in_lng: f64,
    pub clock_in_note: Option<String>,
    pub clock_out: Option<DateTime<Utc>>,
    pub clock_out_lat: Option<f64>,
    pub clock_out_lng: Option<f64>,
    pub clock_out_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Shift {
    pub fn is_open(&self) -> bool {
        self.clock_out.is_none()
    }

    pub fn clock_in_position(&self) -> GeoPoint {
        GeoPoint::new(self.clock_in_lat, self.clock_in_lng)
    }

    pub fn clock_out_position(&self) -> Option<GeoPoint> {
        match (self.clock_out_lat, self.clock_out_lng) {
            (Some(lat), Some(lng)) => Some(GeoPoint::new(lat, lng)),
            _ => None,
        }
    }

    /// Worked time; an open shift runs until `now`.
    pub fn duration(&self, now: DateTime<Utc>) -> Duration {
        let end = self.clock_out.unwrap_or(now);
        (end - self.clock_in).max(Duration::zero())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClockState {
    ClockedOut,
    ClockedIn,
}

impl ClockState {
    pub fn of(open_shift: Option<&Shift>) -> Self {
        match open_shift {
            Some(_) => ClockState::ClockedIn,
            None => ClockState::ClockedOut,
        }
    }
}

/// Clock-in boundary as recorded by the attendance service.
#[derive(Debug, Clone, PartialEq)]
pub struct NewShift {
    pub user_id: Uuid,
    pub clock_in: DateTime<Utc>,
    pub position: GeoPoint,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShiftClosure {
    pub clock_out: DateTime<Utc>,
    pub position: GeoPoint,
    pub note: Option<String>,
}

/// Shift joined with its owner, for manager views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ShiftWithWorker {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub shift: Shift,
    pub worker_name: String,
    pub worker_role: Role,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShiftWindow {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub limit: i64,
}
