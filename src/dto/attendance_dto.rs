use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::shift::{ClockState, Shift};
use crate::utils::geo::GeoPoint;

pub const MAX_NOTE_LEN: u64 = 1000;

/// Clock-in and clock-out share one body: the caller's position and an
/// optional note for that boundary.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ClockRequest {
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: f64,
    #[validate(length(max = MAX_NOTE_LEN))]
    pub note: Option<String>,
}

impl ClockRequest {
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }

    /// Trimmed note; blank notes are dropped.
    pub fn note(&self) -> Option<String> {
        self.note
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShiftListQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ShiftStatusResponse {
    pub state: ClockState,
    pub current_shift: Option<Shift>,
    pub current_shift_duration: String,
    pub today_hours: f64,
}
