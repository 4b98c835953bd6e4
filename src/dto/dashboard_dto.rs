use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::role::Role;
use crate::models::shift::ShiftWithWorker;
use crate::utils::time::{format_duration, hours};

pub const DEFAULT_DASHBOARD_DAYS: u32 = 7;
pub const MAX_DASHBOARD_DAYS: u32 = 31;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardQuery {
    pub days: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShiftHistoryQuery {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
}

/// One row of the manager's active-workers and clock-history tables.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ShiftRecordResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub worker_name: String,
    pub role: Role,
    pub clock_in: DateTime<Utc>,
    pub clock_in_lat: f64,
    pub clock_in_lng: f64,
    pub clock_in_note: Option<String>,
    pub clock_out: Option<DateTime<Utc>>,
    pub clock_out_lat: Option<f64>,
    pub clock_out_lng: Option<f64>,
    pub clock_out_note: Option<String>,
    pub active: bool,
    pub duration: String,
    pub hours: f64,
}

impl ShiftRecordResponse {
    pub fn new(record: ShiftWithWorker, now: DateTime<Utc>) -> Self {
        let span = record.shift.duration(now);
        let shift = record.shift;
        Self {
            id: shift.id,
            user_id: shift.user_id,
            worker_name: record.worker_name,
            role: record.worker_role,
            active: shift.is_open(),
            clock_in: shift.clock_in,
            clock_in_lat: shift.clock_in_lat,
            clock_in_lng: shift.clock_in_lng,
            clock_in_note: shift.clock_in_note,
            clock_out: shift.clock_out,
            clock_out_lat: shift.clock_out_lat,
            clock_out_lng: shift.clock_out_lng,
            clock_out_note: shift.clock_out_note,
            duration: format_duration(span),
            hours: hours(span),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DailyHours {
    pub date: NaiveDate,
    pub hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StaffTotals {
    pub user_id: Uuid,
    pub worker_name: String,
    pub role: Role,
    pub completed_hours: f64,
    pub shift_count: usize,
    pub last_clock_in: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardResponse {
    pub total_staff: i64,
    pub active_workers: usize,
    pub today_shifts: usize,
    pub avg_hours_today: f64,
    pub total_hours: f64,
    pub hours_per_day: Vec<DailyHours>,
    pub staff_totals: Vec<StaffTotals>,
}
