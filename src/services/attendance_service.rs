use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};

use crate::database::repository::Repository;
use crate::dto::attendance_dto::{ClockRequest, ShiftStatusResponse};
use crate::error::{ClockError, Result};
use crate::middleware::auth::Identity;
use crate::models::shift::{ClockState, NewShift, Shift, ShiftClosure};
use crate::services::analytics_service::hours_on_day;
use crate::services::user_service::registered_user;
use crate::utils::time::{format_duration, local_date, now};

pub const DEFAULT_SHIFT_LIMIT: i64 = 50;
pub const MAX_SHIFT_LIMIT: i64 = 500;

#[derive(Debug, Clone, Copy)]
pub struct ClockPolicy {
    /// Also require the caller to be inside the zone when clocking out.
    pub enforce_clock_out_perimeter: bool,
    pub report_offset: FixedOffset,
}

/// The per-user attendance state machine: CLOCKED_OUT -> CLOCKED_IN -> CLOCKED_OUT.
#[derive(Clone)]
pub struct AttendanceService {
    repo: Arc<dyn Repository>,
    policy: ClockPolicy,
}

impl AttendanceService {
    pub fn new(repo: Arc<dyn Repository>, policy: ClockPolicy) -> Self {
        Self { repo, policy }
    }

    pub async fn clock_in(&self, identity: &Identity, req: &ClockRequest) -> Result<Shift> {
        let user = registered_user(self.repo.as_ref(), identity).await?;
        let zone = self
            .repo
            .find_zone_by_role(user.role)
            .await?
            .ok_or(ClockError::ZoneNotConfigured(user.role))?;

        if self.repo.find_open_shift(user.id).await?.is_some() {
            return Err(ClockError::AlreadyClockedIn.into());
        }

        let position = req.position();
        let (within, distance_m) = zone.check(position);
        if !within {
            tracing::info!(
                user_id = %user.id,
                role = %user.role,
                distance_m,
                radius_m = zone.radius_m,
                "clock-in refused outside perimeter"
            );
            return Err(ClockError::OutsidePerimeter {
                radius_m: zone.radius_m,
                distance_m,
            }
            .into());
        }

        let shift = self
            .repo
            .insert_open_shift(NewShift {
                user_id: user.id,
                clock_in: now(),
                position,
                note: req.note(),
            })
            .await?
            .ok_or(ClockError::AlreadyClockedIn)?;

        tracing::info!(user_id = %user.id, shift_id = %shift.id, distance_m, "clocked in");
        Ok(shift)
    }

    pub async fn clock_out(&self, identity: &Identity, req: &ClockRequest) -> Result<Shift> {
        let user = registered_user(self.repo.as_ref(), identity).await?;
        let position = req.position();

        if self.policy.enforce_clock_out_perimeter {
            if let Some(zone) = self.repo.find_zone_by_role(user.role).await? {
                let (within, distance_m) = zone.check(position);
                if !within {
                    return Err(ClockError::OutsidePerimeter {
                        radius_m: zone.radius_m,
                        distance_m,
                    }
                    .into());
                }
            }
        }

        let shift = self
            .repo
            .close_open_shift(
                user.id,
                ShiftClosure {
                    clock_out: now(),
                    position,
                    note: req.note(),
                },
            )
            .await?
            .ok_or(ClockError::NoActiveShift)?;

        tracing::info!(user_id = %user.id, shift_id = %shift.id, "clocked out");
        Ok(shift)
    }

    pub async fn shifts_for_user(&self, identity: &Identity, limit: Option<i64>) -> Result<Vec<Shift>> {
        let user = registered_user(self.repo.as_ref(), identity).await?;
        let limit = limit.unwrap_or(DEFAULT_SHIFT_LIMIT).clamp(1, MAX_SHIFT_LIMIT);
        self.repo.list_shifts_for_user(user.id, limit).await
    }

    pub async fn status(&self, identity: &Identity) -> Result<ShiftStatusResponse> {
        let user = registered_user(self.repo.as_ref(), identity).await?;
        let shifts = self.repo.list_shifts_for_user(user.id, MAX_SHIFT_LIMIT).await?;
        Ok(status_at(shifts, now(), self.policy.report_offset))
    }
}

/// Worker dashboard figures for a fixed instant.
pub fn status_at(shifts: Vec<Shift>, now: DateTime<Utc>, offset: FixedOffset) -> ShiftStatusResponse {
    let today = local_date(now, offset);
    let today_hours = hours_on_day(&shifts, today, now, offset);
    let current_shift = shifts.into_iter().find(Shift::is_open);
    let current_shift_duration = current_shift
        .as_ref()
        .map(|s| format_duration(s.duration(now)))
        .unwrap_or_else(|| "0h 0m".to_string());

    ShiftStatusResponse {
        state: ClockState::of(current_shift.as_ref()),
        current_shift,
        current_shift_duration,
        today_hours,
    }
}
