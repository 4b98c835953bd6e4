use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use uuid::Uuid;

use crate::database::repository::Repository;
use crate::dto::dashboard_dto::{
    DailyHours, DashboardResponse, ShiftHistoryQuery, ShiftRecordResponse, StaffTotals,
    DEFAULT_DASHBOARD_DAYS, MAX_DASHBOARD_DAYS,
};
use crate::error::{Error, Result};
use crate::models::shift::{Shift, ShiftWindow, ShiftWithWorker};
use crate::utils::time::{floor_tenths, hours, local_date, now};

pub const DEFAULT_HISTORY_LIMIT: i64 = 200;
pub const MAX_HISTORY_LIMIT: i64 = 5000;
const DASHBOARD_SHIFT_LIMIT: i64 = 20_000;

/// Hours worked on `day` (local to `offset`): finished shifts that started
/// that day plus the whole running shift, timed up to `now`. Floored to 0.1h.
pub fn hours_on_day(shifts: &[Shift], day: NaiveDate, now: DateTime<Utc>, offset: FixedOffset) -> f64 {
    let total = shifts
        .iter()
        .filter(|s| s.is_open() || local_date(s.clock_in, offset) == day)
        .map(|s| hours(s.duration(now)))
        .fold(0.0, |acc, h| acc + h);
    floor_tenths(total)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Hours per local day for the `days` days ending today, oldest first.
pub fn hours_per_day(
    records: &[ShiftWithWorker],
    days: u32,
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> Vec<DailyHours> {
    let today = local_date(now, offset);
    let mut buckets: HashMap<NaiveDate, f64> = HashMap::new();
    for r in records {
        *buckets.entry(local_date(r.shift.clock_in, offset)).or_default() += hours(r.shift.duration(now));
    }

    (0..days as i64)
        .rev()
        .map(|back| {
            let date = today - Duration::days(back);
            DailyHours {
                date,
                hours: round2(buckets.get(&date).copied().unwrap_or(0.0)),
            }
        })
        .collect()
}

/// Completed hours, shift count and last clock-in per worker; busiest first.
pub fn staff_totals(records: &[ShiftWithWorker], now: DateTime<Utc>) -> Vec<StaffTotals> {
    let mut by_user: HashMap<Uuid, StaffTotals> = HashMap::new();
    for r in records {
        let entry = by_user.entry(r.shift.user_id).or_insert_with(|| StaffTotals {
            user_id: r.shift.user_id,
            worker_name: r.worker_name.clone(),
            role: r.worker_role,
            completed_hours: 0.0,
            shift_count: 0,
            last_clock_in: r.shift.clock_in,
        });
        entry.shift_count += 1;
        if !r.shift.is_open() {
            entry.completed_hours += hours(r.shift.duration(now));
        }
        entry.last_clock_in = entry.last_clock_in.max(r.shift.clock_in);
    }

    let mut totals: Vec<StaffTotals> = by_user
        .into_values()
        .map(|mut t| {
            t.completed_hours = round2(t.completed_hours);
            t
        })
        .collect();
    totals.sort_by(|a, b| {
        b.completed_hours
            .total_cmp(&a.completed_hours)
            .then_with(|| a.worker_name.cmp(&b.worker_name))
    });
    totals
}

/// Manager dashboard figures for a fixed instant. `recent` holds the shifts
/// that started inside the reporting window, `open` every open shift.
pub fn dashboard_at(
    total_staff: i64,
    open: &[ShiftWithWorker],
    recent: &[ShiftWithWorker],
    days: u32,
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> DashboardResponse {
    let today = local_date(now, offset);
    let today_hours: Vec<f64> = recent
        .iter()
        .filter(|r| local_date(r.shift.clock_in, offset) == today)
        .map(|r| hours(r.shift.duration(now)))
        .collect();
    let avg_hours_today = if today_hours.is_empty() {
        0.0
    } else {
        round2(today_hours.iter().fold(0.0, |acc, h| acc + h) / today_hours.len() as f64)
    };
    let total_hours = round2(
        recent
            .iter()
            .filter(|r| !r.shift.is_open())
            .map(|r| hours(r.shift.duration(now)))
            .fold(0.0, |acc, h| acc + h),
    );

    DashboardResponse {
        total_staff,
        active_workers: open.len(),
        today_shifts: today_hours.len(),
        avg_hours_today,
        total_hours,
        hours_per_day: hours_per_day(recent, days, now, offset),
        staff_totals: staff_totals(recent, now),
    }
}

/// First instant of the local day `days - 1` days before today.
fn window_start(days: u32, now: DateTime<Utc>, offset: FixedOffset) -> Result<DateTime<Utc>> {
    let first_day = local_date(now, offset) - Duration::days(days.saturating_sub(1) as i64);
    first_day
        .and_hms_opt(0, 0, 0)
        .and_then(|midnight| midnight.and_local_timezone(offset).single())
        .map(|start| start.with_timezone(&Utc))
        .ok_or_else(|| Error::Internal(format!("Cannot compute reporting window for {}", first_day)))
}

#[derive(Clone)]
pub struct AnalyticsService {
    repo: Arc<dyn Repository>,
    offset: FixedOffset,
}

impl AnalyticsService {
    pub fn new(repo: Arc<dyn Repository>, offset: FixedOffset) -> Self {
        Self { repo, offset }
    }

    pub async fn active_workers(&self) -> Result<Vec<ShiftRecordResponse>> {
        let now = now();
        let open = self.repo.list_open_shifts().await?;
        Ok(open.into_iter().map(|r| ShiftRecordResponse::new(r, now)).collect())
    }

    pub async fn history_records(&self, query: &ShiftHistoryQuery) -> Result<Vec<ShiftWithWorker>> {
        if let (Some(from), Some(to)) = (query.from, query.to) {
            if from >= to {
                return Err(Error::BadRequest("`from` must be earlier than `to`".into()));
            }
        }
        let window = ShiftWindow {
            from: query.from,
            to: query.to,
            limit: query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT).clamp(1, MAX_HISTORY_LIMIT),
        };
        self.repo.list_shifts(window).await
    }

    pub async fn history(&self, query: &ShiftHistoryQuery) -> Result<Vec<ShiftRecordResponse>> {
        let now = now();
        let records = self.history_records(query).await?;
        Ok(records.into_iter().map(|r| ShiftRecordResponse::new(r, now)).collect())
    }

    pub async fn dashboard(&self, days: Option<u32>) -> Result<DashboardResponse> {
        let days = days.unwrap_or(DEFAULT_DASHBOARD_DAYS).clamp(1, MAX_DASHBOARD_DAYS);
        let now = now();
        let from = window_start(days, now, self.offset)?;

        let total_staff = self.repo.count_users().await?;
        let open = self.repo.list_open_shifts().await?;
        let recent = self
            .repo
            .list_shifts(ShiftWindow {
                from: Some(from),
                to: None,
                limit: DASHBOARD_SHIFT_LIMIT,
            })
            .await?;
        if recent.len() as i64 >= DASHBOARD_SHIFT_LIMIT {
            tracing::warn!(days, limit = DASHBOARD_SHIFT_LIMIT, "dashboard window truncated");
        }

        Ok(dashboard_at(total_staff, &open, &recent, days, now, self.offset))
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::role::Role;
    use crate::utils::time::report_offset;
    use chrono::TimeZone;

    fn record(user: u128, name: &str, start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> ShiftWithWorker {
        ShiftWithWorker {
            shift: Shift {
                id: Uuid::new_v4(),
                user_id: Uuid::from_u128(user),
                clock_in: start,
                clock_in_lat: 40.7128,
                clock_in_lng: -74.0060,
                clock_in_note: None,
                clock_out: end,
                clock_out_lat: end.map(|_| 40.7128),
                clock_out_lng: end.map(|_| -74.0060),
                clock_out_note: None,
                created_at: start,
                updated_at: end.unwrap_or(start),
            },
            worker_name: name.to_string(),
            worker_role: Role::Nurse,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 4, 12, 0, 0).unwrap()
    }

    #[test]
    fn dashboard_matches_hand_computed_figures() {
        let now = now();
        let h = Duration::hours;
        let mike_open = record(1, "Mike", now - h(4), None);
        let emily_today = record(2, "Emily", now - h(3), Some(now - h(1)));
        let emily_yesterday = record(2, "Emily", now - h(26), Some(now - h(18)));
        let recent = vec![mike_open.clone(), emily_today, emily_yesterday];

        let stats = dashboard_at(5, &[mike_open], &recent, 3, now, report_offset(0));
        assert_eq!(stats.total_staff, 5);
        assert_eq!(stats.active_workers, 1);
        assert_eq!(stats.today_shifts, 2);
        // (4h running + 2h finished) / 2 shifts
        assert_eq!(stats.avg_hours_today, 3.0);
        // completed only: 2h + 8h
        assert_eq!(stats.total_hours, 10.0);

        let dates: Vec<_> = stats.hours_per_day.iter().map(|d| d.date).collect();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2026, 5, 2).unwrap(),
                NaiveDate::from_ymd_opt(2026, 5, 3).unwrap(),
                NaiveDate::from_ymd_opt(2026, 5, 4).unwrap(),
            ]
        );
        let per_day: Vec<_> = stats.hours_per_day.iter().map(|d| d.hours).collect();
        assert_eq!(per_day, vec![0.0, 8.0, 6.0]);

        assert_eq!(stats.staff_totals.len(), 2);
        assert_eq!(stats.staff_totals[0].worker_name, "Emily");
        assert_eq!(stats.staff_totals[0].completed_hours, 10.0);
        assert_eq!(stats.staff_totals[0].shift_count, 2);
        assert_eq!(stats.staff_totals[0].last_clock_in, now - h(3));
        assert_eq!(stats.staff_totals[1].completed_hours, 0.0);
        assert_eq!(stats.staff_totals[1].shift_count, 1);
    }

    #[test]
    fn empty_dashboard_has_zero_averages() {
        let stats = dashboard_at(0, &[], &[], 7, now(), report_offset(0));
        assert_eq!(stats.avg_hours_today, 0.0);
        assert_eq!(stats.total_hours, 0.0);
        assert!(stats.total_hours.is_sign_positive());
        assert_eq!(stats.hours_per_day.len(), 7);
        assert!(stats.staff_totals.is_empty());

        let body = serde_json::to_value(&stats).unwrap();
        assert_eq!(body["total_hours"].to_string(), "0.0");
        assert_eq!(body["avg_hours_today"].to_string(), "0.0");
    }

    #[test]
    fn overnight_running_shift_counts_towards_today() {
        let now = Utc.with_ymd_and_hms(2026, 5, 4, 2, 0, 0).unwrap();
        let night = record(1, "Mike", now - Duration::hours(4), None);
        let today = NaiveDate::from_ymd_opt(2026, 5, 4).unwrap();
        assert_eq!(hours_on_day(&[night.shift], today, now, report_offset(0)), 4.0);
    }

    #[test]
    fn no_shifts_today_is_positive_zero() {
        let today = NaiveDate::from_ymd_opt(2026, 5, 4).unwrap();
        let hours = hours_on_day(&[], today, now(), report_offset(0));
        assert!(hours.is_sign_positive());
    }

    #[test]
    fn reporting_offset_moves_late_shifts_to_the_next_day() {
        let now = now();
        let late = record(1, "Mike", Utc.with_ymd_and_hms(2026, 5, 3, 23, 0, 0).unwrap(), Some(Utc.with_ymd_and_hms(2026, 5, 4, 1, 0, 0).unwrap()));
        let shifts = vec![late.shift.clone()];
        let utc_today = hours_on_day(&shifts, NaiveDate::from_ymd_opt(2026, 5, 4).unwrap(), now, report_offset(0));
        let plus2_today = hours_on_day(&shifts, NaiveDate::from_ymd_opt(2026, 5, 4).unwrap(), now, report_offset(120));
        assert_eq!(utc_today, 0.0);
        assert_eq!(plus2_today, 2.0);
    }

    #[test]
    fn window_starts_at_local_midnight() {
        let start = window_start(3, now(), report_offset(0)).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 5, 2, 0, 0, 0).unwrap());
        let start = window_start(1, now(), report_offset(60)).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 5, 3, 23, 0, 0).unwrap());
    }
}
