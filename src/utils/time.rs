use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Offset, Utc};

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Builds the reporting offset from minutes east of UTC, falling back to UTC
/// for values chrono rejects (beyond +/-24h).
pub fn report_offset(minutes: i32) -> FixedOffset {
    FixedOffset::east_opt(minutes.saturating_mul(60)).unwrap_or_else(|| Utc.fix())
}

pub fn local_date(ts: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    ts.with_timezone(&offset).date_naive()
}

/// Formats a span as `"{h}h {m}m"`, clamping negative spans to zero.
pub fn format_duration(span: Duration) -> String {
    let minutes = span.num_minutes().max(0);
    format!("{}h {}m", minutes / 60, minutes % 60)
}

pub fn hours(span: Duration) -> f64 {
    span.num_seconds().max(0) as f64 / 3600.0
}

/// Floors to one decimal place.
pub fn floor_tenths(value: f64) -> f64 {
    (value * 10.0).floor() / 10.0
}
