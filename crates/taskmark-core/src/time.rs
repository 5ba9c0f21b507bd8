//! RFC3339 helpers. All timestamps are handled in UTC.

use chrono::{DateTime, Duration, Utc};

/// Output format for timestamps: second precision, `Z` suffix.
pub const RFC3339_UTC_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Parses an RFC3339 timestamp with any offset and converts it to UTC.
pub fn parse_rfc3339(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

/// Formats a timestamp as `YYYY-MM-DDTHH:MM:SSZ`.
pub fn format_rfc3339(ts: DateTime<Utc>) -> String {
    ts.format(RFC3339_UTC_FORMAT).to_string()
}

/// Current UTC time truncated to whole seconds.
pub fn now_utc() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp(now.timestamp(), 0).unwrap_or(now)
}

/// Shifts `base` by the given offsets; `None` on overflow.
pub fn offset(base: DateTime<Utc>, days: i64, hours: i64, minutes: i64) -> Option<DateTime<Utc>> {
    let delta = Duration::try_days(days)?
        .checked_add(&Duration::try_hours(hours)?)?
        .checked_add(&Duration::try_minutes(minutes)?)?;
    base.checked_add_signed(delta)
}
