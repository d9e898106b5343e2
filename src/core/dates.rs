use chrono::{DateTime, Datelike, Duration, SecondsFormat, Utc};

/// Format a timestamp as the service expects due dates:
/// ISO 8601 UTC with millisecond precision and a `Z` suffix (`2026-10-17T09:30:00.000Z`).
pub fn format_iso8601_millis(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `now` shifted by a signed number of days
pub fn offset_days(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    now + Duration::days(days)
}

/// `now` moved back `days_ago` days, then pinned to October of the resulting year.
/// The day of month always exists because October has 31 days.
pub fn in_october(now: DateTime<Utc>, days_ago: i64) -> DateTime<Utc> {
    let shifted = offset_days(now, -days_ago);
    shifted.with_month(10).unwrap_or(shifted)
}

/// Parse an ISO 8601 timestamp the way the dashboard does; `None` renders as "Invalid Date"
pub fn parse_iso8601(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
