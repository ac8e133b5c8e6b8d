use chrono::{DateTime, Datelike, Utc, Weekday};
use chrono_tz::Tz;

/// Format used for the timestamp line of a report.
pub const REPORT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Converts a UTC instant to wall-clock time in the market timezone.
pub fn local_time(instant: DateTime<Utc>, tz: Tz) -> DateTime<Tz> {
    instant.with_timezone(&tz)
}

/// True when `instant` falls on a Saturday or Sunday in `tz`.
///
/// The check uses the market's local date, so 23:30 UTC on a Friday is
/// already Saturday in Seoul.
pub fn is_weekend(instant: DateTime<Utc>, tz: Tz) -> bool {
    matches!(
        local_time(instant, tz).weekday(),
        Weekday::Sat | Weekday::Sun
    )
}

pub fn format_report_timestamp(instant: DateTime<Utc>, tz: Tz) -> String {
    local_time(instant, tz)
        .format(REPORT_TIMESTAMP_FORMAT)
        .to_string()
}
