//! Time and duration helpers.

use chrono::{DateTime, Duration, Local, TimeZone};

/// Milliseconds in one minute.
pub const MINUTE_MS: i64 = 60_000;

/// Milliseconds in one hour.
pub const HOUR_MS: i64 = 3_600_000;

/// Formats a millisecond duration for user-facing text.
///
/// Anything below one minute renders as "Less than 1 minute". Above
/// that, hours and minutes are shown, dropping whichever component is
/// zero: `format_duration_ms(7_200_000)` is `"2h"`, not `"2h 0m"`.
pub fn format_duration_ms(ms: i64) -> String {
    if ms < MINUTE_MS {
        return "Less than 1 minute".to_string();
    }

    let total_minutes = ms / MINUTE_MS;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    match (hours, minutes) {
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}m", h, m),
    }
}

/// Percentage of `current` against `target`, guarding a zero target.
pub fn percentage_of(current: i64, target: i64) -> f64 {
    if target <= 0 {
        return 0.0;
    }
    (current as f64 / target as f64) * 100.0
}

/// Duration from `now` until the next local midnight.
///
/// Used to align the daily reset job. When the local midnight is
/// ambiguous or skipped (DST transitions), the earliest valid instant
/// is used.
pub fn until_next_local_midnight(now: DateTime<Local>) -> Duration {
    let tomorrow = now.date_naive() + Duration::days(1);
    let midnight = tomorrow.and_hms_opt(0, 0, 0).expect("00:00:00 is valid");
    let next = match Local.from_local_datetime(&midnight) {
        chrono::LocalResult::Single(dt) => dt,
        chrono::LocalResult::Ambiguous(earliest, _) => earliest,
        chrono::LocalResult::None => Local
            .from_local_datetime(&(midnight + Duration::hours(1)))
            .earliest()
            .unwrap_or(now + Duration::days(1)),
    };
    next - now
}
