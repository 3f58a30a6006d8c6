//! Time utilities: duration computations and minute formatting.

use chrono::{DateTime, Local};

pub fn minutes_between(start: DateTime<Local>, end: DateTime<Local>) -> i64 {
    let duration = end - start;
    duration.num_minutes()
}

pub fn format_minutes(mins: i64) -> String {
    let sign = if mins < 0 { "-" } else { "" };
    let m = mins.abs();
    format!("{}{:02}:{:02}", sign, m / 60, m % 60)
}

/// Parse the hidden `--now` override: "YYYY-MM-DDTHH:MM" (seconds optional),
/// interpreted in the local timezone.
pub fn parse_now_override(s: &str) -> Option<DateTime<Local>> {
    let fmt = if s.len() > 16 {
        "%Y-%m-%dT%H:%M:%S"
    } else {
        "%Y-%m-%dT%H:%M"
    };
    let naive = chrono::NaiveDateTime::parse_from_str(s, fmt).ok()?;
    naive.and_local_timezone(Local).single()
}
