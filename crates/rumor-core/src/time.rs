//! Lightweight UTC date/time utilities (no chrono dependency).
//!
//! Uses Howard Hinnant's civil_from_days algorithm to turn Unix seconds
//! into calendar dates.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::constants::SECS_PER_DAY;

/// Current UTC time as Unix seconds.
pub fn now_unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Convert Unix seconds to ISO-8601 UTC string.
pub fn unix_to_iso8601(secs: u64) -> String {
    let (date, hours, minutes, seconds) = split(secs);
    format!("{date}T{hours:02}:{minutes:02}:{seconds:02}Z")
}

/// Calendar date (`YYYY-MM-DD`, UTC) of a Unix timestamp. Used as the
/// daily partition key for stored items.
pub fn unix_to_date(secs: u64) -> String {
    let (y, m, d) = civil_from_days((secs / SECS_PER_DAY) as i64);
    format!("{y:04}-{m:02}-{d:02}")
}

/// Human-readable report header timestamp: `2026-02-21 13:05:00+00:00 (UTC)`.
pub fn unix_to_pretty(secs: u64) -> String {
    let (date, hours, minutes, seconds) = split(secs);
    format!("{date} {hours:02}:{minutes:02}:{seconds:02}+00:00 (UTC)")
}

/// Daily partition keys covering `from..=to`, oldest first.
pub fn dates_between(from: u64, to: u64) -> Vec<String> {
    if from > to {
        return Vec::new();
    }
    (from / SECS_PER_DAY..=to / SECS_PER_DAY)
        .map(|day| unix_to_date(day * SECS_PER_DAY))
        .collect()
}

fn split(secs: u64) -> (String, u64, u64, u64) {
    let time_of_day = secs % SECS_PER_DAY;
    (
        unix_to_date(secs),
        time_of_day / 3600,
        (time_of_day % 3600) / 60,
        time_of_day % 60,
    )
}

/// Howard Hinnant's civil_from_days: Unix epoch days → (year, month, day).
fn civil_from_days(days: i64) -> (i64, u64, u64) {
    let z = days + 719468;
    let era = if z >= 0 { z } else { z - 146096 } / 146097;
    let doe = (z - era * 146097) as u64;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
    let y = yoe as i64 + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let y = if m <= 2 { y + 1 } else { y };
    (y, m, d)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unix_epoch() {
        assert_eq!(unix_to_iso8601(0), "1970-01-01T00:00:00Z");
    }

    #[test]
    fn test_known_date() {
        // 2026-02-21T00:00:00Z = 1771632000
        assert_eq!(unix_to_iso8601(1771632000), "2026-02-21T00:00:00Z");
        assert_eq!(unix_to_date(1771632000 + 3599), "2026-02-21");
    }

    #[test]
    fn test_pretty_format() {
        assert_eq!(
            unix_to_pretty(1771632000 + 13 * 3600 + 5 * 60 + 9),
            "2026-02-21 13:05:09+00:00 (UTC)"
        );
    }

    #[test]
    fn test_dates_between_spans_partitions() {
        let to = 1771632000 + 3600; // 2026-02-21 01:00
        let from = to - 2 * SECS_PER_DAY;
        assert_eq!(
            dates_between(from, to),
            vec!["2026-02-19", "2026-02-20", "2026-02-21"]
        );
        assert!(dates_between(to, from).is_empty());
    }
}
