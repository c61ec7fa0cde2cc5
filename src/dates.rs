//! Timestamp normalization and calendar bucketing.
//!
//! The backup platform stores timestamps relative to its own epoch
//! (2001-01-01T00:00:00Z). Older backups store seconds since that epoch,
//! newer ones store nanoseconds. [`normalize_timestamp`] converts either
//! encoding to standard Unix seconds.

use chrono::{DateTime, NaiveDate, Utc};

/// Offset of the platform epoch (2001-01-01T00:00:00Z) from the Unix epoch.
pub const PLATFORM_EPOCH_OFFSET: i64 = 978_307_200;

/// Raw values above this are implausibly large for a seconds count and are
/// treated as nanoseconds. This is a magnitude heuristic, not a format tag;
/// the constant is fixed and must not be tuned.
const NANOSECOND_THRESHOLD: i64 = PLATFORM_EPOCH_OFFSET * 1_000_000;

/// Convert a backup-native timestamp to Unix seconds.
///
/// Total over all inputs: values above the nanosecond threshold are divided
/// down to seconds first, everything else is taken as seconds directly, and
/// both get the platform epoch offset added.
#[must_use]
pub fn normalize_timestamp(raw: i64) -> i64 {
    if raw > NANOSECOND_THRESHOLD {
        raw / 1_000_000_000 + PLATFORM_EPOCH_OFFSET
    } else {
        raw + PLATFORM_EPOCH_OFFSET
    }
}

/// Interpret Unix seconds as a UTC datetime.
///
/// Out-of-range values clamp to the Unix epoch rather than failing; the
/// pipeline is total and rendering a degenerate date beats aborting a run.
#[must_use]
pub fn to_datetime(unix_seconds: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(unix_seconds, 0).unwrap_or_default()
}

/// Calendar date used for date-divider bucketing.
///
/// Fixed to UTC so the index page and chat pages always agree on which day
/// a message belongs to.
#[must_use]
pub fn calendar_date(unix_seconds: i64) -> NaiveDate {
    to_datetime(unix_seconds).date_naive()
}

/// Format a timestamp as a date divider label, e.g. `2022-05-07`.
#[must_use]
pub fn format_date(unix_seconds: i64) -> String {
    to_datetime(unix_seconds).format("%Y-%m-%d").to_string()
}

/// Format a timestamp as a message time, e.g. `02:28 PM`.
#[must_use]
pub fn format_time(unix_seconds: i64) -> String {
    to_datetime(unix_seconds).format("%I:%M %p").to_string()
}

/// Format a timestamp for the index listing, e.g. `2022-05-07 02:28 PM`.
#[must_use]
pub fn format_date_time(unix_seconds: i64) -> String {
    to_datetime(unix_seconds)
        .format("%Y-%m-%d %I:%M %p")
        .to_string()
}
