//! Time related utils.

use chrono::Utc;

/// The timestamp type used across awslite.
pub type DateTime = chrono::DateTime<Utc>;

/// Current time in UTC.
pub fn now() -> DateTime {
    Utc::now()
}

/// Format a timestamp as the 8-char scope date: `20220313`.
pub fn format_date(t: DateTime) -> String {
    t.format("%Y%m%d").to_string()
}

/// Format a timestamp as compact ISO-8601 basic: `20220313T072004Z`.
///
/// No punctuation, no fractional seconds. The first 8 characters equal
/// [`format_date`] for the same instant.
pub fn format_iso8601(t: DateTime) -> String {
    t.format("%Y%m%dT%H%M%SZ").to_string()
}
