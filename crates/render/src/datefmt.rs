//! Date/time label formatting for the receipt header.
//!
//! The label is rendered in Chilean Spanish (medium date, short 24-hour
//! time). Formatting never fails: an absent or unparseable `date_time`
//! falls back to the current wall clock, and the localized render falls
//! back to a plain default format if the locale path cannot be applied.

use chrono::format::Locale;
use chrono::{DateTime, Local, NaiveDateTime};

const ES_CL_FORMAT: &str = "%-d %b %Y, %H:%M";
const FALLBACK_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Formats the order's date/time for the panel header.
///
/// A `date_time` that does not parse is the formatting-failure path: the
/// label degrades to the current clock in a plain default format instead of
/// erroring out of the render.
pub fn format_receipt_date(date_time: Option<&str>) -> String {
    match date_time {
        Some(raw) => match parse_wall_clock(raw) {
            Some(stamp) => stamp
                .and_utc()
                .format_localized(ES_CL_FORMAT, Locale::es_CL)
                .to_string(),
            None => Local::now()
                .naive_local()
                .format(FALLBACK_FORMAT)
                .to_string(),
        },
        None => Local::now()
            .naive_local()
            .and_utc()
            .format_localized(ES_CL_FORMAT, Locale::es_CL)
            .to_string(),
    }
}

/// Accepts RFC 3339 (offset preserved as the sender's wall clock) or a
/// naive `YYYY-MM-DDTHH:MM[:SS]` stamp.
fn parse_wall_clock(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.naive_local());
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, pattern) {
            return Some(parsed);
        }
    }
    None
}
