//! Timestamp formats shared by storage, forms and URLs.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};

/// Storage format; lexicographic order matches chronological order.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format used when a timestamp travels inside a URL path segment.
pub const URL_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Calendar date format for birth dates and report intervals.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Years with a four-digit rendering, so stored strings sort chronologically.
const YEAR_RANGE: std::ops::RangeInclusive<i32> = 0..=9999;

const ACCEPTED_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Whether the timestamp renders with a four-digit year.
pub fn is_storable(ts: &NaiveDateTime) -> bool {
    YEAR_RANGE.contains(&ts.year())
}

/// Render a timestamp for storage.
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Render a timestamp for a URL path segment.
pub fn url_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(URL_TIMESTAMP_FORMAT).to_string()
}

/// Parse a stored, URL or form timestamp. Seconds are optional.
pub fn parse_timestamp(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    ACCEPTED_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .filter(is_storable)
}

/// Combine separate `YYYY-MM-DD` and `HH:MM` form fields.
pub fn parse_date_time(date: &str, time: &str) -> Option<NaiveDateTime> {
    let date = parse_date(date)?;
    let time = time.trim();
    let time = NaiveTime::parse_from_str(time, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M:%S"))
        .ok()?;
    Some(date.and_time(time))
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
        .ok()
        .filter(|date| YEAR_RANGE.contains(&date.year()))
}
