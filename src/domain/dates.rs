// src/domain/dates.rs

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Stand-in expiry for records whose date is missing or unparseable.
///
/// Such records sort after every real date, so they are never shown as
/// more urgent than a record with a known expiry.
pub const FAR_FUTURE: NaiveDate = match NaiveDate::from_ymd_opt(9999, 12, 31) {
    Some(d) => d,
    None => NaiveDate::MIN,
};

/// Parse the calendar date out of a stored date field.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps (the date as written, in the
/// timestamp's own offset) and naive `YYYY-MM-DDTHH:MM:SS[.f]`.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    None
}

/// Parse a submission timestamp down to the second, for recency ordering.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Expiry used for ordering: the parsed date, or [`FAR_FUTURE`].
pub fn effective_expiry(raw: Option<&str>) -> NaiveDate {
    raw.and_then(parse_calendar_date).unwrap_or(FAR_FUTURE)
}

/// Signed whole days from `today` to `target`. Negative once `target` has passed.
pub fn days_between(today: NaiveDate, target: NaiveDate) -> i64 {
    target.signed_duration_since(today).num_days()
}

/// `DD/MM/YYYY`, `N/A` when absent, the raw text when unparseable.
pub fn format_date(raw: Option<&str>) -> String {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => "N/A".to_string(),
        Some(s) => match parse_calendar_date(s) {
            Some(d) => d.format("%d/%m/%Y").to_string(),
            None => s.to_string(),
        },
    }
}

/// `DD Mon YYYY, HH:MM` for submission timestamps.
pub fn format_date_time(raw: Option<&str>) -> String {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => "N/A".to_string(),
        Some(s) => match parse_timestamp(s) {
            Some(dt) => dt.format("%d %b %Y, %H:%M").to_string(),
            None => s.to_string(),
        },
    }
}
