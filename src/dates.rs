/*
Best-effort interpretation of the free-text dates users type into the
study schedule. Everything is resolved against an explicit "now" so the
statistics engine reads the clock once per computation.
*/

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone};

// ISO-8601 date-times without an offset are read in the caller's offset
const NAIVE_ISO_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

// Looser spellings, tried only after ISO and the relative tokens fail
const GENERIC_DATE_FORMATS: &[&str] = &[
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%d %B %Y",
    "%m/%d/%Y",
    "%Y/%m/%d",
    "%a %b %d %Y",
];

// Local -> FixedOffset (current system offset)
pub fn now_fixed_offset() -> DateTime<FixedOffset> {
    chrono::Local::now().fixed_offset()
}

/// Serialized form used for normalized task dates.
pub fn to_iso(dt: DateTime<FixedOffset>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, false)
}

fn at_local(naive: NaiveDateTime, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    offset.from_local_datetime(&naive).single()
}

fn at_midnight(date: NaiveDate, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    at_local(date.and_hms_opt(0, 0, 0)?, offset)
}

fn parse_iso(raw: &str, now: DateTime<FixedOffset>) -> Option<DateTime<FixedOffset>> {
    let offset = *now.offset();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&offset));
    }

    for fmt in NAIVE_ISO_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return at_local(naive, offset);
        }
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    at_midnight(date, offset)
}

fn parse_relative_token(raw: &str, now: DateTime<FixedOffset>) -> Option<DateTime<FixedOffset>> {
    match raw.to_ascii_lowercase().as_str() {
        "today" => Some(now),
        "tomorrow" => Some(now + Duration::days(1)),
        "yesterday" => Some(now - Duration::days(1)),
        _ => None,
    }
}

fn parse_generic(raw: &str, now: DateTime<FixedOffset>) -> Option<DateTime<FixedOffset>> {
    GENERIC_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .and_then(|date| at_midnight(date, *now.offset()))
}

/// Interpret a stored task date.
///
/// Order: ISO-8601 (with or without offset, or date only), then the
/// relative tokens `today` / `tomorrow` / `yesterday`, then a handful of
/// common written formats. Returns `None` for anything else ("No Date").
pub fn parse_task_date(raw: &str, now: DateTime<FixedOffset>) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    parse_iso(raw, now)
        .or_else(|| parse_relative_token(raw, now))
        .or_else(|| parse_generic(raw, now))
}

/// Normalize the date text of a newly entered task.
///
/// ISO input and relative tokens are pinned to an absolute RFC3339 value;
/// anything else is kept exactly as typed.
pub fn normalize_task_date(raw: &str, now: DateTime<FixedOffset>) -> String {
    let trimmed = raw.trim();

    match parse_iso(trimmed, now).or_else(|| parse_relative_token(trimmed, now)) {
        Some(dt) => to_iso(dt),
        None => raw.to_string(),
    }
}
