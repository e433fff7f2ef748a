//! Date Utilities
//!
//! Parsing of deadline time strings and the fixed display formats:
//! - Russian long date for the list (`четверг, 1 янв., 13:00`)
//! - Google Calendar `dates=` timestamps (`20990101T130000+0300`)
//!
//! Everything takes the viewer's time zone as a parameter; the component
//! passes `chrono::Local`, tests pass a `FixedOffset`.

use std::fmt::Display;
use std::time::Duration;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};

/// Date-times carrying their own numeric offset (RFC 3339 is tried first)
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%d %H:%M%z",
];

/// Date-times without an offset, read as local time
const LOCAL_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const WEEKDAYS_RU: [&str; 7] = [
    "понедельник", "вторник", "среда", "четверг", "пятница", "суббота", "воскресенье",
];

const MONTHS_RU_SHORT: [&str; 12] = [
    "янв.", "февр.", "мар.", "апр.", "мая", "июн.",
    "июл.", "авг.", "сент.", "окт.", "нояб.", "дек.",
];

/// Parse a deadline time string into an absolute instant.
///
/// A bare date (`2099-01-01`) means UTC midnight, while a date-time without an
/// offset is wall-clock time in `tz`. Returns `None` for anything else.
pub fn parse_deadline_time<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    let with_offset = zulu_as_offset(raw);
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&with_offset, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for fmt in LOCAL_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return local_to_utc(&naive, tz);
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}

/// `%z` does not read a `Z` designator
fn zulu_as_offset(raw: &str) -> String {
    match raw.strip_suffix(['Z', 'z']) {
        Some(rest) => format!("{}+00:00", rest),
        None => raw.to_string(),
    }
}

fn local_to_utc<Tz: TimeZone>(naive: &NaiveDateTime, tz: &Tz) -> Option<DateTime<Utc>> {
    // Wall-clock times skipped by a DST jump have no local mapping
    tz.from_local_datetime(naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// `YYYYMMDDThhmmss±hhmm` in the viewer's zone, as Google Calendar expects
pub fn gcal_timestamp<Tz>(instant: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    instant.with_timezone(tz).format("%Y%m%dT%H%M%S%z").to_string()
}

/// Long Russian date, matching `toLocaleDateString('ru-RU', ...)` with
/// weekday long, day numeric, month short and 2-digit hour/minute
pub fn localized_date<Tz: TimeZone>(instant: &DateTime<Utc>, tz: &Tz) -> String {
    let local = instant.with_timezone(tz);
    format!(
        "{}, {} {}, {:02}:{:02}",
        WEEKDAYS_RU[local.weekday().num_days_from_monday() as usize],
        local.day(),
        MONTHS_RU_SHORT[local.month0() as usize],
        local.hour(),
        local.minute(),
    )
}

/// Time left until the next wall-clock multiple of `period`.
///
/// Always in `(0, period]`: when `now` sits exactly on a boundary the full
/// period is returned so a tick never fires twice for the same boundary.
pub fn delay_until_next_tick(now: &DateTime<Utc>, period: Duration) -> Duration {
    let period_ms = i64::try_from(period.as_millis()).unwrap_or(i64::MAX).max(1);
    let elapsed = now.timestamp_millis().rem_euclid(period_ms);
    Duration::from_millis((period_ms - elapsed) as u64)
}
