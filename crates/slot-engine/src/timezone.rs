//! Time normalization: wall-clock times in IANA timezones to absolute instants.
//!
//! All functions take explicit inputs (no system clock access). The caller
//! provides the "now" anchor, keeping these functions testable and
//! WASM-compatible.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::dst::DstPolicy;
use crate::error::{Result, SlotError};

/// Longest DST gap observed in the tz database is two hours; probe a little past it.
const MAX_GAP_MINUTES: i64 = 180;

/// Parse an IANA timezone name.
///
/// # Errors
/// Returns [`SlotError::InvalidTimezone`] if `name` is not in the tz database.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| SlotError::InvalidTimezone(name.to_string()))
}

/// Parse a strict `"HH:mm"` time of day (hours 00-23, minutes 00-59).
///
/// # Errors
/// Returns [`SlotError::InvalidTime`] for anything that is not exactly two
/// digits, a colon, and two digits within range.
pub fn parse_time_of_day(s: &str) -> Result<NaiveTime> {
    let (hours, minutes) = split_hhmm(s)?;
    NaiveTime::from_hms_opt(hours, minutes, 0).ok_or_else(|| SlotError::InvalidTime(s.to_string()))
}

/// Split `"HH:mm"` into numeric parts without range-checking the hour.
pub(crate) fn split_hhmm(s: &str) -> Result<(u32, u32)> {
    let invalid = || SlotError::InvalidTime(s.to_string());

    let bytes = s.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return Err(invalid());
    }
    if !bytes[..2].iter().chain(&bytes[3..]).all(u8::is_ascii_digit) {
        return Err(invalid());
    }

    let hours: u32 = s[..2].parse().map_err(|_| invalid())?;
    let minutes: u32 = s[3..].parse().map_err(|_| invalid())?;
    if minutes > 59 {
        return Err(invalid());
    }
    Ok((hours, minutes))
}

/// Convert a local wall-clock time on `date` in `tz` into a UTC instant.
///
/// Ambiguous times resolve to the earlier instant. Times that fall in a DST
/// gap follow `policy`: `ShiftForward` returns the first valid instant after
/// the gap, `Skip` returns `None`.
pub fn local_to_instant(
    date: NaiveDate,
    time: NaiveTime,
    tz: &Tz,
    policy: DstPolicy,
) -> Option<DateTime<Utc>> {
    naive_to_instant(date.and_time(time), tz, policy)
}

pub(crate) fn naive_to_instant(
    naive: NaiveDateTime,
    tz: &Tz,
    policy: DstPolicy,
) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => match policy {
            DstPolicy::Skip => None,
            DstPolicy::ShiftForward => shift_past_gap(naive, tz),
        },
    }
}

/// Walk forward minute by minute until the wall clock exists again.
fn shift_past_gap(naive: NaiveDateTime, tz: &Tz) -> Option<DateTime<Utc>> {
    (1..=MAX_GAP_MINUTES).find_map(|m| {
        match tz.from_local_datetime(&(naive + Duration::minutes(m))) {
            LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
            LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
            LocalResult::None => None,
        }
    })
}

/// The calendar date of `now` as seen in `tz`.
pub fn today_in(tz: &Tz, now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(tz).date_naive()
}
