//! Display formatting in the viewer's timezone.
//!
//! Formatting never fails a request: an unknown timezone is logged and the
//! instant is formatted without conversion (UTC wall clock).

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::warn;

use crate::availability::Availability;
use crate::enumerator::TimeSlot;
use crate::timezone::parse_timezone;

const TIME_FORMAT: &str = "%-I:%M %p";
const DATE_FORMAT: &str = "%A, %B %-d, %Y";
const KEY_FORMAT: &str = "%Y-%m-%d";

/// Time of day, e.g. `"9:00 AM"`.
pub fn format_time(instant: DateTime<Utc>, timezone: &str) -> String {
    format_in(instant, resolve_display_tz(timezone), TIME_FORMAT)
}

/// Full date, e.g. `"Monday, March 16, 2026"`.
pub fn format_date(instant: DateTime<Utc>, timezone: &str) -> String {
    format_in(instant, resolve_display_tz(timezone), DATE_FORMAT)
}

/// Calendar date key, e.g. `"2026-03-16"`.
pub fn date_key(instant: DateTime<Utc>, timezone: &str) -> String {
    format_in(instant, resolve_display_tz(timezone), KEY_FORMAT)
}

/// One day of availability, ready to render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayView {
    pub date: String,
    pub heading: String,
    pub slots: Vec<SlotView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotView {
    pub start: String,
    pub end: String,
    /// Start time in the display timezone.
    pub label: String,
}

/// Presentation model of `availability`, with labels in `display_timezone`.
///
/// Slots are regrouped by their calendar date in the display timezone, so a
/// heading always names the day its labels fall on.
pub fn render(availability: &Availability, display_timezone: &str) -> Vec<DayView> {
    let tz = resolve_display_tz(display_timezone);

    let mut days: BTreeMap<NaiveDate, Vec<&TimeSlot>> = BTreeMap::new();
    for slot in availability.values().flatten() {
        days.entry(local_date(slot.start, tz)).or_default().push(slot);
    }

    days.into_iter()
        .map(|(date, mut slots)| {
            slots.sort_by_key(|s| (s.start, s.end));
            slots.dedup_by_key(|s| (s.start, s.end));
            DayView {
                date: date.format(KEY_FORMAT).to_string(),
                heading: heading(date),
                slots: slots
                    .into_iter()
                    .map(|slot| SlotView {
                        start: slot.start.to_rfc3339(),
                        end: slot.end.to_rfc3339(),
                        label: format_in(slot.start, tz, TIME_FORMAT),
                    })
                    .collect(),
            }
        })
        .collect()
}

fn heading(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn local_date(instant: DateTime<Utc>, tz: Option<Tz>) -> NaiveDate {
    match tz {
        Some(tz) => instant.with_timezone(&tz).date_naive(),
        None => instant.date_naive(),
    }
}

fn resolve_display_tz(timezone: &str) -> Option<Tz> {
    match parse_timezone(timezone) {
        Ok(tz) => Some(tz),
        Err(_) => {
            warn!(timezone, "unknown display timezone, formatting without conversion");
            None
        }
    }
}

fn format_in(instant: DateTime<Utc>, tz: Option<Tz>, pattern: &str) -> String {
    match tz {
        Some(tz) => instant.with_timezone(&tz).format(pattern).to_string(),
        None => instant.naive_utc().format(pattern).to_string(),
    }
}
