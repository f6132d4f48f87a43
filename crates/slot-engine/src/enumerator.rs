//! Candidate slot enumeration.
//!
//! For every local date a window occurs on, candidates start at the window
//! start and advance by the query step. A candidate is kept while it still
//! fits (`slot_end <= window_end`, so the last slot may end exactly on the
//! window end) and only if it starts strictly after `now + lead_time`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::expander::expand_occurrence_dates;
use crate::query::SlotQuery;
use crate::timezone::today_in;
use crate::window::ParsedWindow;

/// A candidate bookable unit. Derived per query, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub available: bool,
}

impl TimeSlot {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end,
            available: true,
        }
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// Candidates for one window on one local date.
///
/// `earliest_start` is exclusive: slots starting at or before it are dropped.
pub fn enumerate_on_date(
    window: &ParsedWindow,
    date: NaiveDate,
    query: &SlotQuery,
    earliest_start: DateTime<Utc>,
) -> Vec<TimeSlot> {
    let Some((window_start, window_end)) = window.bounds_on(date, query.dst_policy) else {
        return Vec::new();
    };

    let duration = query.duration();
    let step = query.step_duration();

    let mut slots = Vec::new();
    let mut slot_start = window_start;
    while slot_start + duration <= window_end {
        if slot_start > earliest_start {
            slots.push(TimeSlot::new(slot_start, slot_start + duration));
        }
        slot_start += step;
    }
    slots
}

/// Candidates for one window across the whole lookahead, tagged with the local
/// date (in the window's timezone) each one was generated on.
///
/// "Today" is the date of `now` in the window's own timezone.
///
/// # Errors
/// Propagates [`SlotError::Expansion`](crate::SlotError::Expansion) from
/// recurrence expansion.
pub fn enumerate_window(
    window: &ParsedWindow,
    query: &SlotQuery,
    now: DateTime<Utc>,
) -> Result<Vec<(NaiveDate, TimeSlot)>> {
    let today = today_in(&window.tz, now);
    let earliest_start = now + query.lead_time();

    let dates = expand_occurrence_dates(window, today, query.lookahead_days)?;

    Ok(dates
        .into_iter()
        .flat_map(|date| {
            enumerate_on_date(window, date, query, earliest_start)
                .into_iter()
                .map(move |slot| (date, slot))
        })
        .collect())
}
