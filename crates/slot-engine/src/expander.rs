//! Weekly recurrence expansion -- turns an availability window into the concrete
//! local dates it occurs on inside the lookahead window.
//!
//! A window is an RFC 5545 `FREQ=WEEKLY` rule anchored on its first matching
//! date. Expansion goes through the `rrule` crate with the window's `TZID` so
//! week-over-week stepping stays on the local calendar across DST changes.
//! Only the dates are kept; wall-clock bounds are resolved per date by
//! [`ParsedWindow::bounds_on`](crate::window::ParsedWindow::bounds_on).

use chrono::{Datelike, Days, NaiveDate};
use rrule::RRuleSet;

use crate::error::{Result, SlotError};
use crate::window::ParsedWindow;

/// Expand `window` into the local dates it falls on, for the `lookahead_days`
/// calendar days starting at `today` (inclusive).
///
/// # Errors
/// Returns [`SlotError::Expansion`] if the recurrence cannot be built.
pub fn expand_occurrence_dates(
    window: &ParsedWindow,
    today: NaiveDate,
    lookahead_days: u32,
) -> Result<Vec<NaiveDate>> {
    let offset = (window.weekday.num_days_from_sunday() + 7
        - today.weekday().num_days_from_sunday())
        % 7;
    if offset >= lookahead_days {
        return Ok(Vec::new());
    }

    let first = today
        .checked_add_days(Days::new(u64::from(offset)))
        .ok_or_else(|| SlotError::Expansion(format!("date overflow after {}", today)))?;
    let count = (lookahead_days - 1 - offset) / 7 + 1;

    // Anchor at noon: only the date matters here, and noon never falls in a DST gap.
    let rrule_text = format!(
        "DTSTART;TZID={}:{}T120000\nRRULE:FREQ=WEEKLY;COUNT={}",
        window.tz.name(),
        first.format("%Y%m%d"),
        count
    );

    let rrule_set: RRuleSet = rrule_text
        .parse()
        .map_err(|e| SlotError::Expansion(format!("{}", e)))?;

    let limit = u16::try_from(count).unwrap_or(u16::MAX);
    let last = today
        .checked_add_days(Days::new(u64::from(lookahead_days - 1)))
        .unwrap_or(NaiveDate::MAX);

    let dates = rrule_set
        .all(limit)
        .dates
        .into_iter()
        .map(|dt| dt.with_timezone(&window.tz).date_naive())
        .filter(|date| *date >= today && *date <= last && date.weekday() == window.weekday)
        .collect();

    Ok(dates)
}
