//! Recurring weekly availability windows.
//!
//! An [`AvailabilityWindow`] is the host's schedule configuration as it arrives
//! from storage: a weekday number and two `"HH:mm"` strings in an IANA timezone.
//! [`AvailabilityWindow::parse`] validates it into a [`ParsedWindow`] once per
//! query so the enumerator never touches strings.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::dst::DstPolicy;
use crate::error::{Result, SlotError};
use crate::timezone::{local_to_instant, parse_time_of_day, parse_timezone, split_hhmm};

/// A recurring weekly block during which the host can be booked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityWindow {
    /// Day of week, 0 = Sunday through 6 = Saturday.
    pub weekday: u8,
    /// Local start time, `"HH:mm"`.
    pub start_time: String,
    /// Local end time, `"HH:mm"`. `"24:00"` means midnight at the end of the day.
    pub end_time: String,
    /// IANA timezone the times are expressed in.
    pub timezone: String,
}

/// Where a window ends on its local day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEnd {
    At(NaiveTime),
    EndOfDay,
}

/// A validated window, ready for enumeration.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedWindow {
    pub weekday: Weekday,
    pub start: NaiveTime,
    pub end: WindowEnd,
    pub tz: Tz,
}

impl AvailabilityWindow {
    pub fn new(weekday: u8, start_time: &str, end_time: &str, timezone: &str) -> Self {
        Self {
            weekday,
            start_time: start_time.to_string(),
            end_time: end_time.to_string(),
            timezone: timezone.to_string(),
        }
    }

    /// Validate this window.
    ///
    /// # Errors
    /// - [`SlotError::InvalidInput`] if `weekday > 6` or the window does not end after it starts.
    /// - [`SlotError::InvalidTime`] if either time is not a strict `"HH:mm"`.
    /// - [`SlotError::InvalidTimezone`] if the timezone is unknown.
    pub fn parse(&self) -> Result<ParsedWindow> {
        let weekday = weekday_from_index(self.weekday)?;
        let start = parse_time_of_day(&self.start_time)?;
        let end = parse_window_end(&self.end_time)?;
        let tz = parse_timezone(&self.timezone)?;

        if let WindowEnd::At(end_time) = end {
            if end_time <= start {
                return Err(SlotError::InvalidInput(format!(
                    "window {}-{} must end after it starts",
                    self.start_time, self.end_time
                )));
            }
        }

        Ok(ParsedWindow {
            weekday,
            start,
            end,
            tz,
        })
    }
}

impl ParsedWindow {
    /// Absolute bounds of this window on the local calendar `date`.
    ///
    /// Returns `None` when a boundary falls in a DST gap and `policy` is `Skip`,
    /// or when DST shifting collapses the window to nothing.
    pub fn bounds_on(
        &self,
        date: NaiveDate,
        policy: DstPolicy,
    ) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let start = local_to_instant(date, self.start, &self.tz, policy)?;
        let end = match self.end {
            WindowEnd::At(time) => local_to_instant(date, time, &self.tz, policy)?,
            WindowEnd::EndOfDay => {
                let next = date.checked_add_days(Days::new(1))?;
                local_to_instant(next, NaiveTime::MIN, &self.tz, policy)?
            }
        };
        (start < end).then_some((start, end))
    }
}

/// Map 0 (Sunday) through 6 (Saturday) to a chrono weekday.
pub fn weekday_from_index(index: u8) -> Result<Weekday> {
    match index {
        0 => Ok(Weekday::Sun),
        1 => Ok(Weekday::Mon),
        2 => Ok(Weekday::Tue),
        3 => Ok(Weekday::Wed),
        4 => Ok(Weekday::Thu),
        5 => Ok(Weekday::Fri),
        6 => Ok(Weekday::Sat),
        other => Err(SlotError::InvalidInput(format!(
            "weekday must be 0-6 (Sunday-Saturday), got {}",
            other
        ))),
    }
}

fn parse_window_end(s: &str) -> Result<WindowEnd> {
    if split_hhmm(s)? == (24, 0) {
        return Ok(WindowEnd::EndOfDay);
    }
    parse_time_of_day(s).map(WindowEnd::At)
}
