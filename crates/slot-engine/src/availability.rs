//! Availability computation -- the composition root of the engine.
//!
//! Expands every availability window over the lookahead, drops candidates whose
//! buffered interval overlaps an existing booking, and groups what is left by
//! local calendar date. Days with no bookable slot are omitted entirely.
//!
//! Every call is pure: the same windows, bookings, query and `now` always give
//! the same [`Availability`].

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::debug;

use crate::booking::ExistingBooking;
use crate::busy::BusyTimeline;
use crate::conflict::{self, Buffers};
use crate::enumerator::{enumerate_window, TimeSlot};
use crate::error::{Result, SlotError};
use crate::query::SlotQuery;
use crate::settings::HostSettings;
use crate::window::{AvailabilityWindow, ParsedWindow};

/// Bookable slots per local date (the window's timezone), ascending by date.
/// Serializes with `"yyyy-MM-dd"` keys.
pub type Availability = BTreeMap<NaiveDate, Vec<TimeSlot>>;

/// Compute every bookable slot within the query's lookahead.
///
/// Slots from several windows on the same date are merged and sorted by start;
/// identical slots produced by overlapping windows appear once.
///
/// # Errors
/// Returns [`SlotError::InvalidInput`] for an invalid query or window, plus
/// [`SlotError::InvalidTime`] / [`SlotError::InvalidTimezone`] for malformed
/// window fields.
pub fn compute_availability(
    windows: &[AvailabilityWindow],
    bookings: &[ExistingBooking],
    query: &SlotQuery,
    now: DateTime<Utc>,
) -> Result<Availability> {
    query.validate()?;
    let parsed = windows
        .iter()
        .map(AvailabilityWindow::parse)
        .collect::<Result<Vec<ParsedWindow>>>()?;

    let timeline = BusyTimeline::from_bookings(bookings);
    let buffers = query.buffers();

    let mut days = Availability::new();
    let mut candidates = 0usize;
    let mut conflicted = 0usize;

    for window in &parsed {
        for (date, slot) in enumerate_window(window, query, now)? {
            candidates += 1;
            let (start, end) = buffers.expand(slot.start, slot.end);
            if timeline.overlaps(start, end) {
                conflicted += 1;
                continue;
            }
            days.entry(date).or_default().push(slot);
        }
    }

    for slots in days.values_mut() {
        slots.sort_by_key(|s| (s.start, s.end));
        slots.dedup();
    }

    debug!(
        windows = parsed.len(),
        bookings = bookings.len(),
        candidates,
        conflicted,
        days = days.len(),
        "computed availability"
    );

    Ok(days)
}

/// Last-moment re-validation of a single slot.
///
/// Uses the same overlap test as [`compute_availability`]. `fresh_bookings`
/// must be refetched right before calling; a stale list makes the check meaningless.
pub fn is_slot_still_available(
    slot: &TimeSlot,
    fresh_bookings: &[ExistingBooking],
    buffers: Buffers,
) -> bool {
    conflict::is_slot_available(slot, fresh_bookings, buffers)
}

/// Strict re-validation used immediately before confirming a booking.
///
/// # Errors
/// - [`SlotError::InvalidInput`] if the query is invalid, the slot does not have
///   the query's duration, or it starts within the lead time.
/// - [`SlotError::SlotTaken`] with the conflicting bookings if it overlaps any.
pub fn recheck_slot(
    slot: &TimeSlot,
    fresh_bookings: &[ExistingBooking],
    query: &SlotQuery,
    now: DateTime<Utc>,
) -> Result<()> {
    query.validate()?;

    if slot.duration_minutes() != i64::from(query.duration_minutes) {
        return Err(SlotError::InvalidInput(format!(
            "slot lasts {} minutes, expected {}",
            slot.duration_minutes(),
            query.duration_minutes
        )));
    }
    if slot.start <= now + query.lead_time() {
        return Err(SlotError::InvalidInput(format!(
            "slot at {} starts within the {}-minute lead time",
            slot.start.to_rfc3339(),
            query.lead_time_minutes
        )));
    }

    let conflicts = conflict::find_conflicts(slot, fresh_bookings, query.buffers());
    if !conflicts.is_empty() {
        debug!(
            start = %slot.start,
            conflicts = conflicts.len(),
            "slot taken since it was offered"
        );
        return Err(SlotError::SlotTaken { conflicts });
    }
    Ok(())
}

/// Availability queries scoped to one host's [`HostSettings`].
#[derive(Debug, Clone, Default)]
pub struct AvailabilityEngine {
    settings: Arc<HostSettings>,
}

impl AvailabilityEngine {
    pub fn new(settings: Arc<HostSettings>) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Arc<HostSettings> {
        &self.settings
    }

    /// Like [`compute_availability`], but empty while the host is on holiday.
    ///
    /// # Errors
    /// Same as [`compute_availability`]; the query is validated even on holiday.
    pub fn available_slots(
        &self,
        windows: &[AvailabilityWindow],
        bookings: &[ExistingBooking],
        query: &SlotQuery,
        now: DateTime<Utc>,
    ) -> Result<Availability> {
        if self.settings.holiday_mode() {
            query.validate()?;
            debug!("holiday mode on, no slots offered");
            return Ok(Availability::new());
        }
        compute_availability(windows, bookings, query, now)
    }

    /// Like [`recheck_slot`], but refuses every slot while the host is on holiday.
    ///
    /// # Errors
    /// [`SlotError::HostUnavailable`] in holiday mode, otherwise as [`recheck_slot`].
    pub fn recheck(
        &self,
        slot: &TimeSlot,
        fresh_bookings: &[ExistingBooking],
        query: &SlotQuery,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if self.settings.holiday_mode() {
            return Err(SlotError::HostUnavailable);
        }
        recheck_slot(slot, fresh_bookings, query, now)
    }
}
