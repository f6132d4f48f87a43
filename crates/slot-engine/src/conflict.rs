//! Detect overlaps between candidate slots and existing bookings.
//!
//! A slot is first expanded by its [`Buffers`], then compared against each
//! booking with the half-open interval test. Adjacent intervals (one ends
//! exactly when the other starts) are NOT conflicts. A booking that does not
//! end after it starts occupies no time and never conflicts.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::booking::ExistingBooking;
use crate::enumerator::TimeSlot;

/// Padding around a slot during which no other booking may start or end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Buffers {
    pub before_minutes: u32,
    pub after_minutes: u32,
}

impl Buffers {
    pub fn new(before_minutes: u32, after_minutes: u32) -> Self {
        Self {
            before_minutes,
            after_minutes,
        }
    }

    /// The interval `[start - before, end + after)`.
    pub fn expand(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> (DateTime<Utc>, DateTime<Utc>) {
        (
            start - Duration::minutes(i64::from(self.before_minutes)),
            end + Duration::minutes(i64::from(self.after_minutes)),
        )
    }
}

/// A booking that collides with a (buffered) slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conflict {
    pub booking: ExistingBooking,
    /// Minutes shared by the buffered slot and the booking.
    pub overlap_minutes: i64,
}

/// Half-open interval intersection: `a_start < b_end && a_end > b_start`.
pub fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && a_end > b_start
}

/// Find every booking that overlaps `slot` once it is expanded by `buffers`.
///
/// The overlap duration is `min(slot_end, booking.end) - max(slot_start, booking.start)`
/// measured on the buffered interval.
pub fn find_conflicts(
    slot: &TimeSlot,
    bookings: &[ExistingBooking],
    buffers: Buffers,
) -> Vec<Conflict> {
    let (start, end) = buffers.expand(slot.start, slot.end);

    bookings
        .iter()
        .filter(|b| b.is_well_formed() && overlaps(start, end, b.start, b.end))
        .map(|b| Conflict {
            booking: b.clone(),
            overlap_minutes: (end.min(b.end) - start.max(b.start)).num_minutes(),
        })
        .collect()
}

/// `true` when no booking overlaps the buffered `slot`.
pub fn is_slot_available(slot: &TimeSlot, bookings: &[ExistingBooking], buffers: Buffers) -> bool {
    let (start, end) = buffers.expand(slot.start, slot.end);
    !bookings
        .iter()
        .any(|b| b.is_well_formed() && overlaps(start, end, b.start, b.end))
}
