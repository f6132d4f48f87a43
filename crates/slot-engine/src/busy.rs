//! Merged busy periods for batch conflict checks.
//!
//! Sorts bookings by start time and merges overlapping or adjacent ones into a
//! non-overlapping timeline. Because merged periods are sorted by both start
//! and end, a candidate interval can be checked with one binary search.

use chrono::{DateTime, Utc};

use crate::booking::ExistingBooking;

/// Sorted, non-overlapping busy periods built from a booking list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BusyTimeline {
    periods: Vec<(DateTime<Utc>, DateTime<Utc>)>,
}

impl BusyTimeline {
    pub fn from_bookings(bookings: &[ExistingBooking]) -> Self {
        let mut intervals: Vec<(DateTime<Utc>, DateTime<Utc>)> = bookings
            .iter()
            .filter(|b| b.is_well_formed())
            .map(|b| (b.start, b.end))
            .collect();

        // Sort by start time (then by end time for stability).
        intervals.sort_by_key(|&(start, end)| (start, end));

        let mut periods: Vec<(DateTime<Utc>, DateTime<Utc>)> = Vec::with_capacity(intervals.len());
        for (start, end) in intervals {
            if let Some(last) = periods.last_mut() {
                if start <= last.1 {
                    // Overlapping or adjacent -- extend the current period.
                    last.1 = last.1.max(end);
                    continue;
                }
            }
            periods.push((start, end));
        }

        Self { periods }
    }

    /// Merged periods, sorted by start.
    pub fn periods(&self) -> &[(DateTime<Utc>, DateTime<Utc>)] {
        &self.periods
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// `true` if `[start, end)` intersects any busy period.
    ///
    /// Equivalent to testing every original booking pairwise: the union of
    /// merged half-open periods is exactly the union of the bookings.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        // First period that ends after `start`; every earlier one ends at or before it.
        let idx = self.periods.partition_point(|&(_, busy_end)| busy_end <= start);
        self.periods
            .get(idx)
            .is_some_and(|&(busy_start, _)| busy_start < end)
    }
}
