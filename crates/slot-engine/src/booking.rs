//! Booking store boundary -- turns untrusted JSON into typed engine inputs.
//!
//! Rows coming back from the database or an edge function are not trusted:
//! every field is checked here and anything unexpected becomes a
//! [`SlotError::MalformedResponse`] instead of leaking into slot computation.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};
use crate::window::AvailabilityWindow;

/// A confirmed meeting occupying time. Always `start < end`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingBooking {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ExistingBooking {
    /// # Errors
    /// Returns [`SlotError::InvalidInput`] unless `start < end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start >= end {
            return Err(SlotError::InvalidInput(format!(
                "booking must end after it starts ({} >= {})",
                start.to_rfc3339(),
                end.to_rfc3339()
            )));
        }
        Ok(Self { start, end })
    }

    /// `false` for a booking built without [`ExistingBooking::new`] whose end
    /// is not after its start. Such a booking occupies no time.
    pub fn is_well_formed(&self) -> bool {
        self.start < self.end
    }
}

/// A booking row exactly as the store returns it.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingRecord {
    #[serde(alias = "startTime", alias = "start")]
    pub start_time: Option<String>,
    #[serde(alias = "endTime", alias = "end")]
    pub end_time: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl BookingRecord {
    /// Cancelled bookings no longer occupy time.
    pub fn is_cancelled(&self) -> bool {
        self.status
            .as_deref()
            .map(str::trim)
            .is_some_and(|s| s.eq_ignore_ascii_case("cancelled") || s.eq_ignore_ascii_case("canceled"))
    }
}

impl TryFrom<BookingRecord> for ExistingBooking {
    type Error = SlotError;

    fn try_from(record: BookingRecord) -> Result<Self> {
        let start = record
            .start_time
            .as_deref()
            .ok_or_else(|| SlotError::MalformedResponse("booking is missing start_time".into()))?;
        let end = record
            .end_time
            .as_deref()
            .ok_or_else(|| SlotError::MalformedResponse("booking is missing end_time".into()))?;

        let start = parse_datetime(start).map_err(malformed)?;
        let end = parse_datetime(end).map_err(malformed)?;
        ExistingBooking::new(start, end).map_err(malformed)
    }
}

/// Parse an ISO 8601 datetime string into `DateTime<Utc>`.
///
/// Accepts both RFC 3339 (with timezone offset, e.g., "2026-02-17T14:00:00+00:00")
/// and naive time (e.g., "2026-02-17T14:00:00"), which is interpreted as UTC.
///
/// # Errors
/// Returns [`SlotError::InvalidDatetime`] if neither form matches.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();
    // Try RFC 3339 first (has timezone info).
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    // Fall back to naive datetime interpreted as UTC.
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map(|ndt| ndt.and_utc())
        .map_err(|e| SlotError::InvalidDatetime(format!("'{}': {}", s, e)))
}

/// Parse a JSON array of booking rows, dropping cancelled ones.
///
/// # Errors
/// Returns [`SlotError::MalformedResponse`] if the JSON is not an array of
/// objects, or any active row has a missing or unparseable timestamp or does
/// not end after it starts.
pub fn parse_bookings_json(json: &str) -> Result<Vec<ExistingBooking>> {
    let records: Vec<BookingRecord> = serde_json::from_str(json)
        .map_err(|e| SlotError::MalformedResponse(format!("bookings: {}", e)))?;
    parse_booking_records(records)
}

/// Typed form of [`parse_bookings_json`] for rows that were already deserialized.
pub fn parse_booking_records(records: Vec<BookingRecord>) -> Result<Vec<ExistingBooking>> {
    records
        .into_iter()
        .enumerate()
        .filter(|(_, record)| !record.is_cancelled())
        .map(|(i, record)| {
            ExistingBooking::try_from(record).map_err(|e| match e {
                SlotError::MalformedResponse(msg) => {
                    SlotError::MalformedResponse(format!("booking[{}]: {}", i, msg))
                }
                other => other,
            })
        })
        .collect()
}

/// Parse a JSON array of availability windows and validate each one.
///
/// # Errors
/// Returns [`SlotError::MalformedResponse`] if the JSON has the wrong shape or
/// any window fails validation.
pub fn parse_windows_json(json: &str) -> Result<Vec<AvailabilityWindow>> {
    let windows: Vec<AvailabilityWindow> = serde_json::from_str(json)
        .map_err(|e| SlotError::MalformedResponse(format!("windows: {}", e)))?;

    for (i, window) in windows.iter().enumerate() {
        window
            .parse()
            .map_err(|e| SlotError::MalformedResponse(format!("window[{}]: {}", i, e)))?;
    }

    Ok(windows)
}

fn malformed(e: SlotError) -> SlotError {
    SlotError::MalformedResponse(e.to_string())
}
