//! Error types for slot-engine operations.

use thiserror::Error;

use crate::conflict::Conflict;

#[derive(Error, Debug)]
pub enum SlotError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid time of day: {0}")]
    InvalidTime(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Expansion error: {0}")]
    Expansion(String),

    #[error("Slot is no longer available ({} conflicting booking(s))", .conflicts.len())]
    SlotTaken { conflicts: Vec<Conflict> },

    #[error("Host is not accepting bookings")]
    HostUnavailable,
}

pub type Result<T> = std::result::Result<T, SlotError>;
