//! # slot-engine
//!
//! Deterministic meeting slot generation for booking pages.
//!
//! Given a host's recurring weekly availability windows, a meeting duration,
//! buffer requirements and the bookings that already exist, the engine lists
//! every future slot that can still be booked, grouped by date. It is pure
//! computation: callers fetch the inputs, pass an explicit "now", and persist
//! whatever the user confirms.
//!
//! ## Modules
//!
//! - [`timezone`] -- Wall-clock times in IANA zones to absolute instants
//! - [`dst`] -- DST gap policies for window boundaries
//! - [`window`] -- Weekly availability windows and their validation
//! - [`expander`] -- Weekly recurrence → concrete local dates
//! - [`enumerator`] -- Fixed-size candidate slots inside each window occurrence
//! - [`conflict`] -- Buffered overlap tests against existing bookings
//! - [`busy`] -- Merged busy timeline for batch conflict checks
//! - [`availability`] -- Composition root and last-moment re-validation
//! - [`format`] -- Display formatting in the viewer's timezone
//! - [`booking`] -- Parsing untrusted booking/window JSON at the boundary
//! - [`settings`] -- Host settings context with change notification
//! - [`query`] -- Query configuration and defaults
//! - [`error`] -- Error types

pub mod availability;
pub mod booking;
pub mod busy;
pub mod conflict;
pub mod dst;
pub mod enumerator;
pub mod error;
pub mod expander;
pub mod format;
pub mod query;
pub mod settings;
pub mod timezone;
pub mod window;

pub use availability::{
    compute_availability, is_slot_still_available, recheck_slot, Availability, AvailabilityEngine,
};
pub use booking::{parse_bookings_json, parse_datetime, parse_windows_json, ExistingBooking};
pub use conflict::{find_conflicts, Buffers, Conflict};
pub use dst::DstPolicy;
pub use enumerator::TimeSlot;
pub use error::SlotError;
pub use format::{date_key, format_date, format_time, render, DayView, SlotView};
pub use query::{SlotQuery, SlotStep};
pub use settings::{HostSettings, SettingsChange, SubscriptionId};
pub use window::AvailabilityWindow;
