//! WASM bindings for slot-engine.
//!
//! Exposes availability computation, last-moment slot re-checks and display
//! formatting to the booking UI via `wasm-bindgen`. All complex types are
//! passed as JSON strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p slot-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir packages/slot-engine-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/slot_engine_wasm.wasm
//! ```

use serde::{Deserialize, Serialize};
use slot_engine::booking::{parse_booking_records, BookingRecord};
use slot_engine::{AvailabilityWindow, Buffers, SlotQuery, TimeSlot};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

/// Input format for `computeAvailability`, as assembled by the UI.
#[derive(Deserialize)]
struct AvailabilityRequest {
    windows: Vec<AvailabilityWindow>,
    #[serde(default)]
    bookings: Vec<BookingRecord>,
    #[serde(default)]
    query: SlotQuery,
}

/// Input format for a slot passed back from JavaScript.
#[derive(Deserialize)]
struct SlotInput {
    start: String,
    end: String,
}

#[derive(Serialize)]
struct FormattedInstant {
    time: String,
    date: String,
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse_slot_json(json: &str) -> Result<TimeSlot, JsValue> {
    let input: SlotInput = serde_json::from_str(json)
        .map_err(|e| JsValue::from_str(&format!("Invalid slot JSON: {}", e)))?;
    let start = slot_engine::parse_datetime(&input.start).map_err(js_err)?;
    let end = slot_engine::parse_datetime(&input.end).map_err(js_err)?;
    Ok(TimeSlot::new(start, end))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Compute bookable slots and render them for the viewer.
///
/// `request_json` is `{windows, bookings, query}`; `now` is an ISO 8601
/// datetime; `display_timezone` is an IANA name (unknown names degrade to UTC
/// labels). Returns a JSON array of `{date, heading, slots: [{start, end, label}]}`.
#[wasm_bindgen(js_name = "computeAvailability")]
pub fn compute_availability(
    request_json: &str,
    now: &str,
    display_timezone: &str,
) -> Result<String, JsValue> {
    let request: AvailabilityRequest = serde_json::from_str(request_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid request JSON: {}", e)))?;
    let now = slot_engine::parse_datetime(now).map_err(js_err)?;
    let bookings = parse_booking_records(request.bookings).map_err(js_err)?;

    let availability =
        slot_engine::compute_availability(&request.windows, &bookings, &request.query, now)
            .map_err(js_err)?;

    serde_json::to_string(&slot_engine::render(&availability, display_timezone))
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Re-check one slot against a freshly fetched booking list.
///
/// `slot_json` is `{start, end}`; `bookings_json` is an array of booking rows
/// (cancelled rows are ignored).
#[wasm_bindgen(js_name = "isSlotStillAvailable")]
pub fn is_slot_still_available(
    slot_json: &str,
    bookings_json: &str,
    buffer_before_minutes: u32,
    buffer_after_minutes: u32,
) -> Result<bool, JsValue> {
    let slot = parse_slot_json(slot_json)?;
    let bookings = slot_engine::parse_bookings_json(bookings_json).map_err(js_err)?;

    Ok(slot_engine::is_slot_still_available(
        &slot,
        &bookings,
        Buffers::new(buffer_before_minutes, buffer_after_minutes),
    ))
}

/// Time of day in the viewer's timezone, e.g. `"9:00 AM"`.
#[wasm_bindgen(js_name = "formatTime")]
pub fn format_time(instant: &str, timezone: &str) -> Result<String, JsValue> {
    let instant = slot_engine::parse_datetime(instant).map_err(js_err)?;
    Ok(slot_engine::format_time(instant, timezone))
}

/// Full date in the viewer's timezone, e.g. `"Monday, March 16, 2026"`.
#[wasm_bindgen(js_name = "formatDate")]
pub fn format_date(instant: &str, timezone: &str) -> Result<String, JsValue> {
    let instant = slot_engine::parse_datetime(instant).map_err(js_err)?;
    Ok(slot_engine::format_date(instant, timezone))
}

/// Both display strings at once as `{time, date}` JSON.
#[wasm_bindgen(js_name = "formatInstant")]
pub fn format_instant(instant: &str, timezone: &str) -> Result<String, JsValue> {
    let instant = slot_engine::parse_datetime(instant).map_err(js_err)?;
    let formatted = FormattedInstant {
        time: slot_engine::format_time(instant, timezone),
        date: slot_engine::format_date(instant, timezone),
    };
    serde_json::to_string(&formatted)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}
