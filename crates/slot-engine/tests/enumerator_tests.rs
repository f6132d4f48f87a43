//! Tests for window validation, weekly expansion and candidate enumeration.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc, Weekday};
use slot_engine::enumerator::{enumerate_on_date, enumerate_window};
use slot_engine::expander::expand_occurrence_dates;
use slot_engine::window::{weekday_from_index, WindowEnd};
use slot_engine::{AvailabilityWindow, DstPolicy, SlotError, SlotQuery, SlotStep};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn long_ago() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap()
}

fn back_to_back(duration_minutes: u32) -> SlotQuery {
    SlotQuery {
        duration_minutes,
        step: SlotStep::MeetingDuration,
        ..SlotQuery::default()
    }
}

// ── Window validation ───────────────────────────────────────────────────────

#[test]
fn weekday_index_starts_on_sunday() {
    assert_eq!(weekday_from_index(0).unwrap(), Weekday::Sun);
    assert_eq!(weekday_from_index(1).unwrap(), Weekday::Mon);
    assert_eq!(weekday_from_index(6).unwrap(), Weekday::Sat);
    assert!(matches!(weekday_from_index(7), Err(SlotError::InvalidInput(_))));
}

#[test]
fn window_must_end_after_it_starts() {
    let inverted = AvailabilityWindow::new(1, "12:00", "09:00", "UTC");
    assert!(matches!(inverted.parse(), Err(SlotError::InvalidInput(_))));

    let empty = AvailabilityWindow::new(1, "09:00", "09:00", "UTC");
    assert!(matches!(empty.parse(), Err(SlotError::InvalidInput(_))));
}

#[test]
fn twenty_four_hundred_means_end_of_day() {
    let window = AvailabilityWindow::new(5, "22:00", "24:00", "UTC").parse().unwrap();
    assert_eq!(window.end, WindowEnd::EndOfDay);

    let friday = date(2026, 3, 20);
    let (start, end) = window.bounds_on(friday, DstPolicy::default()).unwrap();
    assert_eq!(start, Utc.with_ymd_and_hms(2026, 3, 20, 22, 0, 0).unwrap());
    assert_eq!(end, Utc.with_ymd_and_hms(2026, 3, 21, 0, 0, 0).unwrap());

    // 24:00 is only meaningful as an end.
    let bad = AvailabilityWindow::new(5, "24:00", "24:00", "UTC");
    assert!(matches!(bad.parse(), Err(SlotError::InvalidTime(_))));
}

#[test]
fn window_deserializes_from_camel_case() {
    let json = r#"{"weekday":1,"startTime":"09:00","endTime":"12:00","timezone":"Europe/Berlin"}"#;
    let window: AvailabilityWindow = serde_json::from_str(json).unwrap();
    assert_eq!(window, AvailabilityWindow::new(1, "09:00", "12:00", "Europe/Berlin"));
}

// ── Weekly expansion ────────────────────────────────────────────────────────

#[test]
fn expands_every_matching_weekday_in_range() {
    let monday = AvailabilityWindow::new(1, "09:00", "12:00", "America/New_York")
        .parse()
        .unwrap();

    // Sunday 2026-03-15 + 30 days reaches Monday 2026-04-13 inclusive.
    let dates = expand_occurrence_dates(&monday, date(2026, 3, 15), 30).unwrap();

    assert_eq!(
        dates,
        vec![
            date(2026, 3, 16),
            date(2026, 3, 23),
            date(2026, 3, 30),
            date(2026, 4, 6),
            date(2026, 4, 13),
        ]
    );
}

#[test]
fn today_counts_when_weekday_matches() {
    let sunday = AvailabilityWindow::new(0, "09:00", "12:00", "UTC").parse().unwrap();
    let dates = expand_occurrence_dates(&sunday, date(2026, 3, 15), 8).unwrap();
    assert_eq!(dates, vec![date(2026, 3, 15), date(2026, 3, 22)]);
}

#[test]
fn short_lookahead_can_miss_the_weekday() {
    let monday = AvailabilityWindow::new(1, "09:00", "12:00", "UTC").parse().unwrap();
    assert!(expand_occurrence_dates(&monday, date(2026, 3, 15), 1)
        .unwrap()
        .is_empty());
}

#[test]
fn expansion_crosses_dst_without_drifting() {
    // Spring forward on 2026-03-08 in New York; weekly dates stay on Saturdays.
    let saturday = AvailabilityWindow::new(6, "09:00", "10:00", "America/New_York")
        .parse()
        .unwrap();
    let dates = expand_occurrence_dates(&saturday, date(2026, 3, 1), 21).unwrap();

    assert_eq!(dates.len(), 3);
    assert!(dates.iter().all(|d| d.weekday() == Weekday::Sat));
}

// ── Enumeration ─────────────────────────────────────────────────────────────

#[test]
fn last_slot_may_end_exactly_on_window_end() {
    let window = AvailabilityWindow::new(1, "09:00", "10:00", "UTC").parse().unwrap();
    let slots = enumerate_on_date(&window, date(2026, 3, 16), &back_to_back(20), long_ago());

    assert_eq!(slots.len(), 3);
    assert_eq!(
        slots[2].end,
        Utc.with_ymd_and_hms(2026, 3, 16, 10, 0, 0).unwrap()
    );
}

#[test]
fn step_and_duration_are_independent() {
    let window = AvailabilityWindow::new(1, "09:00", "10:00", "UTC").parse().unwrap();
    let query = SlotQuery {
        duration_minutes: 45,
        step: SlotStep::Minutes(5),
        ..SlotQuery::default()
    };

    let slots = enumerate_on_date(&window, date(2026, 3, 16), &query, long_ago());

    // 09:00, 09:05, 09:10, 09:15
    assert_eq!(slots.len(), 4);
    assert!(slots.iter().all(|s| s.duration_minutes() == 45));
}

#[test]
fn spring_forward_shortens_the_window_in_absolute_time() {
    // Sunday 2026-03-08 01:00-03:00 New York is only one real hour long.
    let window = AvailabilityWindow::new(0, "01:00", "03:00", "America/New_York")
        .parse()
        .unwrap();
    let slots = enumerate_on_date(&window, date(2026, 3, 8), &back_to_back(30), long_ago());

    assert_eq!(slots.len(), 2);
    assert_eq!(
        slots[0].start,
        Utc.with_ymd_and_hms(2026, 3, 8, 6, 0, 0).unwrap()
    );
    assert_eq!(
        slots[1].end,
        Utc.with_ymd_and_hms(2026, 3, 8, 7, 0, 0).unwrap()
    );
}

#[test]
fn boundary_in_dst_gap_follows_policy() {
    // 02:30 does not exist on 2026-03-08 in New York.
    let window = AvailabilityWindow::new(0, "01:00", "02:30", "America/New_York")
        .parse()
        .unwrap();
    let sunday = date(2026, 3, 8);

    let shifted = enumerate_on_date(&window, sunday, &back_to_back(30), long_ago());
    assert_eq!(shifted.len(), 2, "end shifts to 03:00 EDT");

    let skip = SlotQuery {
        dst_policy: DstPolicy::Skip,
        ..back_to_back(30)
    };
    assert!(enumerate_on_date(&window, sunday, &skip, long_ago()).is_empty());
}

#[test]
fn enumerate_window_tags_each_slot_with_its_local_date() {
    let window = AvailabilityWindow::new(3, "16:00", "17:00", "America/Los_Angeles")
        .parse()
        .unwrap();
    let now = Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap();
    let query = SlotQuery {
        lookahead_days: 14,
        ..back_to_back(60)
    };

    let slots = enumerate_window(&window, &query, now).unwrap();

    // Wednesdays 03-18 and 03-25; 16:00 PDT is 23:00 UTC on the same day.
    let dates: Vec<NaiveDate> = slots.iter().map(|(d, _)| *d).collect();
    assert_eq!(dates, vec![date(2026, 3, 18), date(2026, 3, 25)]);
    assert_eq!(
        slots[0].1.start,
        Utc.with_ymd_and_hms(2026, 3, 18, 23, 0, 0).unwrap()
    );
}
