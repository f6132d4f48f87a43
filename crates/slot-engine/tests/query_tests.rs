//! Tests for query configuration defaults and deserialization.

use slot_engine::{DstPolicy, SlotError, SlotQuery, SlotStep};

#[test]
fn defaults() {
    let q = SlotQuery::default();
    assert_eq!(q.duration_minutes, 30);
    assert_eq!(q.lookahead_days, 30);
    assert_eq!(q.lead_time_minutes, 60);
    assert_eq!(q.step, SlotStep::Minutes(15));
    assert_eq!(q.step_minutes(), 15);
    assert_eq!(q.buffers().before_minutes, 0);
    assert_eq!(q.buffers().after_minutes, 0);
    assert_eq!(q.dst_policy, DstPolicy::ShiftForward);
    assert!(q.validate().is_ok());
}

#[test]
fn partial_toml_keeps_defaults() {
    let q: SlotQuery = toml::from_str(
        r#"
        duration_minutes = 45
        buffer_after_minutes = 10
        step = "meeting_duration"
        dst_policy = "skip"
        "#,
    )
    .unwrap();

    assert_eq!(q.duration_minutes, 45);
    assert_eq!(q.buffer_after_minutes, 10);
    assert_eq!(q.step_minutes(), 45);
    assert_eq!(q.dst_policy, DstPolicy::Skip);
    assert_eq!(q.lookahead_days, 30);
}

#[test]
fn fixed_step_from_json() {
    let q: SlotQuery = serde_json::from_str(r#"{"step": {"minutes": 10}}"#).unwrap();
    assert_eq!(q.step, SlotStep::Minutes(10));
}

#[test]
fn zero_step_is_rejected() {
    let q = SlotQuery {
        step: SlotStep::Minutes(0),
        ..SlotQuery::default()
    };
    assert!(matches!(q.validate(), Err(SlotError::InvalidInput(_))));
}
