//! Tests for the host settings context.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use slot_engine::{HostSettings, SettingsChange};

#[test]
fn listeners_see_changes() {
    let settings = HostSettings::default();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&seen);
    settings.subscribe(move |change| sink.lock().unwrap().push(*change));

    assert!(settings.set_holiday_mode(true));
    assert!(settings.holiday_mode());
    assert!(settings.set_holiday_mode(false));

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            SettingsChange::HolidayMode(true),
            SettingsChange::HolidayMode(false)
        ]
    );
}

#[test]
fn setting_the_same_value_does_not_notify() {
    let settings = HostSettings::new(true);
    let calls = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&calls);
    settings.subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    assert!(!settings.set_holiday_mode(true));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn unsubscribed_listeners_stop_hearing() {
    let settings = HostSettings::default();
    let calls = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&calls);
    let id = settings.subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    assert_eq!(settings.subscriber_count(), 1);

    settings.set_holiday_mode(true);
    assert!(settings.unsubscribe(id));
    assert!(!settings.unsubscribe(id), "second unsubscribe is a no-op");
    settings.set_holiday_mode(false);

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(settings.subscriber_count(), 0);
}

#[test]
fn listener_may_read_settings_while_notified() {
    let settings = Arc::new(HostSettings::default());
    let observed = Arc::new(Mutex::new(None));

    let (reader, sink) = (Arc::clone(&settings), Arc::clone(&observed));
    settings.subscribe(move |_| {
        *sink.lock().unwrap() = Some(reader.holiday_mode());
    });

    settings.set_holiday_mode(true);
    assert_eq!(*observed.lock().unwrap(), Some(true));
}

#[test]
fn shared_across_threads() {
    let settings = Arc::new(HostSettings::default());
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    settings.subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let settings = Arc::clone(&settings);
            std::thread::spawn(move || settings.set_holiday_mode(true))
        })
        .collect();
    let changed = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|changed| *changed)
        .count();

    assert_eq!(changed, 1, "exactly one thread flips the flag");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
