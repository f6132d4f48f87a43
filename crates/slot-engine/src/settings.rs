//! Host settings context with change notification.
//!
//! Process-wide flags such as holiday mode live in an explicit [`HostSettings`]
//! value that is shared (usually behind an `Arc`) with whatever needs it.
//! Interested parties subscribe a listener and are told when a value changes.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tracing::debug;

/// A change that was applied to [`HostSettings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsChange {
    HolidayMode(bool),
}

/// Handle returned by [`HostSettings::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(&SettingsChange) + Send + Sync>;

pub struct HostSettings {
    holiday_mode: RwLock<bool>,
    listeners: Mutex<Vec<(SubscriptionId, Listener)>>,
    next_id: AtomicU64,
}

impl HostSettings {
    pub fn new(holiday_mode: bool) -> Self {
        Self {
            holiday_mode: RwLock::new(holiday_mode),
            listeners: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Whether the host has paused all bookings.
    pub fn holiday_mode(&self) -> bool {
        *self
            .holiday_mode
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Set holiday mode, notifying listeners if the value changed.
    ///
    /// Returns `true` when the value changed.
    pub fn set_holiday_mode(&self, enabled: bool) -> bool {
        {
            let mut current = self
                .holiday_mode
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            if *current == enabled {
                return false;
            }
            *current = enabled;
        }

        debug!(enabled, "holiday mode changed");
        self.notify(&SettingsChange::HolidayMode(enabled));
        true
    }

    /// Register a listener for future changes.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&SettingsChange) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let before = listeners.len();
        listeners.retain(|(sub, _)| *sub != id);
        listeners.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn notify(&self, change: &SettingsChange) {
        // Snapshot so listeners can subscribe/unsubscribe without deadlocking.
        let listeners: Vec<Listener> = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();

        for listener in listeners {
            listener(change);
        }
    }
}

impl Default for HostSettings {
    fn default() -> Self {
        Self::new(false)
    }
}

impl fmt::Debug for HostSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostSettings")
            .field("holiday_mode", &self.holiday_mode())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
