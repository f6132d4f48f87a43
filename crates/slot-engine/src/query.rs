//! Query configuration for slot computation.
//!
//! Every field has a default, so a `SlotQuery` can be deserialized from a
//! partial TOML or JSON document and only the fields a host cares about need
//! to be spelled out.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::conflict::Buffers;
use crate::dst::DstPolicy;
use crate::error::{Result, SlotError};

pub const DEFAULT_DURATION_MINUTES: u32 = 30;
pub const DEFAULT_LOOKAHEAD_DAYS: u32 = 30;
pub const DEFAULT_LEAD_TIME_MINUTES: u32 = 60;
pub const DEFAULT_STEP_MINUTES: u32 = 15;
pub const MAX_LOOKAHEAD_DAYS: u32 = 366;

/// Distance between consecutive candidate slot starts inside a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotStep {
    /// A fixed number of minutes.
    Minutes(u32),
    /// Back-to-back slots: the step equals the meeting duration.
    MeetingDuration,
}

impl Default for SlotStep {
    fn default() -> Self {
        SlotStep::Minutes(DEFAULT_STEP_MINUTES)
    }
}

impl SlotStep {
    pub fn resolve(self, duration_minutes: u32) -> u32 {
        match self {
            SlotStep::Minutes(m) => m,
            SlotStep::MeetingDuration => duration_minutes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotQuery {
    pub duration_minutes: u32,
    pub buffer_before_minutes: u32,
    pub buffer_after_minutes: u32,
    pub lookahead_days: u32,
    /// Minimum delay between "now" and the earliest bookable start.
    pub lead_time_minutes: u32,
    pub step: SlotStep,
    pub dst_policy: DstPolicy,
}

impl Default for SlotQuery {
    fn default() -> Self {
        Self {
            duration_minutes: DEFAULT_DURATION_MINUTES,
            buffer_before_minutes: 0,
            buffer_after_minutes: 0,
            lookahead_days: DEFAULT_LOOKAHEAD_DAYS,
            lead_time_minutes: DEFAULT_LEAD_TIME_MINUTES,
            step: SlotStep::default(),
            dst_policy: DstPolicy::default(),
        }
    }
}

impl SlotQuery {
    pub fn with_duration(duration_minutes: u32) -> Self {
        Self {
            duration_minutes,
            ..Self::default()
        }
    }

    /// Reject queries that would produce meaningless slot boundaries.
    ///
    /// # Errors
    /// Returns [`SlotError::InvalidInput`] for a zero duration, a zero step,
    /// or a lookahead outside `1..=366` days.
    pub fn validate(&self) -> Result<()> {
        if self.duration_minutes == 0 {
            return Err(SlotError::InvalidInput(
                "duration_minutes must be positive".to_string(),
            ));
        }
        if self.step_minutes() == 0 {
            return Err(SlotError::InvalidInput("step must be positive".to_string()));
        }
        if self.lookahead_days == 0 || self.lookahead_days > MAX_LOOKAHEAD_DAYS {
            return Err(SlotError::InvalidInput(format!(
                "lookahead_days must be between 1 and {}, got {}",
                MAX_LOOKAHEAD_DAYS, self.lookahead_days
            )));
        }
        Ok(())
    }

    pub fn buffers(&self) -> Buffers {
        Buffers::new(self.buffer_before_minutes, self.buffer_after_minutes)
    }

    pub fn step_minutes(&self) -> u32 {
        self.step.resolve(self.duration_minutes)
    }

    pub fn duration(&self) -> Duration {
        Duration::minutes(i64::from(self.duration_minutes))
    }

    pub fn step_duration(&self) -> Duration {
        Duration::minutes(i64::from(self.step_minutes()))
    }

    pub fn lead_time(&self) -> Duration {
        Duration::minutes(i64::from(self.lead_time_minutes))
    }
}
