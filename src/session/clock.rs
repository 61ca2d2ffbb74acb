//! Net active time of a tracked activity.
//!
//! The session clock is four independent store keys written by the lifecycle
//! controller. Any of them may be missing when read (a concurrent writer may
//! be halfway through an update), so every field has a default and the
//! computation itself cannot fail.

use crate::store::KeyValueStore;
use log::warn;
use serde::Serialize;
use std::collections::HashMap;

pub const KEY_START_TIME: &str = "activity_start_time";
pub const KEY_IS_PAUSED: &str = "activity_is_paused";
pub const KEY_PAUSE_START: &str = "activity_pause_start";
pub const KEY_TOTAL_PAUSE: &str = "activity_total_pause";

pub const SESSION_KEYS: [&str; 4] = [
    KEY_START_TIME,
    KEY_IS_PAUSED,
    KEY_PAUSE_START,
    KEY_TOTAL_PAUSE,
];

/// Point-in-time snapshot of the session clock. Timestamps are milliseconds
/// since the Unix epoch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionClock {
    pub start_time: Option<i64>,
    pub is_paused: bool,
    /// Only meaningful while `is_paused` is set.
    pub pause_start: Option<i64>,
    /// Sum of closed pauses; the open pause is never included.
    pub total_pause: i64,
}

impl SessionClock {
    /// Build a snapshot from a `get_many` result. Missing or unparsable
    /// values fall back to the field default.
    pub fn from_values(values: &HashMap<String, Option<String>>) -> Self {
        Self {
            start_time: parse_non_negative(values, KEY_START_TIME),
            is_paused: parse_field(values, KEY_IS_PAUSED).unwrap_or(false),
            pause_start: parse_field(values, KEY_PAUSE_START),
            total_pause: parse_non_negative(values, KEY_TOTAL_PAUSE).unwrap_or(0),
        }
    }

    pub fn is_active(&self) -> bool {
        self.start_time.is_some()
    }

    /// Length of the pause currently open at `now`, zero when running.
    pub fn open_pause(&self, now: i64) -> i64 {
        match (self.is_paused, self.pause_start) {
            (true, Some(pause_start)) => now.saturating_sub(pause_start).max(0),
            // Paused without a pause start should not happen; count nothing.
            _ => 0,
        }
    }
}

fn parse_field<T: std::str::FromStr>(values: &HashMap<String, Option<String>>, key: &str) -> Option<T> {
    let raw = values.get(key)?.as_deref()?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("ignoring unparsable value {:?} for {}", raw, key);
            None
        }
    }
}

/// Timestamps before the epoch and negative durations are never written by
/// the lifecycle, so they are treated like any other unparsable value.
fn parse_non_negative(values: &HashMap<String, Option<String>>, key: &str) -> Option<i64> {
    let value: i64 = parse_field(values, key)?;
    if value < 0 {
        warn!("ignoring negative value {} for {}", value, key);
        return None;
    }
    Some(value)
}

pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Active milliseconds between session start and `now`, minus every pause.
/// Never negative, zero when no session is active.
pub fn compute_elapsed_millis(clock: &SessionClock, now: i64) -> u64 {
    let Some(start_time) = clock.start_time else {
        return 0;
    };

    let total_elapsed = now.saturating_sub(start_time);
    let total_pause = clock.total_pause.saturating_add(clock.open_pause(now));

    total_elapsed.saturating_sub(total_pause).max(0) as u64
}

/// `MM:SS`, truncated to whole seconds. Minutes do not roll over into hours.
pub fn format_elapsed(millis: u64) -> String {
    let secs = millis / 1000;
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Outcome of reading the clock from a store and computing elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElapsedReading {
    Known(u64),
    /// The store could not be read; the caller shows a generic message.
    Unavailable,
}

impl ElapsedReading {
    pub fn millis(self) -> Option<u64> {
        match self {
            ElapsedReading::Known(ms) => Some(ms),
            ElapsedReading::Unavailable => None,
        }
    }
}

pub fn read_clock(store: &dyn KeyValueStore) -> Result<SessionClock, crate::error::StoreError> {
    let values = store.get_many(&SESSION_KEYS)?;
    Ok(SessionClock::from_values(&values))
}

pub fn read_elapsed(store: &dyn KeyValueStore, now: i64) -> ElapsedReading {
    match read_clock(store) {
        Ok(clock) => ElapsedReading::Known(compute_elapsed_millis(&clock, now)),
        Err(e) => {
            warn!("could not read session clock: {}", e);
            ElapsedReading::Unavailable
        }
    }
}
