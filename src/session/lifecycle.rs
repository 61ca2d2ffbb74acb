//! Start, pause, resume and stop transitions over the session clock keys.

use super::clock::{
    KEY_IS_PAUSED, KEY_PAUSE_START, KEY_START_TIME, KEY_TOTAL_PAUSE, SESSION_KEYS, SessionClock,
    compute_elapsed_millis, read_clock,
};
use crate::store::{KeyValueStore, Writes};
use anyhow::{Context, Result, anyhow};
use log::info;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SessionStatus {
    Idle,
    Running { elapsed_ms: u64 },
    Paused { elapsed_ms: u64 },
}

impl SessionStatus {
    pub fn of(clock: &SessionClock, now: i64) -> Self {
        if !clock.is_active() {
            return SessionStatus::Idle;
        }
        let elapsed_ms = compute_elapsed_millis(clock, now);
        if clock.is_paused {
            SessionStatus::Paused { elapsed_ms }
        } else {
            SessionStatus::Running { elapsed_ms }
        }
    }
}

fn load(store: &dyn KeyValueStore) -> Result<SessionClock> {
    read_clock(store).context("Failed to read session state")
}

/// Run `step` against the clock and apply its writes under one store lock,
/// so a guard checked in `step` still holds when the writes land.
fn transition<T>(
    store: &dyn KeyValueStore,
    step: impl FnOnce(&SessionClock) -> Result<(T, Writes)>,
) -> Result<T> {
    let mut step = Some(step);
    let mut outcome = None;

    store
        .update(&SESSION_KEYS, &mut |values| {
            let step = step.take()?;
            match step(&SessionClock::from_values(values)) {
                Ok((out, writes)) => {
                    outcome = Some(Ok(out));
                    Some(writes)
                }
                Err(e) => {
                    outcome = Some(Err(e));
                    None
                }
            }
        })
        .context("Failed to update session state")?;

    outcome.unwrap_or_else(|| Err(anyhow!("Session update did not run")))
}

pub fn start(store: &dyn KeyValueStore, now: i64) -> Result<()> {
    transition(store, |clock| {
        if clock.is_active() {
            anyhow::bail!("A session is already active. Stop it before starting a new one.");
        }
        Ok((
            (),
            vec![
                (KEY_START_TIME, Some(now.to_string())),
                (KEY_IS_PAUSED, Some("false".to_string())),
                (KEY_TOTAL_PAUSE, Some("0".to_string())),
                (KEY_PAUSE_START, None),
            ],
        ))
    })?;

    info!("session started at {}", now);
    Ok(())
}

pub fn pause(store: &dyn KeyValueStore, now: i64) -> Result<()> {
    transition(store, |clock| {
        if !clock.is_active() {
            anyhow::bail!("No active session to pause.");
        }
        if clock.is_paused {
            anyhow::bail!("Session is already paused.");
        }
        Ok((
            (),
            vec![
                (KEY_IS_PAUSED, Some("true".to_string())),
                (KEY_PAUSE_START, Some(now.to_string())),
            ],
        ))
    })?;

    info!("session paused at {}", now);
    Ok(())
}

/// Close the open pause. Returns the length of the pause that was closed.
pub fn resume(store: &dyn KeyValueStore, now: i64) -> Result<i64> {
    let closed = transition(store, |clock| {
        if !clock.is_active() {
            anyhow::bail!("No active session to resume.");
        }
        if !clock.is_paused {
            anyhow::bail!("Session is not paused.");
        }

        let closed = clock.open_pause(now);
        let total_pause = clock.total_pause.saturating_add(closed);
        Ok((
            closed,
            vec![
                (KEY_IS_PAUSED, Some("false".to_string())),
                (KEY_TOTAL_PAUSE, Some(total_pause.to_string())),
                (KEY_PAUSE_START, None),
            ],
        ))
    })?;

    info!("session resumed at {} after {}ms pause", now, closed);
    Ok(closed)
}

/// End the session and clear every clock key. Returns the final active time.
pub fn stop(store: &dyn KeyValueStore, now: i64) -> Result<u64> {
    let elapsed = transition(store, |clock| {
        if !clock.is_active() {
            anyhow::bail!("No active session to stop.");
        }
        let cleared: Writes = SESSION_KEYS.iter().map(|k| (*k, None)).collect();
        Ok((compute_elapsed_millis(clock, now), cleared))
    })?;

    info!("session stopped at {} with {}ms active", now, elapsed);
    Ok(elapsed)
}

pub fn status(store: &dyn KeyValueStore, now: i64) -> Result<SessionStatus> {
    Ok(SessionStatus::of(&load(store)?, now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_full_lifecycle() {
        let store = MemoryStore::new();
        start(&store, 1_000).unwrap();
        pause(&store, 11_000).unwrap();
        assert_eq!(
            status(&store, 50_000).unwrap(),
            SessionStatus::Paused { elapsed_ms: 10_000 }
        );
        assert_eq!(resume(&store, 21_000).unwrap(), 10_000);
        pause(&store, 31_000).unwrap();
        resume(&store, 36_000).unwrap();
        assert_eq!(store.get(KEY_TOTAL_PAUSE).unwrap(), Some("15000".to_string()));
        assert_eq!(store.get(KEY_PAUSE_START).unwrap(), None);

        assert_eq!(stop(&store, 41_000).unwrap(), 25_000);
        assert_eq!(status(&store, 41_000).unwrap(), SessionStatus::Idle);
        for key in SESSION_KEYS {
            assert_eq!(store.get(key).unwrap(), None);
        }
    }

    #[test]
    fn test_start_twice_fails() {
        let store = MemoryStore::new();
        start(&store, 0).unwrap();
        let err = start(&store, 5).unwrap_err();
        assert!(err.to_string().contains("already active"));
    }

    #[test]
    fn test_pause_and_resume_guards() {
        let store = MemoryStore::new();
        assert!(pause(&store, 0).is_err());
        assert!(resume(&store, 0).is_err());
        assert!(stop(&store, 0).is_err());

        start(&store, 0).unwrap();
        assert!(resume(&store, 1).is_err());
        pause(&store, 2).unwrap();
        assert!(pause(&store, 3).is_err());
    }

    #[test]
    fn test_stop_while_paused_excludes_open_pause() {
        let store = MemoryStore::new();
        start(&store, 0).unwrap();
        pause(&store, 4_000).unwrap();
        assert_eq!(stop(&store, 100_000).unwrap(), 4_000);
    }

    #[test]
    fn test_status_serializes_with_tag() {
        let json = serde_json::to_value(SessionStatus::Running { elapsed_ms: 42 }).unwrap();
        assert_eq!(json["status"], "running");
        assert_eq!(json["elapsedMs"], 42);
    }
}
