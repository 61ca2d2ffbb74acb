//! Periodic elapsed-time notification.
//!
//! Each tick reads a fresh snapshot, so ticks are independent of one another
//! and a stale read only affects the one message built from it.

use super::clock::{ElapsedReading, format_elapsed, read_elapsed};
use crate::notify::Notifier;
use crate::store::KeyValueStore;
use log::{debug, warn};
use std::time::Duration;

pub const FALLBACK_BODY: &str = "Tracking in progress, time unknown";

pub fn notification_body(reading: ElapsedReading) -> String {
    match reading {
        ElapsedReading::Known(ms) => format!("Elapsed {}", format_elapsed(ms)),
        ElapsedReading::Unavailable => FALLBACK_BODY.to_string(),
    }
}

/// One job run: read, compute, emit. Emit failures are logged and dropped.
pub fn tick(
    store: &dyn KeyValueStore,
    notifier: &dyn Notifier,
    title: &str,
    now: i64,
) -> ElapsedReading {
    let reading = read_elapsed(store, now);
    let body = notification_body(reading);
    debug!("tracking tick at {}: {}", now, body);

    if let Err(e) = notifier.emit(title, &body) {
        warn!("failed to emit tracking notification: {:#}", e);
    }

    reading
}

/// Run [`tick`] every `every` until `max_ticks` have run (forever if `None`).
/// The first tick fires immediately. `now` supplies the reference time for
/// each tick.
pub async fn run_periodic<F>(
    store: &dyn KeyValueStore,
    notifier: &dyn Notifier,
    title: &str,
    every: Duration,
    max_ticks: Option<u32>,
    now: F,
) -> u32
where
    F: Fn() -> i64,
{
    let mut interval = tokio::time::interval(every);
    let mut ticks: u32 = 0;
    loop {
        if max_ticks.is_some_and(|max| ticks >= max) {
            break;
        }
        interval.tick().await;
        tick(store, notifier, title, now());
        ticks = ticks.wrapping_add(1);
    }
    ticks
}
