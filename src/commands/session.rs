use crate::OutputFormat;
use crate::config::Config;
use crate::notify::ConsoleNotifier;
use crate::session::clock::{format_elapsed, now_ms};
use crate::session::{SessionStatus, job, lifecycle};
use crate::store::KeyValueStore;
use anyhow::{Context, Result};
use std::time::Duration;

pub fn start(store: &dyn KeyValueStore, now: i64) -> Result<()> {
    lifecycle::start(store, now)?;
    println!("✓ Session started");
    Ok(())
}

pub fn pause(store: &dyn KeyValueStore, now: i64) -> Result<()> {
    lifecycle::pause(store, now)?;
    println!("⏸ Session paused");
    Ok(())
}

pub fn resume(store: &dyn KeyValueStore, now: i64) -> Result<()> {
    let closed = lifecycle::resume(store, now)?;
    println!("▶ Session resumed (paused {})", format_elapsed(closed.max(0) as u64));
    Ok(())
}

pub fn stop(store: &dyn KeyValueStore, now: i64) -> Result<()> {
    let elapsed = lifecycle::stop(store, now)?;
    println!("✓ Session stopped. Active time: {}", format_elapsed(elapsed));
    Ok(())
}

pub fn status(store: &dyn KeyValueStore, now: i64, format: OutputFormat) -> Result<()> {
    let status = lifecycle::status(store, now)?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&status).context("Failed to serialize status")?;
            println!("{}", json);
        }
        OutputFormat::Text => match status {
            SessionStatus::Idle => println!("No active session."),
            SessionStatus::Running { elapsed_ms } => {
                println!("Running: {}", format_elapsed(elapsed_ms))
            }
            SessionStatus::Paused { elapsed_ms } => {
                println!("Paused: {}", format_elapsed(elapsed_ms))
            }
        },
    }

    Ok(())
}

/// Emit the elapsed time every interval until `ticks` have run or Ctrl-C.
pub fn watch(
    config: &Config,
    store: &dyn KeyValueStore,
    interval_secs: Option<u64>,
    ticks: Option<u32>,
    pinned_now: Option<i64>,
) -> Result<()> {
    let secs = interval_secs.unwrap_or(config.tracking.notify_interval_secs);
    if secs == 0 {
        anyhow::bail!("Interval must be greater than 0");
    }
    let title = config.tracking.notification_title.as_str();

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        tokio::select! {
            _ = job::run_periodic(
                store,
                &ConsoleNotifier,
                title,
                Duration::from_secs(secs),
                ticks,
                || pinned_now.unwrap_or_else(now_ms),
            ) => {}
            _ = tokio::signal::ctrl_c() => {
                println!("Stopped watching.");
            }
        }
    });

    Ok(())
}
