use crate::profile;
use crate::settings;
use crate::store::KeyValueStore;
use crate::units::{WaterUnit, format_water};
use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate};

fn local_date(now: i64) -> Result<NaiveDate> {
    let utc = DateTime::from_timestamp_millis(now).context("Timestamp out of range")?;
    Ok(utc.with_timezone(&Local).date_naive())
}

/// `unit` defaults to the preferred water unit.
pub fn add(store: &dyn KeyValueStore, amount: f64, unit: Option<&str>, now: i64) -> Result<()> {
    let preferred = settings::load(store)?.water;
    let unit: WaterUnit = match unit {
        Some(u) => u.parse()?,
        None => preferred,
    };
    let date = local_date(now)?;

    let total = profile::add_water(store, date, amount, unit)?;
    println!(
        "✓ Logged {} {}. Today: {}",
        amount,
        unit,
        format_water(total, preferred)
    );
    Ok(())
}

pub fn today(store: &dyn KeyValueStore, now: i64) -> Result<()> {
    let preferred = settings::load(store)?.water;
    let date = local_date(now)?;
    let total = profile::water_total(store, date)?;
    println!("Today ({}): {}", date, format_water(total, preferred));
    Ok(())
}
