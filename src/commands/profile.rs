use crate::profile::{self, Profile};
use crate::settings;
use crate::store::KeyValueStore;
use crate::units::{format_height, format_weight};
use anyhow::Result;

pub fn show(store: &dyn KeyValueStore) -> Result<()> {
    let units = settings::load(store)?;
    let profile = Profile::load(store)?;

    let height = profile
        .height_cm
        .map(|cm| format_height(cm, units.height))
        .unwrap_or_else(|| "not set".to_string());
    let weight = profile
        .weight_kg
        .map(|kg| format_weight(kg, units.weight))
        .unwrap_or_else(|| "not set".to_string());

    println!("Height: {}", height);
    println!("Weight: {}", weight);
    Ok(())
}

/// `unit` defaults to the preferred height unit.
pub fn set_height(store: &dyn KeyValueStore, value: f64, unit: Option<&str>) -> Result<()> {
    let unit = match unit {
        Some(u) => u.parse()?,
        None => settings::load(store)?.height,
    };
    let cm = profile::set_height(store, value, unit)?;
    println!("✓ Height set to {}", format_height(cm, unit));
    Ok(())
}

/// `unit` defaults to the preferred weight unit.
pub fn set_weight(store: &dyn KeyValueStore, value: f64, unit: Option<&str>) -> Result<()> {
    let unit = match unit {
        Some(u) => u.parse()?,
        None => settings::load(store)?.weight,
    };
    let kg = profile::set_weight(store, value, unit)?;
    println!("✓ Weight set to {}", format_weight(kg, unit));
    Ok(())
}
