//! Body measurements and the daily water log, stored in base units.

use crate::store::KeyValueStore;
use crate::units::convert::{height, water, weight};
use crate::units::{HeightUnit, WaterUnit, WeightUnit};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::{info, warn};
use serde::Serialize;

pub const KEY_HEIGHT_CM: &str = "profile_height_cm";
pub const KEY_WEIGHT_KG: &str = "profile_weight_kg";

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Profile {
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
}

fn parse_number(raw: Option<String>, key: &str) -> Option<f64> {
    let raw = raw?;
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            warn!("ignoring unparsable value {:?} for {}", raw, key);
            None
        }
    }
}

fn ensure_measurement(value: f64, what: &str) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        anyhow::bail!("{} must be a positive number, got {}", what, value);
    }
    Ok(())
}

impl Profile {
    pub fn load(store: &dyn KeyValueStore) -> Result<Self> {
        let mut values = store
            .get_many(&[KEY_HEIGHT_CM, KEY_WEIGHT_KG])
            .context("Failed to read profile")?;

        Ok(Self {
            height_cm: parse_number(values.remove(KEY_HEIGHT_CM).flatten(), KEY_HEIGHT_CM),
            weight_kg: parse_number(values.remove(KEY_WEIGHT_KG).flatten(), KEY_WEIGHT_KG),
        })
    }
}

/// Store a height given in `unit`. Returns the stored value in cm.
pub fn set_height(store: &dyn KeyValueStore, value: f64, unit: HeightUnit) -> Result<f64> {
    ensure_measurement(value, "Height")?;
    let cm = height::to_base(value, unit);
    store
        .set_many(&[(KEY_HEIGHT_CM, cm.to_string())])
        .context("Failed to save height")?;
    info!("profile height set to {}cm", cm);
    Ok(cm)
}

/// Store a weight given in `unit`. Returns the stored value in kg.
pub fn set_weight(store: &dyn KeyValueStore, value: f64, unit: WeightUnit) -> Result<f64> {
    ensure_measurement(value, "Weight")?;
    let kg = weight::to_base(value, unit);
    store
        .set_many(&[(KEY_WEIGHT_KG, kg.to_string())])
        .context("Failed to save weight")?;
    info!("profile weight set to {}kg", kg);
    Ok(kg)
}

pub fn water_key(date: NaiveDate) -> String {
    format!("water_intake_{}", date.format("%Y-%m-%d"))
}

/// Millilitres logged on `date`.
pub fn water_total(store: &dyn KeyValueStore, date: NaiveDate) -> Result<f64> {
    let key = water_key(date);
    let raw = store.get(&key).context("Failed to read water log")?;
    Ok(parse_number(raw, &key).unwrap_or(0.0))
}

/// Add an intake given in `unit` to the day's total. Returns the new total in ml.
pub fn add_water(
    store: &dyn KeyValueStore,
    date: NaiveDate,
    amount: f64,
    unit: WaterUnit,
) -> Result<f64> {
    ensure_measurement(amount, "Water amount")?;
    let added = water::to_base(amount, unit);
    let total = water_total(store, date)? + added;

    let key = water_key(date);
    store
        .set_many(&[(key.as_str(), total.to_string())])
        .context("Failed to save water log")?;
    info!("logged {}ml water on {}, total {}ml", added, date, total);
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    #[test]
    fn test_profile_stores_base_units() {
        let store = MemoryStore::new();
        let cm = set_height(&store, 6.0, HeightUnit::Ft).unwrap();
        let kg = set_weight(&store, 72_500.0, WeightUnit::G).unwrap();

        assert!((cm - 182.88).abs() < 1e-9);
        assert_eq!(kg, 72.5);
        let profile = Profile::load(&store).unwrap();
        assert_eq!(profile.weight_kg, Some(72.5));
        assert!((profile.height_cm.unwrap() - 182.88).abs() < 1e-9);
    }

    #[test]
    fn test_profile_rejects_non_positive() {
        let store = MemoryStore::new();
        assert!(set_height(&store, 0.0, HeightUnit::Cm).is_err());
        assert!(set_weight(&store, -3.0, WeightUnit::Kg).is_err());
        assert!(add_water(&store, day(), f64::NAN, WaterUnit::Ml).is_err());
    }

    #[test]
    fn test_empty_profile() {
        let store = MemoryStore::new();
        assert_eq!(Profile::load(&store).unwrap(), Profile::default());
    }

    #[test]
    fn test_water_log_accumulates_in_ml() {
        let store = MemoryStore::new();
        assert_eq!(water_total(&store, day()).unwrap(), 0.0);

        add_water(&store, day(), 250.0, WaterUnit::Ml).unwrap();
        let total = add_water(&store, day(), 8.0, WaterUnit::FlOz).unwrap();

        // 8 fl oz rounds to 237 ml
        assert_eq!(total, 487.0);
        assert_eq!(store.get("water_intake_2026-03-14").unwrap(), Some("487".to_string()));
    }

    #[test]
    fn test_water_log_is_per_day() {
        let store = MemoryStore::new();
        add_water(&store, day(), 500.0, WaterUnit::Ml).unwrap();
        let next = day().succ_opt().unwrap();
        assert_eq!(water_total(&store, next).unwrap(), 0.0);
    }
}
