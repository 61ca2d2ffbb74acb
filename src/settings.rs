//! Unit preferences: local persistence and the mutation path that forwards
//! changes to the remote settings API.

use crate::store::KeyValueStore;
use crate::sync::SettingsSync;
use crate::units::{HeightUnit, Language, TemperatureUnit, WaterUnit, WeightUnit};
use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

pub const KEY_HEIGHT: &str = "unit_height";
pub const KEY_WEIGHT: &str = "unit_weight";
pub const KEY_WATER: &str = "unit_water";
pub const KEY_TEMPERATURE: &str = "unit_temperature";
pub const KEY_LANGUAGE: &str = "unit_language";

const UNIT_KEYS: [&str; 5] = [
    KEY_HEIGHT,
    KEY_WEIGHT,
    KEY_WATER,
    KEY_TEMPERATURE,
    KEY_LANGUAGE,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitPreferences {
    pub height: HeightUnit,
    pub weight: WeightUnit,
    pub water: WaterUnit,
    pub temperature: TemperatureUnit,
    pub language: Language,
}

/// A single preference update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitChange {
    Height(HeightUnit),
    Weight(WeightUnit),
    Water(WaterUnit),
    Temperature(TemperatureUnit),
    Language(Language),
}

impl UnitChange {
    /// Parse `field` (`height`, `weight`, `water`, `temperature`, `language`)
    /// and its new unit.
    pub fn parse(field: &str, unit: &str) -> Result<Self> {
        let change = match field.trim().to_ascii_lowercase().as_str() {
            "height" => UnitChange::Height(unit.parse()?),
            "weight" => UnitChange::Weight(unit.parse()?),
            "water" => UnitChange::Water(unit.parse()?),
            "temperature" | "temp" => UnitChange::Temperature(unit.parse()?),
            "language" | "lang" => UnitChange::Language(unit.parse()?),
            other => anyhow::bail!(
                "Unknown setting '{}'. Expected height, weight, water, temperature or language",
                other
            ),
        };
        Ok(change)
    }

    fn key_value(self) -> (&'static str, String) {
        match self {
            UnitChange::Height(u) => (KEY_HEIGHT, u.to_string()),
            UnitChange::Weight(u) => (KEY_WEIGHT, u.to_string()),
            UnitChange::Water(u) => (KEY_WATER, u.to_string()),
            UnitChange::Temperature(u) => (KEY_TEMPERATURE, u.to_string()),
            UnitChange::Language(u) => (KEY_LANGUAGE, u.to_string()),
        }
    }
}

fn field<T>(values: &HashMap<String, Option<String>>, key: &str) -> Result<T>
where
    T: FromStr + Default,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match values.get(key).and_then(|v| v.as_deref()) {
        None => Ok(T::default()),
        // A stored unit we cannot parse means the writer is broken; do not guess.
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Stored value for {} is invalid", key)),
    }
}

/// Load preferences. Absent keys take the default unit.
pub fn load(store: &dyn KeyValueStore) -> Result<UnitPreferences> {
    let values = store
        .get_many(&UNIT_KEYS)
        .context("Failed to read unit preferences")?;

    Ok(UnitPreferences {
        height: field(&values, KEY_HEIGHT)?,
        weight: field(&values, KEY_WEIGHT)?,
        water: field(&values, KEY_WATER)?,
        temperature: field(&values, KEY_TEMPERATURE)?,
        language: field(&values, KEY_LANGUAGE)?,
    })
}

pub fn save(store: &dyn KeyValueStore, units: &UnitPreferences) -> Result<()> {
    store
        .set_many(&[
            (KEY_HEIGHT, units.height.to_string()),
            (KEY_WEIGHT, units.weight.to_string()),
            (KEY_WATER, units.water.to_string()),
            (KEY_TEMPERATURE, units.temperature.to_string()),
            (KEY_LANGUAGE, units.language.to_string()),
        ])
        .context("Failed to save unit preferences")
}

/// Persist `change` locally, then push the full preference set to `sync`.
/// A failed push is logged and otherwise ignored; it is not retried. If some
/// other stored unit is corrupt the change is still saved, but nothing is
/// pushed and the corrupt key is reported.
pub fn apply_change(
    store: &dyn KeyValueStore,
    sync: Option<&dyn SettingsSync>,
    change: UnitChange,
) -> Result<UnitPreferences> {
    // Written before loading, so a change to a corrupt key repairs it.
    let (key, value) = change.key_value();
    store
        .set_many(&[(key, value.clone())])
        .context("Failed to save unit preference")?;
    info!("set {} = {}", key, value);

    let units = load(store)?;

    if let Some(sync) = sync {
        if let Err(e) = sync.push(&units) {
            warn!("settings sync failed, keeping local value: {:#}", e);
        }
    }

    Ok(units)
}
