use crate::OutputFormat;
use crate::config::Config;
use crate::settings::{self, UnitChange};
use crate::store::KeyValueStore;
use crate::sync::{SettingsClient, SettingsSync};
use anyhow::{Context, Result};

/// The remote sync client, when sync is enabled and a token is available.
pub fn sync_client(config: &Config) -> Option<SettingsClient> {
    if !config.sync.enabled {
        return None;
    }
    match config.get_api_token() {
        Some(token) => Some(SettingsClient::new(&config.sync.api_url, &token)),
        None => {
            log::info!("no API token configured, settings stay local");
            None
        }
    }
}

pub fn list(store: &dyn KeyValueStore, format: OutputFormat) -> Result<()> {
    let units = settings::load(store)?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&units).context("Failed to serialize settings")?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            println!("height:      {}", units.height);
            println!("weight:      {}", units.weight);
            println!("water:       {}", units.water);
            println!("temperature: {}", units.temperature);
            println!("language:    {}", units.language);
        }
    }
    Ok(())
}

pub fn set(config: &Config, store: &dyn KeyValueStore, field: &str, unit: &str) -> Result<()> {
    let change = UnitChange::parse(field, unit)?;
    let client = sync_client(config);
    let sync = client.as_ref().map(|c| c as &dyn SettingsSync);

    settings::apply_change(store, sync, change)?;
    println!("✓ {} set to {}", field.trim().to_ascii_lowercase(), unit.trim());
    Ok(())
}
