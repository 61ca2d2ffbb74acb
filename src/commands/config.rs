use crate::config::{self, Config};
use anyhow::{Context, Result};
use std::path::Path;

pub fn list(config: &Config) -> Result<()> {
    let toml_str = toml::to_string_pretty(config).context("Failed to serialize config")?;
    println!("{}", toml_str);
    Ok(())
}

pub fn get(key: &str, config: &Config) -> Result<()> {
    let value = serde_json::to_value(config).context("Failed to serialize config")?;

    // Dot notation: "tracking.notify_interval_secs"
    let mut current = &value;
    for part in key.split('.') {
        current = current
            .get(part)
            .with_context(|| format!("Key not found: {}", part))?;
    }

    match current {
        serde_json::Value::String(s) => println!("{}", s),
        v => println!("{}", v),
    }

    Ok(())
}

/// Interpret a CLI value as a TOML scalar: bool, integer, float, else string.
fn parse_scalar(value: &str) -> toml::Value {
    if let Ok(b) = value.parse::<bool>() {
        toml::Value::Boolean(b)
    } else if let Ok(i) = value.parse::<i64>() {
        toml::Value::Integer(i)
    } else if let Ok(f) = value.parse::<f64>() {
        toml::Value::Float(f)
    } else {
        toml::Value::String(value.to_string())
    }
}

/// Set `key` in the TOML file at `path`, creating tables as needed. The result
/// must still load as a valid config or nothing is written.
pub fn set_in_file(path: &Path, key: &str, value: &str) -> Result<()> {
    let raw = if path.exists() {
        std::fs::read_to_string(path).context("Failed to read config file")?
    } else {
        String::new()
    };
    let mut doc: toml::Table = raw.parse().context("Failed to parse config file")?;

    let parts: Vec<&str> = key.split('.').collect();
    let Some((last, tables)) = parts.split_last() else {
        anyhow::bail!("Empty config key");
    };

    let mut table = &mut doc;
    for part in tables {
        table = table
            .entry(part.to_string())
            .or_insert(toml::Value::Table(toml::Table::new()))
            .as_table_mut()
            .with_context(|| format!("{} is not a table", part))?;
    }
    table.insert(last.to_string(), parse_scalar(value));

    let updated = toml::to_string_pretty(&doc).context("Failed to serialize config")?;
    let parsed: Config = toml::from_str(&updated).context("Value does not fit the config")?;
    parsed.validate()?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, updated).context("Failed to write config file")?;
    Ok(())
}

pub fn set(key: &str, value: &str) -> Result<()> {
    let path = config::config_path()?;
    set_in_file(&path, key, value)?;
    println!("✓ {} = {}", key, value);
    Ok(())
}
