use anyhow::{Context, Result};
use config::{Config as ConfigBuilder, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::path::PathBuf;

pub const APP_DIR: &str = ".healthtrack";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub tracking: TrackingConfig,
    #[serde(default)]
    pub state: StateConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SyncConfig {
    /// Push settings changes to the remote API
    #[serde(default = "default_sync_enabled")]
    pub enabled: bool,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    pub token: Option<String>, // Legacy; moved to the keyring on load
}

fn default_sync_enabled() -> bool {
    true
}

fn default_api_url() -> String {
    "https://api.healthtrack.app".to_string()
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            enabled: default_sync_enabled(),
            api_url: default_api_url(),
            token: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TrackingConfig {
    #[serde(default = "default_notify_interval")]
    pub notify_interval_secs: u64,
    #[serde(default = "default_notification_title")]
    pub notification_title: String,
}

fn default_notify_interval() -> u64 {
    60
}

fn default_notification_title() -> String {
    "Activity in progress".to_string()
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            notify_interval_secs: default_notify_interval(),
            notification_title: default_notification_title(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct StateConfig {
    /// Optional override for state directory (for testing)
    pub state_dir_override: Option<PathBuf>,
}

impl SyncConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        let url = reqwest::Url::parse(&self.api_url)
            .with_context(|| format!("Invalid sync.api_url '{}'", self.api_url))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            anyhow::bail!("sync.api_url must be http or https, got '{}'", url.scheme());
        }
        Ok(())
    }
}

impl TrackingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.notify_interval_secs == 0 {
            anyhow::bail!("Notification interval must be greater than 0");
        }
        if self.notification_title.trim().is_empty() {
            anyhow::bail!("Notification title must not be empty");
        }
        Ok(())
    }
}

impl Config {
    /// Get the API token from keyring or config (legacy)
    pub fn get_api_token(&self) -> Option<String> {
        if let Ok(Some(token)) = crate::keyring::get_api_token() {
            return Some(token);
        }
        self.sync.token.clone()
    }

    /// Validate all configuration
    pub fn validate(&self) -> Result<()> {
        self.sync.validate()?;
        self.tracking.validate()?;
        Ok(())
    }

    /// Migrate plain-text token to keyring
    pub fn migrate_credentials(&mut self) -> Result<bool> {
        let mut migrated = false;

        if let Some(token) = &self.sync.token {
            let expected = crate::keyring::normalize_token(token)?.to_string();
            crate::keyring::store_api_token(&expected)
                .context("Failed to store API token in keyring")?;

            // Only drop the file copy once the keyring can hand it back
            let stored = crate::keyring::get_api_token()
                .context("API token not readable from keyring after storing")?;
            if stored.as_deref() != Some(expected.as_str()) {
                anyhow::bail!("Keyring returned a different API token than was stored");
            }

            self.sync.token = None;
            migrated = true;
        }

        Ok(migrated)
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(home::home_dir()
        .context("Could not find home directory")?
        .join(APP_DIR)
        .join("config.toml"))
}

pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Config> {
    let loader = ConfigBuilder::builder()
        .add_source(File::from(path.as_ref()).format(FileFormat::Toml))
        .build()
        .context("Failed to build config loader")?;

    loader
        .try_deserialize()
        .context("Failed to parse config file")
}

pub fn load() -> Result<Config> {
    let config_path = config_path()?;

    let mut config = load_from_path(&config_path)?;

    config.validate()?;

    // The keyring may be unavailable (headless CI); keep the file token then
    match config.migrate_credentials() {
        Ok(true) => {
            log::info!("migrated API token to secure storage");
            save_to_path(&config, &config_path)?;
        }
        Ok(false) => {}
        Err(e) => log::warn!("could not migrate API token to keyring: {:#}", e),
    }

    Ok(config)
}

pub fn save_to_path<P: AsRef<Path>>(config: &Config, path: P) -> Result<()> {
    let toml_string = toml::to_string_pretty(config).context("Failed to serialize config")?;

    std::fs::write(path.as_ref(), toml_string).context("Failed to write config file")?;

    Ok(())
}
