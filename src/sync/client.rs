use crate::settings::UnitPreferences;
use crate::sync::models::{UnitsResponse, UpdateUnitsRequest};
use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::blocking::Client;

/// Remote copy of the user's settings. Local state stays the source of truth.
pub trait SettingsSync {
    fn push(&self, units: &UnitPreferences) -> Result<()>;
}

pub struct SettingsClient {
    client: Client,
    base_url: String,
    token: String,
}

impl SettingsClient {
    pub fn new(base_url: &str, token: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    /// Helper for testing to override base URL
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    fn units_url(&self) -> String {
        format!("{}/api/v1/settings/units", self.base_url)
    }

    pub fn update_units(&self, units: &UnitPreferences) -> Result<UnitsResponse> {
        let request_body = UpdateUnitsRequest {
            units,
            updated_at: Utc::now(),
        };

        let response = self
            .client
            .put(self.units_url())
            .bearer_auth(&self.token)
            .json(&request_body)
            .send()
            .context("Failed to push unit settings")?;

        if !response.status().is_success() {
            anyhow::bail!("Settings API error: status {}", response.status());
        }

        response
            .json::<UnitsResponse>()
            .context("Failed to parse settings response")
    }
}

impl SettingsSync for SettingsClient {
    fn push(&self, units: &UnitPreferences) -> Result<()> {
        self.update_units(units).map(|_| ())
    }
}
