use crate::settings::UnitPreferences;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request body for pushing unit preferences
#[derive(Debug, Serialize)]
pub struct UpdateUnitsRequest<'a> {
    #[serde(flatten)]
    pub units: &'a UnitPreferences,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Settings echoed back by the API after an update
#[derive(Debug, Deserialize, Clone)]
pub struct UnitsResponse {
    #[serde(flatten)]
    pub units: UnitPreferences,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<DateTime<Utc>>,
}
