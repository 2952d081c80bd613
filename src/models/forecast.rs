//! Forecast models

use serde::{Deserialize, Serialize};

/// One day's prediction
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct Forecast {
    /// Day label as delivered upstream (`YYYY-MM-DD`)
    pub day: String,
    /// CPTEC climate code, e.g. `cl` or `pn`
    pub climate: String,
    /// Free-text description, only present on the scraped entry
    pub description: Option<String>,
    /// Maximum temperature in °C
    pub max: String,
    /// Minimum temperature in °C
    pub min: String,
    /// UV index
    pub uv: String,
}

/// Forecast for one city: today followed by the upcoming days
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ForecastResult {
    /// City name
    pub name: String,
    /// Two-letter state code
    pub state: String,
    /// Ordered forecasts, today first
    pub forecasts: Vec<Forecast>,
}
