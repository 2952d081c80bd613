//! Data models for clima-bot
//!
//! This module contains the core domain models organized by concern:
//! - City: a municipality in CPTEC's id namespace
//! - Forecast: one day's prediction and the per-city result
//! - Climate: the static climate-code table (description + emoji)

pub mod city;
pub mod climate;
pub mod forecast;

// Re-export all public types for convenient access
pub use city::City;
pub use climate::{ClimateCondition, climate_condition};
pub use forecast::{Forecast, ForecastResult};
