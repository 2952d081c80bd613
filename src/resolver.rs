//! City resolution
//!
//! Maps the text a user typed to a CPTEC city using the local lookup table.

use std::sync::Arc;
use tracing::debug;

use crate::error::ClimaError;
use crate::models::City;
use crate::normalize::normalize_name;
use crate::store::CityStore;
use crate::Result;

/// Service for resolving chat text into a [`City`]
#[derive(Clone)]
pub struct CityResolver {
    store: Arc<CityStore>,
    normalize_input: bool,
}

impl CityResolver {
    /// Exact-match resolver: the text is looked up as typed.
    pub fn new(store: Arc<CityStore>) -> Self {
        Self {
            store,
            normalize_input: false,
        }
    }

    /// Normalize the text before looking it up.
    #[must_use]
    pub fn with_normalized_input(mut self, normalize_input: bool) -> Self {
        self.normalize_input = normalize_input;
        self
    }

    /// Resolve text to a city. Fails with `NotFound` when no row matches.
    pub fn resolve(&self, text: &str) -> Result<City> {
        let key = if self.normalize_input {
            normalize_name(text)
        } else {
            text.to_string()
        };
        debug!("Resolving city text: {:?}", key);

        let city = self
            .store
            .find_city(&key)?
            .ok_or_else(|| ClimaError::not_found(text))?;

        debug!("Resolved {:?} to {} ({}, {})", text, city.id, city.name, city.state);
        Ok(city)
    }
}
