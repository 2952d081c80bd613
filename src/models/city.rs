//! City model for CPTEC municipalities

use serde::{Deserialize, Serialize};

use crate::normalize::{normalize_name, slugify};

/// A municipality in the CPTEC id namespace
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct City {
    /// CPTEC city id
    pub id: i64,
    /// City name as returned by CPTEC
    pub name: String,
    /// Two-letter state code (UF)
    pub state: String,
}

impl City {
    /// Create a new city
    #[must_use]
    pub fn new(id: i64, name: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            state: state.into(),
        }
    }

    /// Key under which this city is stored in the lookup table
    #[must_use]
    pub fn lookup_key(&self) -> String {
        normalize_name(&self.name)
    }

    /// Path of this city's page on the CPTEC site, e.g. `sp/sao-paulo`
    #[must_use]
    pub fn site_path(&self) -> String {
        format!("{}/{}", self.state.to_lowercase(), slugify(&self.name))
    }
}
