//! Offline lookup-table builder
//!
//! Walks the reference list of municipality names, asks CPTEC for matching
//! cities and stores every candidate. The first error stops the batch;
//! rows inserted before it are kept.

use std::sync::Arc;
use tracing::{info, instrument};

use crate::cptec::CptecClient;
use crate::normalize::normalize_name;
use crate::store::CityStore;
use crate::Result;

/// Outcome of a successful build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuildReport {
    /// Reference names queried
    pub names_processed: usize,
    /// Rows written to the lookup table
    pub cities_inserted: usize,
}

/// Populates the `cptec` lookup table from the `ibge` reference list
pub struct LookupTableBuilder {
    client: CptecClient,
    store: Arc<CityStore>,
}

impl LookupTableBuilder {
    pub fn new(client: CptecClient, store: Arc<CityStore>) -> Self {
        Self { client, store }
    }

    /// Run the batch: one search per reference name, every candidate inserted.
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<BuildReport> {
        let names = self.store.reference_names()?;
        info!("Building lookup table from {} reference names", names.len());

        let mut report = BuildReport::default();

        for name in &names {
            let query = normalize_name(name);
            info!("Searching CPTEC for {:?}", query);

            let cities = self.client.search_cities(&query).await?;
            for city in &cities {
                self.store.insert_city(city)?;
            }

            report.names_processed += 1;
            report.cities_inserted += cities.len();
        }

        info!(
            "Lookup table built: {} names queried, {} cities inserted",
            report.names_processed, report.cities_inserted
        );
        Ok(report)
    }
}
