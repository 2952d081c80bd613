//! Forecast retrieval: XML days from the web service plus today's scraped entry.

use tracing::{info, instrument};

use crate::cptec::{CptecClient, TodayForecastProvider};
use crate::error::ClimaError;
use crate::models::{City, ForecastResult};
use crate::Result;

/// Number of upcoming days kept from the XML forecast
pub const UPCOMING_DAYS: usize = 3;

/// Combines the XML forecast with a today provider
#[derive(Debug, Clone)]
pub struct ForecastFetcher<P> {
    client: CptecClient,
    today: P,
}

impl<P: TodayForecastProvider> ForecastFetcher<P> {
    pub fn new(client: CptecClient, today: P) -> Self {
        Self { client, today }
    }

    /// Fetch the forecast for a city: today first, then the next 3 days.
    ///
    /// Both calls run sequentially; the first failure aborts the fetch.
    #[instrument(skip(self, city), fields(city = %city.name, id = city.id))]
    pub async fn fetch(&self, city: &City) -> Result<ForecastResult> {
        let mut result = self.client.forecast(city.id).await?;

        if result.forecasts.len() < UPCOMING_DAYS {
            return Err(ClimaError::parse(format!(
                "Expected at least {UPCOMING_DAYS} forecast days for city {}, got {}",
                city.id,
                result.forecasts.len()
            )));
        }
        result.forecasts.truncate(UPCOMING_DAYS);

        let today = self.today.today(city).await?;
        result.forecasts.insert(0, today);

        info!("Forecast ready for {}, {}", result.name, result.state);
        Ok(result)
    }
}
