//! CPTEC/INPE integration
//!
//! - `xml`: wire structures of the XML web service
//! - `today`: today's forecast, scraped from the public site

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{debug, info, instrument};

use crate::config::CptecConfig;
use crate::error::ClimaError;
use crate::models::{City, ForecastResult};
use crate::Result;

pub mod today;
pub mod xml;

pub use today::{CptecTodayScraper, TodayForecastProvider};

/// CPTEC XML web service client
#[derive(Debug, Clone)]
pub struct CptecClient {
    client: Client,
    service_base_url: String,
}

impl CptecClient {
    /// Create a new client sharing the given HTTP client
    pub fn new(client: Client, config: &CptecConfig) -> Self {
        Self {
            client,
            service_base_url: config.service_base_url.clone(),
        }
    }

    /// Search CPTEC for cities matching a free-text query
    #[instrument(level = "debug", skip(self))]
    pub async fn search_cities(&self, query: &str) -> Result<Vec<City>> {
        let url = format!(
            "{}/XML/listaCidades?city={}",
            self.service_base_url,
            urlencoding::encode(query)
        );

        let body = get_xml(&self.client, &url).await?;
        let cities = xml::parse_cities(&body)?;

        debug!("CPTEC returned {} candidates for {:?}", cities.len(), query);
        Ok(cities)
    }

    /// Fetch the multi-day XML forecast for a city id
    #[instrument(level = "debug", skip(self))]
    pub async fn forecast(&self, city_id: i64) -> Result<ForecastResult> {
        let url = format!(
            "{}/XML/cidade/{}/previsao.xml",
            self.service_base_url, city_id
        );

        let body = get_xml(&self.client, &url).await?;
        let result = xml::parse_forecast(&body)?;

        info!(
            "Fetched {} forecast days for {}, {}",
            result.forecasts.len(),
            result.name,
            result.state
        );
        Ok(result)
    }
}

/// Build the HTTP client shared by every CPTEC call
pub fn http_client(config: &CptecConfig) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds.into()))
        .user_agent(config.user_agent.clone())
        .build()
        .map_err(|e| ClimaError::config(format!("Failed to create HTTP client: {e}")))
}

/// GET a URL and return the body decoded with the charset the server declared
pub(crate) async fn get_text(client: &Client, url: &str) -> Result<String> {
    Ok(get(client, url).await?.text().await?)
}

/// GET an XML document, decoded per its header or XML declaration
async fn get_xml(client: &Client, url: &str) -> Result<String> {
    let response = get(client, url).await?;
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string);
    let body = response.bytes().await?;
    Ok(xml::decode_document(&body, content_type.as_deref()))
}

async fn get(client: &Client, url: &str) -> Result<Response> {
    debug!("GET {}", url);

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| ClimaError::fetch(format!("Request to {url} failed: {e}")))?;

    if !response.status().is_success() {
        return Err(ClimaError::fetch(format!(
            "CPTEC returned {} for {url}",
            response.status()
        )));
    }

    Ok(response)
}
