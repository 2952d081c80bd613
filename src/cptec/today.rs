//! Today's forecast
//!
//! The XML service only covers the upcoming days, so today's entry comes
//! from the city page of the CPTEC site. The page is read with fixed
//! selectors; any layout change upstream surfaces as a `ScrapeError`.

use chrono::Local;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::future::Future;
use tracing::{debug, instrument};

use crate::config::CptecConfig;
use crate::error::ClimaError;
use crate::models::{City, Forecast};
use crate::Result;

const ICON_SELECTOR: &str = "img.img-responsive.center-block";
const DESCRIPTION_SELECTOR: &str = "div.col-md-12 > div.d-flex > div.p-2.text-center";
const MAX_SELECTOR: &str = "div.temperaturas span.text-danger";
const MIN_SELECTOR: &str = "div.temperaturas span.text-primary";
const INFO_ROW_SELECTOR: &str = "div.col-md-12 > div.row.align-middle.justify-content-md-center";
const UV_VALUE_SELECTOR: &str = "div.col-md-4 span";
/// The UV block is the third info row of the page
const UV_ROW_INDEX: usize = 2;

/// Source of today's forecast for a city
pub trait TodayForecastProvider {
    fn today(&self, city: &City) -> impl Future<Output = Result<Forecast>> + Send;
}

/// Scrapes today's forecast from `{site}/previsao-tempo/{uf}/{slug}`
#[derive(Debug, Clone)]
pub struct CptecTodayScraper {
    client: Client,
    site_base_url: String,
}

impl CptecTodayScraper {
    pub fn new(client: Client, config: &CptecConfig) -> Self {
        Self {
            client,
            site_base_url: config.site_base_url.clone(),
        }
    }

    /// URL of a city's page
    #[must_use]
    pub fn page_url(&self, city: &City) -> String {
        format!("{}/previsao-tempo/{}", self.site_base_url, city.site_path())
    }
}

impl TodayForecastProvider for CptecTodayScraper {
    #[instrument(level = "debug", skip(self, city), fields(city = %city.name))]
    async fn today(&self, city: &City) -> Result<Forecast> {
        let html = super::get_text(&self.client, &self.page_url(city)).await?;
        let mut forecast = parse_today_html(&html)?;
        forecast.day = Local::now().date_naive().format("%Y-%m-%d").to_string();
        Ok(forecast)
    }
}

/// Extract today's forecast from a CPTEC city page. The `day` field is left empty.
pub fn parse_today_html(html: &str) -> Result<Forecast> {
    let document = Html::parse_document(html);

    let icon_src = document
        .select(&selector(ICON_SELECTOR)?)
        .next()
        .and_then(|img| img.value().attr("src"))
        .ok_or_else(|| ClimaError::scrape("Weather icon not found"))?;
    let climate = climate_from_icon(icon_src)
        .ok_or_else(|| ClimaError::scrape(format!("Unexpected icon path: {icon_src}")))?;

    let description = document
        .select(&selector(DESCRIPTION_SELECTOR)?)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty());

    let max = temperature(&document, MAX_SELECTOR)
        .ok_or_else(|| ClimaError::scrape("Maximum temperature not found"))?;
    let min = temperature(&document, MIN_SELECTOR)
        .ok_or_else(|| ClimaError::scrape("Minimum temperature not found"))?;

    let uv_value = selector(UV_VALUE_SELECTOR)?;
    let uv = document
        .select(&selector(INFO_ROW_SELECTOR)?)
        .nth(UV_ROW_INDEX)
        .and_then(|row| row.select(&uv_value).last())
        .map(element_text)
        .ok_or_else(|| ClimaError::scrape("UV index not found"))?;

    debug!("Scraped today: {} max {} min {} uv {}", climate, max, min, uv);

    Ok(Forecast {
        day: String::new(),
        climate,
        description,
        max,
        min,
        uv,
    })
}

/// `.../icones-grandes/ps_n.png` → `ps`
fn climate_from_icon(src: &str) -> Option<String> {
    let file = src.rsplit('/').next()?;
    let stem = file.split('.').next()?;
    let code = stem.split('_').next()?.trim();
    (!code.is_empty()).then(|| code.to_string())
}

fn temperature(document: &Html, css: &str) -> Option<String> {
    let sel = selector(css).ok()?;
    document
        .select(&sel)
        .next()
        .map(|span| element_text(span).replace('°', "").trim().to_string())
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ClimaError::scrape(format!("Invalid selector {css}: {e}")))
}
