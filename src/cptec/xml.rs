//! CPTEC XML structures for deserialization
//!
//! The web service answers in ISO-8859-1, declared in the XML prolog and
//! usually not in the `Content-Type` header. Bodies go through
//! [`decode_document`] before any parsing.

use encoding_rs::{Encoding, UTF_8};
use quick_xml::Reader;
use quick_xml::de::from_str;
use quick_xml::events::Event;
use serde::Deserialize;
use tracing::debug;

use crate::error::ClimaError;
use crate::models::{City, Forecast, ForecastResult};
use crate::Result;

/// `listaCidades` response
#[derive(Debug, Deserialize)]
pub struct CptecCities {
    #[serde(rename = "cidade", default)]
    pub cities: Vec<CptecCity>,
}

#[derive(Debug, Deserialize)]
pub struct CptecCity {
    #[serde(rename = "id")]
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "uf")]
    pub state: String,
}

/// `cidade/{id}/previsao.xml` response
#[derive(Debug, Deserialize)]
pub struct CptecForecast {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "uf")]
    pub state: String,
    #[serde(rename = "atualizacao")]
    pub updated_at: Option<String>,
    #[serde(rename = "previsao", default)]
    pub days: Vec<CptecDay>,
}

#[derive(Debug, Deserialize)]
pub struct CptecDay {
    #[serde(rename = "dia")]
    pub day: String,
    #[serde(rename = "tempo")]
    pub climate: String,
    #[serde(rename = "maxima")]
    pub max: String,
    #[serde(rename = "minima")]
    pub min: String,
    #[serde(rename = "iuv")]
    pub uv: String,
}

impl From<CptecCity> for City {
    fn from(city: CptecCity) -> Self {
        City {
            id: city.id,
            name: city.name.trim().to_string(),
            state: city.state.trim().to_string(),
        }
    }
}

impl From<CptecDay> for Forecast {
    fn from(day: CptecDay) -> Self {
        Forecast {
            day: day.day,
            climate: day.climate.trim().to_string(),
            description: None,
            max: day.max,
            min: day.min,
            uv: day.uv,
        }
    }
}

impl From<CptecForecast> for ForecastResult {
    fn from(forecast: CptecForecast) -> Self {
        ForecastResult {
            name: forecast.name,
            state: forecast.state,
            forecasts: forecast.days.into_iter().map(Forecast::from).collect(),
        }
    }
}

/// Decode a raw XML body to text.
///
/// A `charset` in the `Content-Type` header wins, then the `encoding` of the
/// XML declaration; UTF-8 otherwise. Unknown labels fall through to the next source.
pub fn decode_document(body: &[u8], content_type: Option<&str>) -> String {
    let encoding = content_type
        .and_then(header_charset)
        .or_else(|| declared_encoding(body))
        .unwrap_or(UTF_8);

    let (text, used, had_errors) = encoding.decode(body);
    if had_errors {
        debug!("Body is not valid {}, invalid bytes replaced", used.name());
    }
    text.into_owned()
}

fn header_charset(content_type: &str) -> Option<&'static Encoding> {
    content_type
        .split(';')
        .skip(1)
        .filter_map(|param| param.split_once('='))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("charset"))
        .and_then(|(_, value)| Encoding::for_label(value.trim().trim_matches('"').as_bytes()))
}

fn declared_encoding(body: &[u8]) -> Option<&'static Encoding> {
    let mut reader = Reader::from_reader(body);
    let mut buf = Vec::new();
    match reader.read_event_into(&mut buf).ok()? {
        Event::Decl(decl) => {
            let label = decl.encoding()?.ok()?;
            Encoding::for_label(&label)
        }
        _ => None,
    }
}

/// Parse a `listaCidades` document
pub fn parse_cities(xml_content: &str) -> Result<Vec<City>> {
    let cities: CptecCities = from_str(xml_content)
        .map_err(|e| ClimaError::parse(format!("Failed to parse CPTEC city list: {e}")))?;
    Ok(cities.cities.into_iter().map(City::from).collect())
}

/// Parse a `previsao.xml` document
pub fn parse_forecast(xml_content: &str) -> Result<ForecastResult> {
    let forecast: CptecForecast = from_str(xml_content)
        .map_err(|e| ClimaError::parse(format!("Failed to parse CPTEC forecast: {e}")))?;
    debug!(
        "Forecast for {} issued {}",
        forecast.name,
        forecast.updated_at.as_deref().unwrap_or("at an unknown date")
    );
    Ok(forecast.into())
}
