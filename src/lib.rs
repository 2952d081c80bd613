//! `clima-bot` - CPTEC weather forecasts for Brazilian cities over Telegram
//!
//! This library resolves city names against a local lookup table, fetches
//! CPTEC/INPE forecasts (XML service plus today's scraped entry) and renders
//! them as chat replies. It also builds the lookup table offline.

pub mod bot;
pub mod builder;
pub mod config;
pub mod cptec;
pub mod error;
pub mod fetcher;
pub mod format;
pub mod logging;
pub mod models;
pub mod normalize;
pub mod resolver;
pub mod store;

// Re-export core types for public API
pub use bot::{CptecReplyService, Reply, ReplyService, extract_payload};
pub use builder::{BuildReport, LookupTableBuilder};
pub use config::ClimaConfig;
pub use cptec::{CptecClient, CptecTodayScraper, TodayForecastProvider};
pub use error::ClimaError;
pub use fetcher::ForecastFetcher;
pub use format::{forecast_text, friendly_climate};
pub use models::{City, Forecast, ForecastResult};
pub use normalize::{normalize_name, slugify};
pub use resolver::CityResolver;
pub use store::CityStore;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, ClimaError>;
