//! Error types and handling for clima-bot

use thiserror::Error;

/// Main error type for clima-bot
#[derive(Error, Debug)]
pub enum ClimaError {
    /// No lookup-table row matches the given text
    #[error("City not found: {0}")]
    NotFound(String),

    /// Transport failure or non-success HTTP status
    #[error("Fetch error: {0}")]
    FetchError(String),

    /// Malformed or unexpected XML
    #[error("Parse error: {0}")]
    ParseError(String),

    /// HTML page does not have the expected structure
    #[error("Scrape error: {0}")]
    ScrapeError(String),

    /// Database read/write failure
    #[error("Store error: {0}")]
    StoreError(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ClimaError {
    /// Create a new not-found error
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a new fetch error
    pub fn fetch<S: Into<String>>(message: S) -> Self {
        Self::FetchError(message.into())
    }

    /// Create a new parse error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::ParseError(message.into())
    }

    /// Create a new scrape error
    pub fn scrape<S: Into<String>>(message: S) -> Self {
        Self::ScrapeError(message.into())
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::ConfigError(message.into())
    }

    /// Reply text shown to the chat user
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ClimaError::NotFound(_) => "Não encontrei este município.".to_string(),
            other => format!("Erro ao obter previsão: {other}"),
        }
    }
}

impl From<reqwest::Error> for ClimaError {
    fn from(err: reqwest::Error) -> Self {
        ClimaError::FetchError(err.to_string())
    }
}

impl From<quick_xml::DeError> for ClimaError {
    fn from(err: quick_xml::DeError) -> Self {
        ClimaError::ParseError(err.to_string())
    }
}

impl From<rusqlite::Error> for ClimaError {
    fn from(err: rusqlite::Error) -> Self {
        ClimaError::StoreError(err.to_string())
    }
}
