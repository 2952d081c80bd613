//! Configuration management for clima-bot
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::ClimaError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for clima-bot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClimaConfig {
    /// Telegram bot settings
    #[serde(default)]
    pub telegram: TelegramConfig,
    /// CPTEC endpoints and HTTP client settings
    #[serde(default)]
    pub cptec: CptecConfig,
    /// Local SQLite store
    #[serde(default)]
    pub store: StoreConfig,
    /// City lookup behaviour
    #[serde(default)]
    pub lookup: LookupConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Telegram bot settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot token issued by BotFather (only needed by `serve`)
    pub token: Option<String>,
    /// Long-poll timeout in seconds
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_seconds: u32,
}

/// CPTEC endpoints and HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CptecConfig {
    /// Base URL of the XML web service
    #[serde(default = "default_service_base_url")]
    pub service_base_url: String,
    /// Base URL of the public site scraped for today's forecast
    #[serde(default = "default_site_base_url")]
    pub site_base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_cptec_timeout")]
    pub timeout_seconds: u32,
    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Local SQLite store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path of the SQLite database file
    #[serde(default = "default_store_path")]
    pub path: String,
}

/// City lookup behaviour
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LookupConfig {
    /// Normalize the chat payload before looking it up
    #[serde(default)]
    pub normalize_input: bool,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_poll_timeout() -> u32 {
    10
}

fn default_service_base_url() -> String {
    "http://servicos.cptec.inpe.br".to_string()
}

fn default_site_base_url() -> String {
    "https://www.cptec.inpe.br".to_string()
}

fn default_cptec_timeout() -> u32 {
    30
}

fn default_user_agent() -> String {
    format!("clima-bot/{}", crate::VERSION)
}

fn default_store_path() -> String {
    "./cities.db".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: None,
            poll_timeout_seconds: default_poll_timeout(),
        }
    }
}

impl Default for CptecConfig {
    fn default() -> Self {
        Self {
            service_base_url: default_service_base_url(),
            site_base_url: default_site_base_url(),
            timeout_seconds: default_cptec_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl ClimaConfig {
    /// Load configuration from the given file (or the default locations) and the environment
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path()
                .filter(|path| path.exists())
                .unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // CLIMA_TELEGRAM__TOKEN, CLIMA_STORE__PATH, ...
        builder = builder.add_source(
            Environment::with_prefix("CLIMA")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: ClimaConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("clima-bot").join("config.toml"))
    }

    /// Apply default values to empty configuration fields
    pub fn apply_defaults(&mut self) {
        if self.telegram.poll_timeout_seconds == 0 {
            self.telegram.poll_timeout_seconds = default_poll_timeout();
        }
        if self.cptec.service_base_url.is_empty() {
            self.cptec.service_base_url = default_service_base_url();
        }
        if self.cptec.site_base_url.is_empty() {
            self.cptec.site_base_url = default_site_base_url();
        }
        if self.cptec.timeout_seconds == 0 {
            self.cptec.timeout_seconds = default_cptec_timeout();
        }
        if self.cptec.user_agent.is_empty() {
            self.cptec.user_agent = default_user_agent();
        }
        if self.store.path.is_empty() {
            self.store.path = default_store_path();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        // trailing slashes would double up when joining paths
        trim_trailing_slash(&mut self.cptec.service_base_url);
        trim_trailing_slash(&mut self.cptec.site_base_url);
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Return the Telegram token, failing when it is missing or empty
    pub fn telegram_token(&self) -> Result<String> {
        match self.telegram.token.as_deref().map(str::trim) {
            Some(token) if !token.is_empty() => Ok(token.to_string()),
            _ => Err(ClimaError::config(
                "Telegram token is missing. Set telegram.token or CLIMA_TELEGRAM__TOKEN.",
            )
            .into()),
        }
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.cptec.timeout_seconds > 300 {
            return Err(ClimaError::config("CPTEC timeout cannot exceed 300 seconds").into());
        }

        if self.telegram.poll_timeout_seconds > 300 {
            return Err(
                ClimaError::config("Telegram poll timeout cannot exceed 300 seconds").into(),
            );
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(ClimaError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(ClimaError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("service_base_url", &self.cptec.service_base_url),
            ("site_base_url", &self.cptec.site_base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ClimaError::config(format!(
                    "CPTEC {name} must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}

fn trim_trailing_slash(url: &mut String) {
    while url.ends_with('/') {
        url.pop();
    }
}
