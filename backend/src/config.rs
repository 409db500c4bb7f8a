//! Configuration management for WeatherCast
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with WEATHERCAST_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::DEFAULT_HORIZON_DAYS;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Upstream forecast provider configuration
    pub weather: WeatherConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    /// Base URL of the OpenWeatherMap 2.5 API
    pub api_endpoint: String,

    /// OpenWeatherMap API key, checked when a request needs it
    pub api_key: Option<String>,

    /// Upstream request timeout in seconds
    pub timeout_secs: u64,

    /// Report horizon when a request has no usable `days` value
    pub default_horizon_days: usize,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("WEATHERCAST_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let mut builder = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 7071)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("weather.api_endpoint", "http://api.openweathermap.org/data/2.5")?
            .set_default("weather.timeout_secs", 10)?
            .set_default("weather.default_horizon_days", DEFAULT_HORIZON_DAYS as u64)?;

        // The conventional OpenWeatherMap variable still works as a fallback
        if let Ok(api_key) = std::env::var("OPENWEATHER_API_KEY") {
            builder = builder.set_default("weather.api_key", api_key)?;
        }

        let config = builder
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (WEATHERCAST_ prefix)
            .add_source(
                Environment::with_prefix("WEATHERCAST")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 7071,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl WeatherConfig {
    /// The configured API key, treating an empty value as unset
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.trim().is_empty())
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_endpoint: "http://api.openweathermap.org/data/2.5".to_string(),
            api_key: None,
            timeout_secs: 10,
            default_horizon_days: DEFAULT_HORIZON_DAYS,
        }
    }
}
