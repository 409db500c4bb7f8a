//! Weather API client for fetching forecast data
//!
//! Integrates with the OpenWeatherMap 5 day / 3 hour forecast API

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use shared::Sample;

use crate::config::WeatherConfig;
use crate::error::{AppError, AppResult};

/// Environment variable operators are told about when no key is configured
pub const API_KEY_VARIABLE: &str = "OPENWEATHER_API_KEY";

/// Weather API client
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

/// Forecast samples for one location, as reported by the provider
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderForecast {
    pub city_name: Option<String>,
    pub country: Option<String>,
    /// Fixed offset of the location from UTC
    pub utc_offset_seconds: i64,
    pub samples: Vec<Sample>,
}

/// OpenWeatherMap API response for forecast
///
/// Every field is optional and a field of the wrong type reads as absent.
#[derive(Debug, Deserialize)]
struct OWMForecastResponse {
    #[serde(default, deserialize_with = "lenient")]
    city: Option<OWMCity>,
    #[serde(default, deserialize_with = "lenient")]
    list: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct OWMCity {
    #[serde(default, deserialize_with = "lenient")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    country: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    timezone: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OWMForecastItem {
    #[serde(default, deserialize_with = "lenient")]
    dt: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    main: Option<OWMMain>,
    #[serde(default, deserialize_with = "lenient")]
    weather: Option<Vec<Value>>,
    #[serde(default, deserialize_with = "lenient")]
    rain: Option<OWMForecastRain>,
}

#[derive(Debug, Deserialize)]
struct OWMMain {
    #[serde(default, deserialize_with = "lenient")]
    temp: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OWMForecastRain {
    #[serde(rename = "3h", default, deserialize_with = "lenient")]
    three_hour: Option<f64>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

fn whole_seconds(value: f64) -> Option<i64> {
    value.is_finite().then(|| value.floor() as i64)
}

impl WeatherClient {
    /// Create a new WeatherClient from configuration
    pub fn new(config: &WeatherConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: config.api_key().map(str::to_string),
            base_url: config.api_endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the forecast for a city and return the provider's body verbatim
    pub async fn fetch_forecast_raw(&self, city: &str) -> AppResult<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Configuration(API_KEY_VARIABLE.to_string()))?;

        tracing::debug!("Requesting forecast for {}", city);

        let response = self
            .client
            .get(format!("{}/forecast", self.base_url))
            .query(&[("q", city), ("appid", api_key), ("units", "metric")])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::Upstream(e.without_url().to_string()))?;

        response
            .text()
            .await
            .map_err(|e| AppError::Upstream(e.without_url().to_string()))
    }

    /// Fetch and parse the forecast for a city
    pub async fn fetch_forecast(&self, city: &str) -> AppResult<ProviderForecast> {
        let body = self.fetch_forecast_raw(city).await?;
        let forecast = parse_forecast(&body)?;

        tracing::debug!(
            "Received {} forecast samples for {}",
            forecast.samples.len(),
            city
        );

        Ok(forecast)
    }
}

/// Convert an OpenWeatherMap forecast body to our format
///
/// Entries without a usable `dt` are skipped; all other missing or mistyped
/// fields are treated as absent.
pub fn parse_forecast(body: &str) -> AppResult<ProviderForecast> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| AppError::Upstream(format!("Failed to parse forecast response: {}", e)))?;

    if !value.is_object() {
        return Err(AppError::Upstream(
            "Failed to parse forecast response: expected a JSON object".to_string(),
        ));
    }

    let data: OWMForecastResponse = serde_json::from_value(value)
        .map_err(|e| AppError::Upstream(format!("Failed to parse forecast response: {}", e)))?;

    let (city_name, country, utc_offset_seconds) = match data.city {
        Some(city) => (
            city.name,
            city.country,
            city.timezone.and_then(whole_seconds).unwrap_or(0),
        ),
        None => (None, None, 0),
    };

    let samples = data
        .list
        .unwrap_or_default()
        .into_iter()
        .filter_map(|entry| serde_json::from_value::<OWMForecastItem>(entry).ok())
        .filter_map(|item| {
            let epoch_seconds = item.dt.and_then(whole_seconds)?;
            let description = item
                .weather
                .as_ref()
                .and_then(|w| w.first())
                .and_then(|w| w.get("description"))
                .and_then(Value::as_str)
                .map(str::to_string);

            Some(Sample {
                epoch_seconds,
                temperature_celsius: item.main.and_then(|m| m.temp),
                precipitation_mm_3h: item.rain.and_then(|r| r.three_hour),
                description,
            })
        })
        .collect();

    Ok(ProviderForecast {
        city_name,
        country,
        utc_offset_seconds,
        samples,
    })
}
