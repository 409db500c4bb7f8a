//! Weather data models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::CityInfo;

/// One 3-hour forecast reading from the upstream provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Sample {
    /// Start of the interval, seconds since the Unix epoch (UTC)
    pub epoch_seconds: i64,
    pub temperature_celsius: Option<f64>,
    /// Precipitation volume for the preceding 3 hours
    pub precipitation_mm_3h: Option<f64>,
    pub description: Option<String>,
}

impl Sample {
    pub fn new(epoch_seconds: i64) -> Self {
        Self {
            epoch_seconds,
            ..Default::default()
        }
    }

    pub fn with_temperature(mut self, celsius: f64) -> Self {
        self.temperature_celsius = Some(celsius);
        self
    }

    pub fn with_precipitation(mut self, mm: f64) -> Self {
        self.precipitation_mm_3h = Some(mm);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Daily forecast entry as published in a report
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub temp_min_c: f64,
    pub temp_max_c: f64,
    pub rain_mm_sum: f64,
    /// Representative description, empty when none was reported
    pub summary: String,
}

/// Aggregated forecast report for a city
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastReport {
    pub city: CityInfo,
    /// ISO 8601 timestamp with a trailing `Z`, second precision
    pub generated_at_utc: String,
    pub horizon_days: usize,
    pub forecast: Vec<DailyForecast>,
    pub tips: Vec<String>,
}

/// Advisories that can be attached to a report
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Advisory {
    Rain,
    HighTemperature,
    Cold,
    GoodWeather,
}

impl Advisory {
    pub fn message(&self) -> &'static str {
        match self {
            Advisory::Rain => "Rain possible, take an umbrella with you",
            Advisory::HighTemperature => {
                "High temperatures expected, stay hydrated and avoid the midday sun"
            }
            Advisory::Cold => "Freezing temperatures expected, dress warmly",
            Advisory::GoodWeather => "Good weather, go out!",
        }
    }
}

impl std::fmt::Display for Advisory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}
