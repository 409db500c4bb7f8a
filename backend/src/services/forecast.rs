//! Forecast service turning provider data into daily reports

use chrono::{SecondsFormat, Utc};
use shared::{aggregate_by_day, derive_tips, CityInfo, ForecastReport};

use crate::error::AppResult;
use crate::external::weather::{ProviderForecast, WeatherClient};

/// Forecast service for building reports
#[derive(Clone)]
pub struct ForecastService {
    weather_client: WeatherClient,
}

impl ForecastService {
    /// Create a new ForecastService around a configured client
    pub fn new(weather_client: WeatherClient) -> Self {
        Self { weather_client }
    }

    /// Provider forecast for a city, passed through untouched
    pub async fn raw_forecast(&self, city: &str) -> AppResult<String> {
        self.weather_client.fetch_forecast_raw(city).await
    }

    /// Fetch the forecast for a city and summarise the first `horizon_days` days
    pub async fn build_report(&self, city: &str, horizon_days: usize) -> AppResult<ForecastReport> {
        let provider = self.weather_client.fetch_forecast(city).await?;
        let report = assemble_report(city, horizon_days, provider);

        tracing::info!(
            "Built {}-day report for {} with {} days and {} tips",
            horizon_days,
            report.city.name,
            report.forecast.len(),
            report.tips.len()
        );

        Ok(report)
    }
}

/// Aggregate provider data into the report envelope
pub fn assemble_report(
    requested_city: &str,
    horizon_days: usize,
    provider: ProviderForecast,
) -> ForecastReport {
    let forecast = aggregate_by_day(
        &provider.samples,
        provider.utc_offset_seconds,
        horizon_days,
    );
    let tips = derive_tips(&forecast);

    ForecastReport {
        city: CityInfo::new(
            provider
                .city_name
                .unwrap_or_else(|| requested_city.to_string()),
            provider.country.unwrap_or_default(),
        ),
        generated_at_utc: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        horizon_days,
        forecast,
        tips,
    }
}
