//! HTTP handlers for forecast endpoints

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use shared::{parse_horizon_days, validate_city, ForecastReport};

use crate::error::{AppError, AppResult};
use crate::AppState;

/// Query parameters for forecast endpoints
///
/// `days` is kept as text so that anything other than a plain number falls
/// back to the default horizon instead of rejecting the request.
#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    pub city: Option<String>,
    pub days: Option<String>,
}

impl ForecastQuery {
    fn city(&self) -> AppResult<&str> {
        validate_city(self.city.as_deref()).map_err(|message| AppError::Validation {
            field: "city".to_string(),
            message: message.to_string(),
        })
    }
}

/// Get the provider forecast for a city, verbatim
pub async fn get_weather(
    State(state): State<AppState>,
    Query(query): Query<ForecastQuery>,
) -> AppResult<impl IntoResponse> {
    let city = query.city()?;
    let body = state.forecast.raw_forecast(city).await?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body))
}

/// Get the aggregated daily report for a city
pub async fn weather_report(
    State(state): State<AppState>,
    Query(query): Query<ForecastQuery>,
) -> AppResult<Json<ForecastReport>> {
    let city = query.city()?;
    let horizon_days = parse_horizon_days(
        query.days.as_deref(),
        state.config.weather.default_horizon_days,
    );
    let report = state.forecast.build_report(city, horizon_days).await?;
    Ok(Json(report))
}
