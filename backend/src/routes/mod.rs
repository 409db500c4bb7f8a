//! Route definitions for WeatherCast

use axum::{routing::get, Router};

use crate::{handlers, AppState};

/// Create API routes
///
/// Endpoint names match the ones existing front ends already call.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Provider forecast, passed through untouched
        .route("/GetWeather", get(handlers::get_weather))
        // Aggregated daily report with tips
        .route("/WeatherReport", get(handlers::weather_report))
}
