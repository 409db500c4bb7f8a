//! Business logic services for WeatherCast

pub mod forecast;

pub use forecast::ForecastService;
