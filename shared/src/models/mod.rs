//! Domain models for WeatherCast

mod weather;

pub use weather::*;
