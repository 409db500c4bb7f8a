//! HTTP handlers for WeatherCast

mod health;
mod weather;

pub use health::*;
pub use weather::*;
