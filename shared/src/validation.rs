//! Validation of forecast request parameters

/// Validate the requested city name and return it trimmed
pub fn validate_city(city: Option<&str>) -> Result<&str, &'static str> {
    match city.map(str::trim) {
        Some(name) if !name.is_empty() => Ok(name),
        _ => Err("Please enter city name, Example: ?city=Vancouver"),
    }
}

/// Parse the `days` request parameter
///
/// Only plain ASCII digit strings are accepted; anything else (absent, signed,
/// fractional, too large) falls back to `default_days`.
pub fn parse_horizon_days(days: Option<&str>, default_days: usize) -> usize {
    days.filter(|d| !d.is_empty() && d.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|d| d.parse().ok())
        .unwrap_or(default_days)
}
