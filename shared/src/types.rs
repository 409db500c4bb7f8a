//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// Running min/max of the temperatures seen for one day
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TemperatureRange {
    pub min_celsius: f64,
    pub max_celsius: f64,
}

impl TemperatureRange {
    pub fn new(celsius: f64) -> Self {
        Self {
            min_celsius: celsius,
            max_celsius: celsius,
        }
    }

    /// Widen the range so that it covers `celsius`
    pub fn include(&mut self, celsius: f64) {
        self.min_celsius = self.min_celsius.min(celsius);
        self.max_celsius = self.max_celsius.max(celsius);
    }
}

/// Location details echoed back in a report
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CityInfo {
    pub name: String,
    pub country: String,
}

impl CityInfo {
    pub fn new(name: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperature_range_widens() {
        let mut range = TemperatureRange::new(10.0);
        range.include(20.0);
        range.include(-3.5);
        range.include(4.0);

        assert_eq!(range.min_celsius, -3.5);
        assert_eq!(range.max_celsius, 20.0);
    }
}
