//! Daily aggregation of 3-hour forecast samples
//!
//! Samples are bucketed by local calendar date using a fixed UTC offset
//! (a plain shift of the epoch, no DST rules), summarised per day and then
//! turned into advisory tips.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{Advisory, DailyForecast, Sample};
use crate::types::TemperatureRange;

/// Daily rain total that triggers the umbrella advisory
pub const RAIN_TIP_THRESHOLD_MM: f64 = 5.0;

/// Daily maximum that triggers the high temperature advisory
pub const HEAT_TIP_THRESHOLD_C: f64 = 28.0;

/// Daily minimum that triggers the cold advisory
pub const COLD_TIP_THRESHOLD_C: f64 = 0.0;

/// Horizon used when a request does not name one
pub const DEFAULT_HORIZON_DAYS: usize = 3;

/// Running aggregate for one local calendar date
#[derive(Debug, Clone, PartialEq)]
pub struct DaySummary {
    pub date: NaiveDate,
    /// `None` until a sample with a temperature lands on this day
    pub temperature: Option<TemperatureRange>,
    pub rain_mm_sum: f64,
    pub sample_count: usize,
    pub representative_description: Option<String>,
}

impl DaySummary {
    fn new(date: NaiveDate) -> Self {
        Self {
            date,
            temperature: None,
            rain_mm_sum: 0.0,
            sample_count: 0,
            representative_description: None,
        }
    }

    fn add(&mut self, sample: &Sample) {
        if let Some(celsius) = sample.temperature_celsius.filter(|t| t.is_finite()) {
            match self.temperature.as_mut() {
                Some(range) => range.include(celsius),
                None => self.temperature = Some(TemperatureRange::new(celsius)),
            }
        }

        self.rain_mm_sum += sample
            .precipitation_mm_3h
            .filter(|mm| mm.is_finite())
            .unwrap_or(0.0);

        if self.representative_description.is_none() {
            if let Some(description) = sample.description.as_deref().filter(|d| !d.is_empty()) {
                self.representative_description = Some(description.to_string());
            }
        }

        self.sample_count += 1;
    }

    /// Rounded report entry, or `None` when no temperature was ever seen
    pub fn to_forecast(&self) -> Option<DailyForecast> {
        let range = self.temperature?;
        Some(DailyForecast {
            date: self.date,
            temp_min_c: round_one_decimal(range.min_celsius),
            temp_max_c: round_one_decimal(range.max_celsius),
            rain_mm_sum: round_one_decimal(self.rain_mm_sum),
            summary: self.representative_description.clone().unwrap_or_default(),
        })
    }
}

/// Local calendar date of an epoch timestamp shifted by `utc_offset_seconds`
///
/// Returns `None` when the shifted timestamp falls outside the representable
/// date range.
pub fn local_date(epoch_seconds: i64, utc_offset_seconds: i64) -> Option<NaiveDate> {
    let shifted = epoch_seconds.checked_add(utc_offset_seconds)?;
    DateTime::<Utc>::from_timestamp(shifted, 0).map(|instant| instant.date_naive())
}

/// Group samples into per-day summaries, ordered by ascending date
///
/// Samples are visited in input order, so the first non-empty description of
/// a day is the one that sticks.
pub fn summarize_days(samples: &[Sample], utc_offset_seconds: i64) -> Vec<DaySummary> {
    let mut days: BTreeMap<NaiveDate, DaySummary> = BTreeMap::new();

    for sample in samples {
        let Some(date) = local_date(sample.epoch_seconds, utc_offset_seconds) else {
            continue;
        };
        days.entry(date)
            .or_insert_with(|| DaySummary::new(date))
            .add(sample);
    }

    days.into_values().collect()
}

/// Aggregate samples into at most `horizon_days` daily forecast entries
///
/// The horizon selects the leading calendar days first; days inside it that
/// carried no temperature are then dropped, so the result can be shorter
/// than the horizon.
pub fn aggregate_by_day(
    samples: &[Sample],
    utc_offset_seconds: i64,
    horizon_days: usize,
) -> Vec<DailyForecast> {
    summarize_days(samples, utc_offset_seconds)
        .iter()
        .take(horizon_days)
        .filter_map(DaySummary::to_forecast)
        .collect()
}

/// Advisories for a forecast, in fixed order
pub fn derive_advisories(forecast: &[DailyForecast]) -> Vec<Advisory> {
    if forecast.is_empty() {
        return Vec::new();
    }

    let mut advisories = Vec::new();
    if forecast.iter().any(|day| day.rain_mm_sum >= RAIN_TIP_THRESHOLD_MM) {
        advisories.push(Advisory::Rain);
    }
    if forecast.iter().any(|day| day.temp_max_c >= HEAT_TIP_THRESHOLD_C) {
        advisories.push(Advisory::HighTemperature);
    }
    if forecast.iter().any(|day| day.temp_min_c <= COLD_TIP_THRESHOLD_C) {
        advisories.push(Advisory::Cold);
    }
    if advisories.is_empty() {
        advisories.push(Advisory::GoodWeather);
    }

    advisories
}

/// Human readable tips for a forecast
pub fn derive_tips(forecast: &[DailyForecast]) -> Vec<String> {
    derive_advisories(forecast)
        .into_iter()
        .map(|advisory| advisory.message().to_string())
        .collect()
}

/// Round the exact binary value to one decimal, ties to even
///
/// Values too large for `Decimal` are returned unchanged.
fn round_one_decimal(value: f64) -> f64 {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp_with_strategy(1, RoundingStrategy::MidpointNearestEven))
        .and_then(|d| d.to_string().parse().ok())
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // 2024-05-01T00:00:00Z
    const DAY1: i64 = 1_714_521_600;
    const DAY: i64 = 86_400;
    const HOUR: i64 = 3_600;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_two_day_scenario() {
        let samples = vec![
            Sample::new(DAY1 + 9 * HOUR)
                .with_temperature(10.0)
                .with_precipitation(2.0),
            Sample::new(DAY1 + 15 * HOUR)
                .with_temperature(20.0)
                .with_precipitation(4.0),
            Sample::new(DAY1 + DAY + 9 * HOUR).with_temperature(-5.0),
        ];

        let forecast = aggregate_by_day(&samples, 0, 2);

        assert_eq!(forecast.len(), 2);
        assert_eq!(forecast[0].date, date("2024-05-01"));
        assert_eq!(forecast[0].temp_min_c, 10.0);
        assert_eq!(forecast[0].temp_max_c, 20.0);
        assert_eq!(forecast[0].rain_mm_sum, 6.0);
        assert_eq!(forecast[1].date, date("2024-05-02"));
        assert_eq!(forecast[1].temp_min_c, -5.0);
        assert_eq!(forecast[1].temp_max_c, -5.0);
        assert_eq!(forecast[1].rain_mm_sum, 0.0);

        assert_eq!(
            derive_advisories(&forecast),
            vec![Advisory::Rain, Advisory::Cold]
        );
    }

    #[test]
    fn test_empty_samples() {
        let forecast = aggregate_by_day(&[], 0, 3);
        assert!(forecast.is_empty());
        assert!(derive_tips(&forecast).is_empty());
    }

    #[test]
    fn test_days_without_temperature_are_dropped() {
        let samples = vec![
            Sample::new(DAY1 + 3 * HOUR).with_precipitation(1.2),
            Sample::new(DAY1 + 6 * HOUR).with_precipitation(0.8),
            Sample::new(DAY1 + DAY).with_precipitation(3.0),
        ];

        assert!(aggregate_by_day(&samples, 0, 5).is_empty());

        let days = summarize_days(&samples, 0);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].temperature, None);
        assert!((days[0].rain_mm_sum - 2.0).abs() < 1e-9);
        assert_eq!(days[0].sample_count, 2);
    }

    #[test]
    fn test_horizon_counts_days_before_dropping() {
        // Day one has no temperature, so a horizon of two yields only day two.
        let samples = vec![
            Sample::new(DAY1).with_precipitation(1.0),
            Sample::new(DAY1 + DAY).with_temperature(5.0),
            Sample::new(DAY1 + 2 * DAY).with_temperature(6.0),
        ];

        let forecast = aggregate_by_day(&samples, 0, 2);
        assert_eq!(forecast.len(), 1);
        assert_eq!(forecast[0].date, date("2024-05-02"));
    }

    #[test]
    fn test_zero_horizon_is_empty() {
        let samples = vec![Sample::new(DAY1).with_temperature(5.0)];
        assert!(aggregate_by_day(&samples, 0, 0).is_empty());
    }

    #[test]
    fn test_output_sorted_regardless_of_input_order() {
        let samples = vec![
            Sample::new(DAY1 + 2 * DAY).with_temperature(3.0),
            Sample::new(DAY1).with_temperature(1.0),
            Sample::new(DAY1 + DAY).with_temperature(2.0),
        ];

        let dates: Vec<_> = aggregate_by_day(&samples, 0, 3)
            .into_iter()
            .map(|d| d.date)
            .collect();
        assert_eq!(
            dates,
            vec![date("2024-05-01"), date("2024-05-02"), date("2024-05-03")]
        );
    }

    #[test]
    fn test_offset_moves_sample_across_midnight() {
        // 22:00 UTC is already the next day at UTC+3 and still the same day at UTC-5.
        let sample = Sample::new(DAY1 + 22 * HOUR).with_temperature(8.0);

        let east = aggregate_by_day(std::slice::from_ref(&sample), 3 * HOUR, 1);
        let west = aggregate_by_day(std::slice::from_ref(&sample), -5 * HOUR, 1);

        assert_eq!(east[0].date, date("2024-05-02"));
        assert_eq!(west[0].date, date("2024-05-01"));
    }

    #[test]
    fn test_first_non_empty_description_wins() {
        let samples = vec![
            Sample::new(DAY1).with_temperature(1.0).with_description(""),
            Sample::new(DAY1 + 3 * HOUR)
                .with_temperature(2.0)
                .with_description("clear sky"),
        ];
        assert_eq!(aggregate_by_day(&samples, 0, 1)[0].summary, "clear sky");

        let samples = vec![
            Sample::new(DAY1)
                .with_temperature(1.0)
                .with_description("clear sky"),
            Sample::new(DAY1 + 3 * HOUR)
                .with_temperature(2.0)
                .with_description("rain"),
        ];
        assert_eq!(aggregate_by_day(&samples, 0, 1)[0].summary, "clear sky");
    }

    #[test]
    fn test_missing_description_is_empty_summary() {
        let samples = vec![Sample::new(DAY1).with_temperature(1.0)];
        assert_eq!(aggregate_by_day(&samples, 0, 1)[0].summary, "");
    }

    #[test]
    fn test_values_rounded_to_one_decimal() {
        let samples = vec![
            Sample::new(DAY1)
                .with_temperature(12.345)
                .with_precipitation(0.33),
            Sample::new(DAY1 + 3 * HOUR)
                .with_temperature(17.96)
                .with_precipitation(0.33),
        ];

        let day = &aggregate_by_day(&samples, 0, 1)[0];
        assert_eq!(day.temp_min_c, 12.3);
        assert_eq!(day.temp_max_c, 18.0);
        assert_eq!(day.rain_mm_sum, 0.7);
    }

    #[test]
    fn test_rounding_uses_exact_binary_value() {
        // 27.95 and 0.15 are stored just below the midpoint
        let samples = vec![Sample::new(DAY1)
            .with_temperature(27.95)
            .with_precipitation(0.15)];

        let forecast = aggregate_by_day(&samples, 0, 1);
        assert_eq!(forecast[0].temp_max_c, 27.9);
        assert_eq!(forecast[0].rain_mm_sum, 0.1);
        assert_eq!(derive_advisories(&forecast), vec![Advisory::GoodWeather]);
    }

    #[test]
    fn test_rounding_ties_go_to_even() {
        let samples = vec![Sample::new(DAY1)
            .with_temperature(4.85)
            .with_precipitation(0.25)];

        let day = &aggregate_by_day(&samples, 0, 1)[0];
        assert_eq!(day.temp_min_c, 4.8);
        assert_eq!(day.rain_mm_sum, 0.2);
        assert_eq!(round_one_decimal(0.75), 0.8);
        assert_eq!(round_one_decimal(-2.25), -2.2);
    }

    #[test]
    fn test_non_finite_values_ignored() {
        let samples = vec![
            Sample::new(DAY1)
                .with_temperature(f64::NAN)
                .with_precipitation(f64::INFINITY),
            Sample::new(DAY1 + 3 * HOUR).with_temperature(4.0),
        ];

        let day = &aggregate_by_day(&samples, 0, 1)[0];
        assert_eq!(day.temp_min_c, 4.0);
        assert_eq!(day.temp_max_c, 4.0);
        assert_eq!(day.rain_mm_sum, 0.0);
    }

    #[test]
    fn test_out_of_range_timestamp_skipped() {
        let samples = vec![
            Sample::new(i64::MAX).with_temperature(50.0),
            Sample::new(DAY1).with_temperature(5.0),
        ];

        let forecast = aggregate_by_day(&samples, 3 * HOUR, 3);
        assert_eq!(forecast.len(), 1);
        assert_eq!(forecast[0].temp_max_c, 5.0);
    }

    fn entry(min: f64, max: f64, rain: f64) -> DailyForecast {
        DailyForecast {
            date: date("2024-05-01"),
            temp_min_c: min,
            temp_max_c: max,
            rain_mm_sum: rain,
            summary: String::new(),
        }
    }

    #[test]
    fn test_good_weather_when_no_threshold_fires() {
        let tips = derive_tips(&[entry(5.0, 20.0, 4.9)]);
        assert_eq!(tips, vec![Advisory::GoodWeather.message().to_string()]);
    }

    #[test]
    fn test_thresholds_are_inclusive() {
        assert_eq!(
            derive_advisories(&[entry(0.0, 28.0, 5.0)]),
            vec![Advisory::Rain, Advisory::HighTemperature, Advisory::Cold]
        );
    }

    #[test]
    fn test_each_tip_appears_once() {
        let forecast = vec![
            entry(-2.0, 30.0, 7.0),
            entry(-4.0, 31.0, 9.0),
            entry(-1.0, 29.0, 12.0),
        ];
        assert_eq!(derive_tips(&forecast).len(), 3);
    }

    #[test]
    fn test_local_date_edges() {
        assert_eq!(local_date(0, 0), Some(date("1970-01-01")));
        assert_eq!(local_date(0, -1), Some(date("1969-12-31")));
        assert_eq!(local_date(i64::MAX, 1), None);
    }

    proptest! {
        #[test]
        fn prop_aggregate_is_idempotent(
            readings in prop::collection::vec((0i64..10 * DAY, -40.0f64..45.0, 0.0f64..20.0), 0..60),
            offset in -12 * HOUR..=14 * HOUR,
            horizon in 0usize..8
        ) {
            let samples: Vec<Sample> = readings
                .into_iter()
                .map(|(t, temp, rain)| Sample::new(DAY1 + t).with_temperature(temp).with_precipitation(rain))
                .collect();

            prop_assert_eq!(
                aggregate_by_day(&samples, offset, horizon),
                aggregate_by_day(&samples, offset, horizon)
            );
        }
    }
}
