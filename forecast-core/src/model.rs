use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::UpstreamError;

/// Temperatures below this are considered cold.
const COLD_BELOW: i64 = 45;

/// Temperatures above this are considered hot.
const HOT_ABOVE: i64 = 75;

/// A latitude/longitude pair. No range validation is done; values are passed
/// to the upstream service as they are.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// Result of the point lookup: where to fetch the hourly forecast from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointResource {
    pub forecast_hourly_url: String,
}

/// One upstream forecast time slice.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPeriod {
    pub temperature: i64,
    pub temperature_unit: String,
    pub short_forecast: String,
}

/// How a temperature feels, bucketed by fixed thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemperatureFeel {
    Cold,
    Moderate,
    Hot,
}

impl TemperatureFeel {
    /// Both thresholds are inclusive-Moderate: 45 and 75 are `Moderate`.
    pub fn classify(temperature: i64) -> Self {
        if temperature < COLD_BELOW {
            TemperatureFeel::Cold
        } else if temperature > HOT_ABOVE {
            TemperatureFeel::Hot
        } else {
            TemperatureFeel::Moderate
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureFeel::Cold => "Cold",
            TemperatureFeel::Moderate => "Moderate",
            TemperatureFeel::Hot => "Hot",
        }
    }
}

impl fmt::Display for TemperatureFeel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The simplified forecast returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Forecast {
    /// Short description of the weather, e.g. `Sunny`.
    #[serde(rename = "short-term-forecast")]
    pub short_term: String,

    /// Temperature and unit, e.g. `95F`.
    pub temperature: String,

    /// `Hot`, `Cold` or `Moderate`.
    #[serde(rename = "temperature-feels-like")]
    pub temperature_feels: String,
}

impl Forecast {
    /// Build a forecast from the first of `periods`.
    pub fn from_periods(periods: &[ForecastPeriod]) -> Result<Self, UpstreamError> {
        let current = periods.first().ok_or(UpstreamError::NoForecastPeriods)?;
        Ok(Self::from(current))
    }
}

impl From<&ForecastPeriod> for Forecast {
    fn from(period: &ForecastPeriod) -> Self {
        Self {
            short_term: period.short_forecast.clone(),
            temperature: format!("{}{}", period.temperature, period.temperature_unit),
            temperature_feels: TemperatureFeel::classify(period.temperature).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn period(temperature: i64) -> ForecastPeriod {
        ForecastPeriod {
            temperature,
            temperature_unit: "F".to_string(),
            short_forecast: "Sunny".to_string(),
        }
    }

    #[test]
    fn classify_respects_inclusive_moderate_boundaries() {
        assert_eq!(TemperatureFeel::classify(44), TemperatureFeel::Cold);
        assert_eq!(TemperatureFeel::classify(45), TemperatureFeel::Moderate);
        assert_eq!(TemperatureFeel::classify(75), TemperatureFeel::Moderate);
        assert_eq!(TemperatureFeel::classify(76), TemperatureFeel::Hot);
    }

    #[test]
    fn classify_handles_extremes() {
        assert_eq!(TemperatureFeel::classify(-40), TemperatureFeel::Cold);
        assert_eq!(TemperatureFeel::classify(120), TemperatureFeel::Hot);
    }

    #[test]
    fn forecast_uses_first_period_only() {
        let periods = vec![period(72), period(30)];
        let forecast = Forecast::from_periods(&periods).expect("non-empty periods");

        assert_eq!(forecast.short_term, "Sunny");
        assert_eq!(forecast.temperature, "72F");
        assert_eq!(forecast.temperature_feels, "Moderate");
    }

    #[test]
    fn temperature_has_no_space_before_unit() {
        let mut p = period(-3);
        p.temperature_unit = "C".to_string();
        assert_eq!(Forecast::from(&p).temperature, "-3C");
    }

    #[test]
    fn empty_periods_is_an_error() {
        let err = Forecast::from_periods(&[]).unwrap_err();
        assert!(matches!(err, UpstreamError::NoForecastPeriods));
        assert_eq!(err.to_string(), "no forecast periods found");
    }

    #[test]
    fn forecast_serializes_with_hyphenated_keys() {
        let forecast = Forecast::from(&period(80));
        let json = serde_json::to_value(&forecast).unwrap();

        assert_eq!(json["short-term-forecast"], "Sunny");
        assert_eq!(json["temperature"], "80F");
        assert_eq!(json["temperature-feels-like"], "Hot");
    }

    #[test]
    fn coordinates_display_is_plain_decimal() {
        assert_eq!(Coordinates::new(39.7456, -97.0892).to_string(), "39.7456,-97.0892");
    }
}
