use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{ProcessingError, Result};
use crate::utils::constants::KELVIN_OFFSET;

/// Output unit for converted temperatures. Source data is always Celsius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(try_from = "String", into = "String")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl TemperatureUnit {
    /// Convert a Celsius reading into this unit.
    pub fn convert(&self, celsius: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => celsius,
            TemperatureUnit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
            TemperatureUnit::Kelvin => celsius + KELVIN_OFFSET,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "celsius",
            TemperatureUnit::Fahrenheit => "fahrenheit",
            TemperatureUnit::Kelvin => "kelvin",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
            TemperatureUnit::Kelvin => "K",
        }
    }
}

impl FromStr for TemperatureUnit {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "celsius" => Ok(TemperatureUnit::Celsius),
            "fahrenheit" => Ok(TemperatureUnit::Fahrenheit),
            "kelvin" => Ok(TemperatureUnit::Kelvin),
            _ => Err(ProcessingError::InvalidUnit(s.to_string())),
        }
    }
}

impl TryFrom<String> for TemperatureUnit {
    type Error = ProcessingError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<TemperatureUnit> for String {
    fn from(unit: TemperatureUnit) -> Self {
        unit.name().to_string()
    }
}

impl std::fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Convert a Celsius value using a unit name (case-insensitive).
///
/// Fails with [`ProcessingError::InvalidUnit`] for anything other than
/// `celsius`, `fahrenheit` or `kelvin`.
pub fn convert(celsius: f64, unit: &str) -> Result<f64> {
    let unit: TemperatureUnit = unit.parse()?;
    Ok(unit.convert(celsius))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_freezing_point_conversions() {
        assert_eq!(convert(0.0, "celsius").unwrap(), 0.0);
        assert_eq!(convert(0.0, "fahrenheit").unwrap(), 32.0);
        assert_eq!(convert(0.0, "kelvin").unwrap(), 273.15);
    }

    #[test]
    fn test_celsius_is_identity() {
        for value in [-100.0, -40.0, -0.5, 0.0, 12.345, 70.0, 1e9] {
            assert_eq!(TemperatureUnit::Celsius.convert(value), value);
        }
    }

    #[test]
    fn test_fahrenheit_and_kelvin() {
        assert_eq!(TemperatureUnit::Fahrenheit.convert(100.0), 212.0);
        assert_eq!(TemperatureUnit::Fahrenheit.convert(-40.0), -40.0);
        assert_eq!(TemperatureUnit::Kelvin.convert(-273.15), 0.0);
    }

    #[test]
    fn test_unit_parsing_is_case_insensitive() {
        assert_eq!(
            "Fahrenheit".parse::<TemperatureUnit>().unwrap(),
            TemperatureUnit::Fahrenheit
        );
        assert_eq!(
            "KELVIN".parse::<TemperatureUnit>().unwrap(),
            TemperatureUnit::Kelvin
        );
        assert_eq!(convert(10.0, "CeLsIuS").unwrap(), 10.0);
    }

    #[test]
    fn test_unknown_unit_is_rejected() {
        let err = convert(0.0, "rankine").unwrap_err();
        assert!(matches!(err, ProcessingError::InvalidUnit(ref u) if u == "rankine"));
        assert!(err.is_request_error());
    }

    #[test]
    fn test_unit_serde_round_trip() {
        let unit: TemperatureUnit = serde_json::from_str("\"Kelvin\"").unwrap();
        assert_eq!(unit, TemperatureUnit::Kelvin);
        assert_eq!(serde_json::to_string(&unit).unwrap(), "\"kelvin\"");
        assert!(serde_json::from_str::<TemperatureUnit>("\"rankine\"").is_err());
    }
}
