use crate::error::Result;
use crate::models::TemperatureUnit;
use crate::processors::{TransformConfig, TransformRequest};
use crate::utils::constants::{
    COMPRESSION_SNAPPY, DEFAULT_END_YEAR, DEFAULT_OUTPUT_ROOT, DEFAULT_START_YEAR,
    SETTINGS_ENV_PREFIX,
};
use config::{Config, Environment, File, Map};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Run settings, layered from defaults, an optional settings file,
/// `TRANSFORMER_*` environment variables and finally command-line flags.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    pub unit: TemperatureUnit,
    #[serde(default)]
    pub threshold: Option<f64>,
    pub aggregate: bool,
    pub start_year: i32,
    pub end_year: i32,
    pub compression: String,
    pub output_root: PathBuf,
    pub max_workers: usize,
}

/// Values given explicitly on the command line. `None` leaves the lower
/// layers in charge.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub unit: Option<TemperatureUnit>,
    pub threshold: Option<f64>,
    pub aggregate: Option<bool>,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    pub compression: Option<String>,
    pub max_workers: Option<usize>,
}

impl Settings {
    pub fn load(settings_file: Option<&Path>, overrides: &SettingsOverrides) -> Result<Self> {
        Self::load_with_env(settings_file, overrides, None)
    }

    /// Same as [`Settings::load`], reading environment variables from `env`
    /// instead of the process environment when given.
    pub fn load_with_env(
        settings_file: Option<&Path>,
        overrides: &SettingsOverrides,
        env: Option<Map<String, String>>,
    ) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("unit", TemperatureUnit::Celsius.name())?
            .set_default("aggregate", false)?
            .set_default("start_year", DEFAULT_START_YEAR as i64)?
            .set_default("end_year", DEFAULT_END_YEAR as i64)?
            .set_default("compression", COMPRESSION_SNAPPY)?
            .set_default("output_root", DEFAULT_OUTPUT_ROOT)?
            .set_default("max_workers", num_cpus::get() as i64)?;

        if let Some(path) = settings_file {
            builder = builder.add_source(File::from(path).required(true));
        }

        let settings = builder
            .add_source(
                Environment::with_prefix(SETTINGS_ENV_PREFIX)
                    .try_parsing(true)
                    .source(env),
            )
            .set_override_option("unit", overrides.unit.map(|u| u.name()))?
            .set_override_option("threshold", overrides.threshold)?
            .set_override_option("aggregate", overrides.aggregate)?
            .set_override_option("start_year", overrides.start_year.map(i64::from))?
            .set_override_option("end_year", overrides.end_year.map(i64::from))?
            .set_override_option("compression", overrides.compression.clone())?
            .set_override_option("max_workers", overrides.max_workers.map(|w| w as i64))?
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn transform_config(&self) -> TransformConfig {
        TransformConfig {
            unit: self.unit,
            threshold: self.threshold,
            aggregate: self.aggregate,
        }
    }

    pub fn request(&self, countries: Vec<String>) -> TransformRequest {
        TransformRequest::new(countries, self.start_year, self.end_year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn no_env() -> Option<Map<String, String>> {
        Some(Map::new())
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::load_with_env(None, &SettingsOverrides::default(), no_env()).unwrap();

        assert_eq!(settings.unit, TemperatureUnit::Celsius);
        assert_eq!(settings.threshold, None);
        assert!(!settings.aggregate);
        assert_eq!(settings.start_year, 1980);
        assert_eq!(settings.end_year, 2024);
        assert_eq!(settings.compression, "snappy");
        assert_eq!(settings.output_root, PathBuf::from("output"));
    }

    #[test]
    fn test_file_then_env_then_flags() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "unit = \"Kelvin\"\nthreshold = 2.5\nstart_year = 1990\nend_year = 2000"
        )
        .unwrap();

        let mut env = Map::new();
        env.insert("TRANSFORMER_END_YEAR".to_string(), "2010".to_string());
        env.insert("TRANSFORMER_AGGREGATE".to_string(), "true".to_string());

        let overrides = SettingsOverrides {
            unit: Some(TemperatureUnit::Fahrenheit),
            ..Default::default()
        };

        let settings = Settings::load_with_env(Some(file.path()), &overrides, Some(env)).unwrap();

        assert_eq!(settings.unit, TemperatureUnit::Fahrenheit);
        assert_eq!(settings.threshold, Some(2.5));
        assert_eq!(settings.start_year, 1990);
        assert_eq!(settings.end_year, 2010);
        assert!(settings.aggregate);
    }

    #[test]
    fn test_invalid_unit_in_file_is_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "unit = \"rankine\"").unwrap();

        let result = Settings::load_with_env(Some(file.path()), &SettingsOverrides::default(), no_env());
        assert!(result.is_err());
    }

    #[test]
    fn test_transform_config_and_request() {
        let overrides = SettingsOverrides {
            threshold: Some(3.0),
            aggregate: Some(true),
            start_year: Some(2001),
            end_year: Some(2002),
            ..Default::default()
        };
        let settings = Settings::load_with_env(None, &overrides, no_env()).unwrap();

        let config = settings.transform_config();
        assert_eq!(config.threshold, Some(3.0));
        assert!(config.aggregate);

        let request = settings.request(vec!["US".to_string()]);
        assert_eq!(request.start_year, 2001);
        assert_eq!(request.end_year, 2002);
    }
}
