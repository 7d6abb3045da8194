use crate::models::TemperatureUnit;
use crate::utils::constants::DEFAULT_OUTPUT_NAME;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "weather-transformer")]
#[command(about = "Monthly temperature statistics from daily country observations")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose (debug) logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute monthly statistics and write CSV, JSON and Parquet output
    Transform {
        #[arg(short, long, help = "Input Parquet or CSV file")]
        input_file: PathBuf,

        #[arg(
            short,
            long,
            default_value = DEFAULT_OUTPUT_NAME,
            help = "Output base name (creates a directory with CSV, JSON and Parquet files)"
        )]
        output: String,

        #[arg(
            short,
            long,
            required = true,
            value_delimiter = ',',
            help = "Country alpha-2 codes to filter by (e.g. US,DE,FR)"
        )]
        countries: Vec<String>,

        #[arg(long, help = "Start year (inclusive) [default: 1980]")]
        start_year: Option<i32>,

        #[arg(long, help = "End year (inclusive) [default: 2024]")]
        end_year: Option<i32>,

        #[arg(long, value_enum, ignore_case = true, help = "Temperature unit for output [default: celsius]")]
        unit: Option<TemperatureUnit>,

        #[arg(
            long,
            allow_negative_numbers = true,
            help = "Outlier detection threshold (standard deviations)"
        )]
        threshold: Option<f64>,

        #[arg(long, help = "Aggregate all countries together instead of keeping them separate")]
        aggregate: bool,

        #[arg(long, help = "Parquet compression [default: snappy]")]
        compression: Option<String>,

        #[arg(long, help = "Worker threads [default: number of CPUs]")]
        max_workers: Option<usize>,

        #[arg(long, help = "Settings file (TOML, JSON, YAML, ...)")]
        config: Option<PathBuf>,
    },

    /// Display information about a statistics Parquet file
    Info {
        #[arg(short, long)]
        file: PathBuf,

        #[arg(short, long, default_value = "10")]
        sample: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_transform_command() {
        let cli = Cli::try_parse_from([
            "weather-transformer",
            "transform",
            "-i",
            "daily.parquet",
            "-c",
            "US,DE",
            "--unit",
            "Fahrenheit",
            "--threshold",
            "2.5",
            "--aggregate",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Commands::Transform {
                countries,
                unit,
                threshold,
                aggregate,
                output,
                start_year,
                ..
            } => {
                assert_eq!(countries, vec!["US", "DE"]);
                assert_eq!(unit, Some(TemperatureUnit::Fahrenheit));
                assert_eq!(threshold, Some(2.5));
                assert!(aggregate);
                assert_eq!(output, "output");
                assert_eq!(start_year, None);
            }
            _ => panic!("expected transform command"),
        }
    }

    #[test]
    fn test_countries_required() {
        let result = Cli::try_parse_from(["weather-transformer", "transform", "-i", "daily.parquet"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_unit_rejected() {
        let result = Cli::try_parse_from([
            "weather-transformer",
            "transform",
            "-i",
            "daily.parquet",
            "-c",
            "US",
            "--unit",
            "rankine",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_negative_threshold_accepted() {
        let cli = Cli::try_parse_from([
            "weather-transformer",
            "transform",
            "-i",
            "daily.parquet",
            "-c",
            "US",
            "--threshold",
            "-1",
        ])
        .unwrap();

        match cli.command {
            Commands::Transform { threshold, .. } => assert_eq!(threshold, Some(-1.0)),
            _ => panic!("expected transform command"),
        }
    }
}
