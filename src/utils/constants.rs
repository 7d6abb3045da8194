/// Input column names
pub const COUNTRY_COLUMN: &str = "country_alpha2";
pub const DATE_COLUMN: &str = "date";
pub const TEMPERATURE_COLUMN: &str = "temp_mean_c_approx";

/// Date format used by string date columns
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Plausible surface air temperature bounds (°C)
pub const MIN_VALID_TEMP: f64 = -100.0;
pub const MAX_VALID_TEMP: f64 = 70.0;

/// Offset between Celsius and Kelvin
pub const KELVIN_OFFSET: f64 = 273.15;

/// Days from 0001-01-01 (CE) to 1970-01-01, used for Arrow Date32 values
pub const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Processing defaults
pub const DEFAULT_START_YEAR: i32 = 1980;
pub const DEFAULT_END_YEAR: i32 = 2024;
pub const DEFAULT_OUTPUT_NAME: &str = "output";
pub const DEFAULT_OUTPUT_ROOT: &str = "output";
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;

/// Environment variable prefix for settings overrides
pub const SETTINGS_ENV_PREFIX: &str = "TRANSFORMER";

/// Output field names, shared by every output format
pub const OUTPUT_FIELDS: [&str; 13] = [
    "country",
    "year",
    "month",
    "avg_temp",
    "min_temp",
    "max_temp",
    "std_dev",
    "median_temp",
    "count",
    "percentile_25",
    "percentile_75",
    "percentile_90",
    "percentile_95",
];

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";
