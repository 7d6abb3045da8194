use crate::error::{ProcessingError, Result};
use crate::models::RawObservation;
use crate::utils::constants::{
    COUNTRY_COLUMN, DATE_COLUMN, DATE_FORMAT, TEMPERATURE_COLUMN, UNIX_EPOCH_DAYS_FROM_CE,
};
use arrow::array::{Array, ArrayRef, Date32Array, Float64Array, StringArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use std::fs::File;
use std::path::Path;
use tracing::{debug, warn};

const REQUIRED_COLUMNS: [&str; 3] = [COUNTRY_COLUMN, DATE_COLUMN, TEMPERATURE_COLUMN];

/// Observations loaded from a source table.
#[derive(Debug, Clone, Default)]
pub struct SourceTable {
    pub observations: Vec<RawObservation>,
    /// Rows without a usable country or date.
    pub skipped_rows: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Parquet,
    Csv,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_lowercase();
        match extension.as_str() {
            "parquet" | "pq" => Some(SourceFormat::Parquet),
            "csv" => Some(SourceFormat::Csv),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CsvObservation {
    #[serde(rename = "country_alpha2")]
    country: Option<String>,
    #[serde(rename = "date")]
    date: Option<String>,
    #[serde(rename = "temp_mean_c_approx")]
    temperature: Option<String>,
}

pub struct ObservationReader {
    batch_size: usize,
}

impl ObservationReader {
    pub fn new() -> Self {
        Self { batch_size: 8192 }
    }

    /// Read observations from a Parquet or CSV file, chosen by extension.
    pub fn read_observations(&self, path: &Path) -> Result<Vec<RawObservation>> {
        Ok(self.read_table(path)?.observations)
    }

    /// Read a source table, reporting how many rows were skipped.
    ///
    /// Every failure, a missing required column included, is reported as
    /// [`ProcessingError::SourceRead`].
    pub fn read_table(&self, path: &Path) -> Result<SourceTable> {
        let format = SourceFormat::from_path(path).ok_or_else(|| {
            ProcessingError::source_read(path, "unsupported file extension (expected .parquet or .csv)")
        })?;

        debug!("Reading {:?} source table: {}", format, path.display());
        let result = match format {
            SourceFormat::Parquet => self.read_parquet(path),
            SourceFormat::Csv => self.read_csv(path),
        };

        let table = result.map_err(|e| ProcessingError::source_read(path, e))?;

        if table.skipped_rows > 0 {
            warn!(
                "Skipped {} rows without a usable country or date",
                table.skipped_rows
            );
        }
        debug!("Loaded {} observations", table.observations.len());

        Ok(table)
    }

    fn read_parquet(&self, path: &Path) -> Result<SourceTable> {
        let file = File::open(path)?;
        let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
        for column in REQUIRED_COLUMNS {
            if builder.schema().field_with_name(column).is_err() {
                return Err(ProcessingError::MissingColumn(column.to_string()));
            }
        }
        let reader = builder.with_batch_size(self.batch_size).build()?;

        let mut table = SourceTable::default();
        for batch_result in reader {
            let batch = batch_result?;
            self.append_batch(&batch, &mut table)?;
        }

        Ok(table)
    }

    fn append_batch(&self, batch: &RecordBatch, table: &mut SourceTable) -> Result<()> {
        let countries = cast(required_column(batch, COUNTRY_COLUMN)?, &DataType::Utf8)?;
        let countries = downcast::<StringArray>(&countries, COUNTRY_COLUMN)?;

        let dates = DateColumn::from_array(required_column(batch, DATE_COLUMN)?)?;

        let temps = cast(required_column(batch, TEMPERATURE_COLUMN)?, &DataType::Float64)?;
        let temps = downcast::<Float64Array>(&temps, TEMPERATURE_COLUMN)?;

        table.observations.reserve(batch.num_rows());
        for i in 0..batch.num_rows() {
            let date = match dates.value(i) {
                Some(date) if !countries.is_null(i) => date,
                _ => {
                    table.skipped_rows += 1;
                    continue;
                }
            };

            let temperature = if temps.is_null(i) {
                None
            } else {
                Some(temps.value(i))
            };

            table
                .observations
                .push(RawObservation::new(countries.value(i), date, temperature));
        }

        Ok(())
    }

    fn read_csv(&self, path: &Path) -> Result<SourceTable> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_path(path)?;

        let headers = reader.headers()?.clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(ProcessingError::MissingColumn(column.to_string()));
            }
        }

        let mut table = SourceTable::default();
        for row in reader.deserialize::<CsvObservation>() {
            let row = row?;
            let country = row.country.filter(|c| !c.trim().is_empty());
            let date = row.date.as_deref().and_then(parse_date);

            match (country, date) {
                (Some(country), Some(date)) => {
                    let temperature = row
                        .temperature
                        .as_deref()
                        .and_then(|t| t.trim().parse::<f64>().ok());
                    table
                        .observations
                        .push(RawObservation::new(country.trim(), date, temperature));
                }
                _ => table.skipped_rows += 1,
            }
        }

        Ok(table)
    }
}

impl Default for ObservationReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Date column in either string or Arrow date form.
enum DateColumn {
    Text(StringArray),
    Days(Date32Array),
}

impl DateColumn {
    fn from_array(array: &ArrayRef) -> Result<Self> {
        match array.data_type() {
            DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => {
                let text = cast(array, &DataType::Utf8)?;
                Ok(DateColumn::Text(
                    downcast::<StringArray>(&text, DATE_COLUMN)?.clone(),
                ))
            }
            _ => {
                let days = cast(array, &DataType::Date32)?;
                Ok(DateColumn::Days(
                    downcast::<Date32Array>(&days, DATE_COLUMN)?.clone(),
                ))
            }
        }
    }

    fn value(&self, i: usize) -> Option<NaiveDate> {
        match self {
            DateColumn::Text(array) if !array.is_null(i) => parse_date(array.value(i)),
            DateColumn::Days(array) if !array.is_null(i) => {
                array
                    .value(i)
                    .checked_add(UNIX_EPOCH_DAYS_FROM_CE)
                    .and_then(NaiveDate::from_num_days_from_ce_opt)
            }
            _ => None,
        }
    }
}

/// Parse `YYYY-MM-DD`, tolerating a trailing time component.
fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let date_part = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(date_part, DATE_FORMAT).ok()
}

fn required_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef> {
    batch
        .column_by_name(name)
        .ok_or_else(|| ProcessingError::MissingColumn(name.to_string()))
}

fn downcast<'a, T: 'static>(array: &'a ArrayRef, name: &str) -> Result<&'a T> {
    array.as_any().downcast_ref::<T>().ok_or_else(|| {
        ProcessingError::Arrow(ArrowError::CastError(format!(
            "Column {} has an unexpected type",
            name
        )))
    })
}
