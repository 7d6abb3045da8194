use crate::error::Result;
use crate::models::StatsRecord;
use crate::utils::filename::OutputPaths;
use crate::writers::{CsvWriter, JsonWriter, ParquetWriter};
use std::time::{Duration, Instant};
use tracing::debug;

/// Time spent on each output format.
#[derive(Debug, Clone, Default)]
pub struct WriteTimings {
    pub csv: Duration,
    pub json: Duration,
    pub parquet: Duration,
}

impl WriteTimings {
    pub fn total(&self) -> Duration {
        self.csv + self.json + self.parquet
    }
}

/// Writes the same record list as CSV, JSON and Parquet.
pub struct OutputWriter {
    csv: CsvWriter,
    json: JsonWriter,
    parquet: ParquetWriter,
}

impl OutputWriter {
    pub fn new() -> Self {
        Self {
            csv: CsvWriter::new(),
            json: JsonWriter::new(),
            parquet: ParquetWriter::new(),
        }
    }

    pub fn with_parquet_writer(mut self, parquet: ParquetWriter) -> Self {
        self.parquet = parquet;
        self
    }

    pub fn parquet(&self) -> &ParquetWriter {
        &self.parquet
    }

    /// Create the output directory and write all three files.
    pub fn write_all(&self, records: &[StatsRecord], paths: &OutputPaths) -> Result<WriteTimings> {
        std::fs::create_dir_all(&paths.dir)?;
        debug!("Writing {} records to {}", records.len(), paths.dir.display());

        let mut timings = WriteTimings::default();

        let start = Instant::now();
        self.csv.write_records(records, &paths.csv)?;
        timings.csv = start.elapsed();

        let start = Instant::now();
        self.json.write_records(records, &paths.json)?;
        timings.json = start.elapsed();

        let start = Instant::now();
        self.parquet.write_records(records, &paths.parquet)?;
        timings.parquet = start.elapsed();

        for path in paths.all() {
            debug!("  - {}", path.display());
        }

        Ok(timings)
    }
}

impl Default for OutputWriter {
    fn default() -> Self {
        Self::new()
    }
}
