use crate::error::Result;
use crate::models::StatsRecord;
use std::fs::File;
use std::path::Path;

/// Writes statistics as CSV, one header row using the output field names.
///
/// Values are written at full precision so the file reads back to the same
/// records as the JSON and Parquet outputs.
pub struct CsvWriter;

impl CsvWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write_records(&self, records: &[StatsRecord], path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);

        if records.is_empty() {
            writer.write_record(crate::utils::constants::OUTPUT_FIELDS)?;
        }
        for record in records {
            writer.serialize(record)?;
        }

        writer.flush()?;
        Ok(())
    }

    pub fn read_records(&self, path: &Path) -> Result<Vec<StatsRecord>> {
        let mut reader = csv::Reader::from_path(path)?;
        let records = reader
            .deserialize::<StatsRecord>()
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(records)
    }
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self::new()
    }
}
