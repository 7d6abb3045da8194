use crate::error::Result;
use crate::models::StatsRecord;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Writes statistics as a pretty-printed JSON array of objects.
pub struct JsonWriter;

impl JsonWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write_records(&self, records: &[StatsRecord], path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, records)?;
        writer.flush()?;
        Ok(())
    }

    pub fn read_records(&self, path: &Path) -> Result<Vec<StatsRecord>> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

impl Default for JsonWriter {
    fn default() -> Self {
        Self::new()
    }
}
