use crate::error::{ProcessingError, Result};
use crate::models::StatsRecord;
use crate::utils::constants::{
    COMPRESSION_GZIP, COMPRESSION_LZ4, COMPRESSION_NONE, COMPRESSION_SNAPPY, COMPRESSION_ZSTD,
    DEFAULT_ROW_GROUP_SIZE, OUTPUT_FIELDS,
};
use arrow::array::*;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

pub struct ParquetWriter {
    compression: Compression,
    row_group_size: usize,
}

impl ParquetWriter {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
        }
    }

    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.compression = match compression.to_lowercase().as_str() {
            COMPRESSION_SNAPPY => Compression::SNAPPY,
            COMPRESSION_GZIP => Compression::GZIP(GzipLevel::default()),
            COMPRESSION_LZ4 => Compression::LZ4,
            COMPRESSION_ZSTD => Compression::ZSTD(ZstdLevel::default()),
            COMPRESSION_NONE => Compression::UNCOMPRESSED,
            _ => {
                return Err(ProcessingError::Config(format!(
                    "Unsupported compression: {}",
                    compression
                )))
            }
        };
        Ok(self)
    }

    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Write statistics records to a Parquet file.
    ///
    /// An empty slice still produces a valid file carrying the schema.
    pub fn write_records(&self, records: &[StatsRecord], path: &Path) -> Result<()> {
        let schema = self.create_schema();
        let file = File::create(path)?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;
        for chunk in records.chunks(self.row_group_size.max(1)) {
            let batch = self.records_to_batch(chunk, schema.clone())?;
            writer.write(&batch)?;
        }
        writer.close()?;

        Ok(())
    }

    /// Arrow schema for statistics records, in output field order.
    pub fn create_schema(&self) -> Arc<Schema> {
        let fields = OUTPUT_FIELDS
            .iter()
            .map(|&name| {
                let data_type = match name {
                    "country" => DataType::Utf8,
                    "year" => DataType::Int32,
                    "month" | "count" => DataType::UInt32,
                    _ => DataType::Float64,
                };
                Field::new(name, data_type, false)
            })
            .collect::<Vec<_>>();

        Arc::new(Schema::new(fields))
    }

    fn records_to_batch(&self, records: &[StatsRecord], schema: Arc<Schema>) -> Result<RecordBatch> {
        let float_column = |f: fn(&StatsRecord) -> f64| -> ArrayRef {
            Arc::new(Float64Array::from_iter_values(records.iter().map(f)))
        };

        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from_iter_values(
                records.iter().map(|r| r.country.as_str()),
            )),
            Arc::new(Int32Array::from_iter_values(records.iter().map(|r| r.year))),
            Arc::new(UInt32Array::from_iter_values(records.iter().map(|r| r.month))),
            float_column(|r| r.avg_temp),
            float_column(|r| r.min_temp),
            float_column(|r| r.max_temp),
            float_column(|r| r.std_dev),
            float_column(|r| r.median_temp),
            Arc::new(UInt32Array::from_iter_values(records.iter().map(|r| r.count))),
            float_column(|r| r.percentile_25),
            float_column(|r| r.percentile_75),
            float_column(|r| r.percentile_90),
            float_column(|r| r.percentile_95),
        ];

        Ok(RecordBatch::try_new(schema, columns)?)
    }

    /// Read every record back from a statistics Parquet file.
    pub fn read_records(&self, path: &Path) -> Result<Vec<StatsRecord>> {
        self.read_sample_records(path, 0)
    }

    /// Read up to `limit` records (0 = all) from a statistics Parquet file.
    pub fn read_sample_records(&self, path: &Path, limit: usize) -> Result<Vec<StatsRecord>> {
        let file = File::open(path)?;
        let batch_size = if limit == 0 { 8192 } else { limit.min(8192) };
        let parquet_reader = ParquetRecordBatchReaderBuilder::try_new(file)?
            .with_batch_size(batch_size)
            .build()?;

        let mut records = Vec::new();

        for batch_result in parquet_reader {
            let batch = batch_result?;

            let countries = typed_column::<StringArray>(&batch, "country")?;
            let years = typed_column::<Int32Array>(&batch, "year")?;
            let months = typed_column::<UInt32Array>(&batch, "month")?;
            let counts = typed_column::<UInt32Array>(&batch, "count")?;
            let avg = typed_column::<Float64Array>(&batch, "avg_temp")?;
            let min = typed_column::<Float64Array>(&batch, "min_temp")?;
            let max = typed_column::<Float64Array>(&batch, "max_temp")?;
            let std_dev = typed_column::<Float64Array>(&batch, "std_dev")?;
            let median = typed_column::<Float64Array>(&batch, "median_temp")?;
            let p25 = typed_column::<Float64Array>(&batch, "percentile_25")?;
            let p75 = typed_column::<Float64Array>(&batch, "percentile_75")?;
            let p90 = typed_column::<Float64Array>(&batch, "percentile_90")?;
            let p95 = typed_column::<Float64Array>(&batch, "percentile_95")?;

            for i in 0..batch.num_rows() {
                if limit > 0 && records.len() >= limit {
                    return Ok(records);
                }

                records.push(StatsRecord {
                    country: countries.value(i).to_string(),
                    year: years.value(i),
                    month: months.value(i),
                    avg_temp: avg.value(i),
                    min_temp: min.value(i),
                    max_temp: max.value(i),
                    std_dev: std_dev.value(i),
                    median_temp: median.value(i),
                    count: counts.value(i),
                    percentile_25: p25.value(i),
                    percentile_75: p75.value(i),
                    percentile_90: p90.value(i),
                    percentile_95: p95.value(i),
                });
            }
        }

        Ok(records)
    }

    /// Get file statistics
    pub fn get_file_info(&self, path: &Path) -> Result<ParquetFileInfo> {
        use parquet::file::reader::{FileReader, SerializedFileReader};

        let file = File::open(path)?;
        let reader = SerializedFileReader::new(file)?;
        let metadata = reader.metadata();

        let file_metadata = metadata.file_metadata();
        let row_groups = metadata.num_row_groups();
        let total_rows = file_metadata.num_rows();
        let file_size = std::fs::metadata(path)?.len();

        let mut row_group_sizes = Vec::new();
        let mut compression = Compression::UNCOMPRESSED;
        for i in 0..row_groups {
            let rg_metadata = metadata.row_group(i);
            row_group_sizes.push(rg_metadata.num_rows());
            if let Some(column) = rg_metadata.columns().first() {
                compression = column.compression();
            }
        }

        Ok(ParquetFileInfo {
            total_rows,
            row_groups: row_groups as i32,
            row_group_sizes,
            file_size,
            compression,
        })
    }
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn typed_column<'a, T: 'static>(batch: &'a RecordBatch, name: &str) -> Result<&'a T> {
    batch
        .column_by_name(name)
        .ok_or_else(|| ProcessingError::MissingColumn(name.to_string()))?
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| ProcessingError::Config(format!("Invalid {} column type", name)))
}

#[derive(Debug)]
pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub row_groups: i32,
    pub row_group_sizes: Vec<i64>,
    pub file_size: u64,
    pub compression: Compression,
}

impl ParquetFileInfo {
    pub fn summary(&self) -> String {
        let avg_rows = if self.row_groups > 0 {
            self.total_rows as f64 / self.row_groups as f64
        } else {
            0.0
        };

        format!(
            "Parquet File Summary:\n\
            - Total rows: {}\n\
            - Row groups: {}\n\
            - File size: {:.2} MB\n\
            - Compression: {:?}\n\
            - Avg rows per group: {:.0}",
            self.total_rows,
            self.row_groups,
            self.file_size as f64 / 1_048_576.0,
            self.compression,
            avg_rows
        )
    }
}
