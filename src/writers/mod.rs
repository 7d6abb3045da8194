pub mod csv_writer;
pub mod json_writer;
pub mod output_writer;
pub mod parquet_writer;

pub use csv_writer::CsvWriter;
pub use json_writer::JsonWriter;
pub use output_writer::{OutputWriter, WriteTimings};
pub use parquet_writer::{ParquetFileInfo, ParquetWriter};
