use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use pretty_assertions::assert_eq;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use weather_transformer::processors::{process_file, Pipeline, TransformRequest};
use weather_transformer::utils::OutputPaths;
use weather_transformer::writers::{CsvWriter, JsonWriter, OutputWriter, ParquetWriter};
use weather_transformer::{ProcessingError, StatsRecord, TemperatureUnit};

/// Write a daily observation table in the source layout.
fn write_source_parquet(dir: &Path, rows: &[(&str, &str, Option<f64>)]) -> PathBuf {
    let schema = Arc::new(Schema::new(vec![
        Field::new("country_alpha2", DataType::Utf8, false),
        Field::new("date", DataType::Utf8, false),
        Field::new("temp_mean_c_approx", DataType::Float64, true),
        Field::new("station_name", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.0))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.1))),
            Arc::new(Float64Array::from(
                rows.iter().map(|r| r.2).collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|_| "somewhere"))),
        ],
    )
    .unwrap();

    let path = dir.join("daily.parquet");
    let mut writer = ArrowWriter::try_new(File::create(&path).unwrap(), schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();
    path
}

fn request(countries: &[&str], start_year: i32, end_year: i32) -> TransformRequest {
    TransformRequest::new(
        countries.iter().map(|c| c.to_string()).collect(),
        start_year,
        end_year,
    )
}

#[test]
fn test_fahrenheit_scenario_from_parquet() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let input = write_source_parquet(
        temp_dir.path(),
        &[
            ("US", "2020-01-05", Some(0.0)),
            ("US", "2020-01-06", Some(10.0)),
            ("US", "2020-01-07", Some(20.0)),
            ("US", "2020-01-08", Some(500.0)),
            ("US", "2020-01-09", None),
            ("CA", "2020-01-05", Some(-20.0)),
        ],
    );

    let pipeline = Pipeline::default().with_unit(TemperatureUnit::Fahrenheit);
    let (records, summary) = process_file(&input, &request(&["US"], 2020, 2020), &pipeline).unwrap();

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.country, "US");
    assert_eq!((record.year, record.month), (2020, 1));
    assert_eq!(record.count, 3);
    assert!((record.avg_temp - 50.0).abs() < 1e-9);
    assert_eq!(record.min_temp, 32.0);
    assert_eq!(record.max_temp, 68.0);
    assert_eq!(record.median_temp, 50.0);

    assert_eq!(summary.total_rows, 6);
    assert_eq!(summary.matched_rows, 5);
    assert_eq!(summary.dropped_rows, 2);
}

#[test]
fn test_aggregate_scenario_from_csv() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("daily.csv");
    std::fs::write(
        &input,
        "country_alpha2,date,temp_mean_c_approx\n\
         US,2021-07-01,20.0\n\
         DE,2021-07-01,18.0\n\
         DE,2021-07-02,16.0\n\
         FR,2021-07-01,25.0\n",
    )
    .unwrap();

    let pipeline = Pipeline::default().with_aggregate(true);
    let (records, _) = process_file(&input, &request(&["US", "DE"], 2021, 2021), &pipeline).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].country, "US,DE");
    assert_eq!(records[0].count, 3);
    assert_eq!(records[0].avg_temp, 18.0);
    assert_eq!(records[0].median_temp, 18.0);
}

#[test]
fn test_threshold_scenario() {
    let temp_dir = TempDir::new().unwrap();
    let dates: Vec<String> = (1..=10).map(|d| format!("2020-03-{:02}", d)).collect();
    let mut rows: Vec<(&str, &str, Option<f64>)> =
        dates.iter().take(9).map(|d| ("US", d.as_str(), Some(10.0))).collect();
    rows.push(("US", dates[9].as_str(), Some(60.0)));
    let input = write_source_parquet(temp_dir.path(), &rows);

    let pipeline = Pipeline::default().with_threshold(Some(2.0));
    let (records, summary) = process_file(&input, &request(&["US"], 2020, 2020), &pipeline).unwrap();

    assert_eq!(records[0].count, 9);
    assert_eq!(records[0].max_temp, 10.0);
    assert_eq!(records[0].std_dev, 0.0);
    assert_eq!(summary.outliers_removed, 1);
}

#[test]
fn test_source_failures_abort_before_processing() {
    let temp_dir = TempDir::new().unwrap();

    let missing = temp_dir.path().join("missing.parquet");
    let err = process_file(&missing, &request(&["US"], 2020, 2020), &Pipeline::default())
        .unwrap_err();
    assert!(matches!(err, ProcessingError::SourceRead { .. }));

    let no_temp = temp_dir.path().join("no_temp.csv");
    std::fs::write(&no_temp, "country_alpha2,date\nUS,2020-01-01\n").unwrap();
    let err = process_file(&no_temp, &request(&["US"], 2020, 2020), &Pipeline::default())
        .unwrap_err();
    assert!(matches!(
        err,
        ProcessingError::SourceRead { ref message, .. } if message.contains("temp_mean_c_approx")
    ));
}

#[test]
fn test_invalid_request_checked_before_reading() {
    // The input does not exist; the request error must win.
    let err = process_file(
        Path::new("does-not-exist.parquet"),
        &request(&["US"], 2024, 1980),
        &Pipeline::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ProcessingError::InvalidRange(_)));
}

#[test]
fn test_three_output_formats_are_equivalent() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_source_parquet(
        temp_dir.path(),
        &[
            ("DE", "2019-12-30", Some(-1.3)),
            ("DE", "2019-12-31", Some(2.9)),
            ("DE", "2020-01-01", Some(0.7)),
            ("US", "2020-01-01", Some(-5.55)),
            ("US", "2020-01-02", Some(3.14159)),
            ("US", "2020-01-03", Some(7.0)),
            ("US", "2020-02-01", Some(1.0 / 3.0)),
        ],
    );

    let pipeline = Pipeline::default().with_unit(TemperatureUnit::Kelvin);
    let (records, _) =
        process_file(&input, &request(&["DE", "US"], 2019, 2020), &pipeline).unwrap();
    assert_eq!(records.len(), 4);

    let paths = OutputPaths::new(temp_dir.path(), "run");
    OutputWriter::new().write_all(&records, &paths).unwrap();

    let from_csv: Vec<StatsRecord> = CsvWriter::new().read_records(&paths.csv).unwrap();
    let from_json: Vec<StatsRecord> = JsonWriter::new().read_records(&paths.json).unwrap();
    let from_parquet: Vec<StatsRecord> = ParquetWriter::new().read_records(&paths.parquet).unwrap();

    assert_eq!(from_csv, records);
    assert_eq!(from_json, records);
    assert_eq!(from_parquet, records);

    for record in &from_parquet {
        assert!(record.validate_relationships().is_ok());
    }
}
