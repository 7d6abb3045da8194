use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::processors::Pipeline;
use crate::readers::ObservationReader;
use crate::settings::{Settings, SettingsOverrides};
use crate::utils::filename::OutputPaths;
use crate::utils::logging::init_logging;
use crate::utils::progress::ProgressReporter;
use crate::writers::{OutputWriter, ParquetWriter};
use std::path::PathBuf;
use std::time::Instant;
use tracing::debug;

pub async fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;
    if cli.verbose {
        debug!("Verbose logging enabled");
    }

    let result = match cli.command {
        Commands::Transform {
            input_file,
            output,
            countries,
            start_year,
            end_year,
            unit,
            threshold,
            aggregate,
            compression,
            max_workers,
            config,
        } => {
            let overrides = SettingsOverrides {
                unit,
                threshold,
                aggregate: aggregate.then_some(true),
                start_year,
                end_year,
                compression,
                max_workers,
            };
            transform(input_file, output, countries, config, overrides).await
        }

        Commands::Info { file, sample } => info(file, sample),
    };

    if let Err(ref e) = result {
        if e.is_request_error() {
            eprintln!("Check --countries, --start-year/--end-year and --unit (see --help)");
        }
    }

    result
}

async fn transform(
    input_file: PathBuf,
    output: String,
    countries: Vec<String>,
    settings_file: Option<PathBuf>,
    overrides: SettingsOverrides,
) -> Result<()> {
    let total_start = Instant::now();

    let settings = Settings::load(settings_file.as_deref(), &overrides)?;
    let countries: Vec<String> = countries
        .iter()
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect();
    let request = settings.request(countries);
    request.validate()?;

    println!("Transformer! Rust Weather Data Pipeline");
    println!(
        "Processing {} for {} ({}-{})",
        input_file.display(),
        request.countries.join(","),
        request.start_year,
        request.end_year
    );
    debug!(
        "Creating transformation configuration | Unit={}, Threshold={:?}, Aggregate={}, Workers={}",
        settings.unit, settings.threshold, settings.aggregate, settings.max_workers
    );
    if settings.aggregate {
        debug!("Aggregating countries together");
    }

    let progress = ProgressReporter::new_spinner("Reading source table...", false);

    let processing_start = Instant::now();
    let reader_path = input_file.clone();
    let table =
        tokio::task::spawn_blocking(move || ObservationReader::new().read_table(&reader_path))
            .await??;

    progress.set_message("Computing statistics...");
    let pipeline = Pipeline::new(settings.transform_config()).with_max_workers(settings.max_workers);
    let (records, summary) =
        tokio::task::spawn_blocking(move || pipeline.run(&table.observations, &request))
            .await??;
    let processing_time = processing_start.elapsed();

    progress.finish_with_message(&format!("Processed {} records", records.len()));
    println!(
        "Data processing completed in {:.2?} | Processed {} records",
        processing_time,
        records.len()
    );
    println!("\n{}", summary.summary());

    let paths = OutputPaths::new(&settings.output_root, &output);
    let writer = OutputWriter::new()
        .with_parquet_writer(ParquetWriter::new().with_compression(&settings.compression)?);

    println!(
        "\nCreated output directory: {} | Writing output files...",
        paths.dir.display()
    );
    let io_start = Instant::now();
    let timings = writer.write_all(&records, &paths)?;
    let io_time = io_start.elapsed();

    println!("CSV write took {:.2?}", timings.csv);
    println!("JSON write took {:.2?}", timings.json);
    println!("Parquet write took {:.2?}", timings.parquet);
    println!("All files took {:.2?}", timings.total());
    println!("\nWrote files to directory: {}", paths.dir.display());
    for path in paths.all() {
        println!("  - {}", path.display());
    }

    println!("\nProcessed {} records", records.len());
    if let Some(first) = records.first() {
        println!(
            "Sample: {} {}/{} avg={:.1}{} count={}",
            first.country,
            first.year,
            first.month,
            first.avg_temp,
            settings.unit.symbol(),
            first.count
        );
    }

    let total_time = total_start.elapsed();
    println!("Pipeline completed successfully in {:.2?}", total_time);
    debug!(
        "Performance breakdown: Processing={:.1}%, IO={:.1}%",
        (processing_time.as_secs_f64() / total_time.as_secs_f64()) * 100.0,
        (io_time.as_secs_f64() / total_time.as_secs_f64()) * 100.0
    );

    Ok(())
}

fn info(file: PathBuf, sample: usize) -> Result<()> {
    println!("Analyzing Parquet file: {}", file.display());

    let writer = ParquetWriter::new();
    let file_info = writer.get_file_info(&file)?;
    let records = writer.read_records(&file)?;

    for record in &records {
        record.validate_relationships()?;
    }

    let groups: std::collections::BTreeSet<&str> =
        records.iter().map(|r| r.country.as_str()).collect();
    let observations: u64 = records.iter().map(|r| r.count as u64).sum();

    println!("\n{}", file_info.summary());
    println!("\nRecord Summary:");
    println!("- Records: {} (all valid)", records.len());
    println!(
        "- Groups: {}",
        groups.into_iter().collect::<Vec<_>>().join(" | ")
    );
    println!("- Observations summarized: {}", observations);
    let periods = records.iter().map(|r| (r.year, r.month));
    if let (Some(first), Some(last)) = (periods.clone().min(), periods.max()) {
        println!(
            "- Period: {}/{:02} to {}/{:02}",
            first.0, first.1, last.0, last.1
        );
    }

    if sample > 0 {
        println!("\nSample Records (showing {} records):", sample.min(records.len()));
        for (i, record) in records.iter().take(sample).enumerate() {
            println!(
                "{}. {} {}/{:02}: avg={:.2}, min={:.2}, max={:.2}, median={:.2}, sd={:.2} (n={})",
                i + 1,
                record.country,
                record.year,
                record.month,
                record.avg_temp,
                record.min_temp,
                record.max_temp,
                record.median_temp,
                record.std_dev,
                record.count
            );
        }
    }

    Ok(())
}
