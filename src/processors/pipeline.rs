use crate::error::{ProcessingError, Result};
use crate::models::{CleanedObservation, GroupKey, RawObservation, StatsRecord, TemperatureUnit};
use crate::processors::cleaner::clean;
use crate::processors::outlier_filter::remove_outliers;
use crate::readers::ObservationReader;
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{debug, info};

/// How readings are converted, filtered and grouped.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformConfig {
    pub unit: TemperatureUnit,
    pub threshold: Option<f64>,
    pub aggregate: bool,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            unit: TemperatureUnit::Celsius,
            threshold: None,
            aggregate: false,
        }
    }
}

impl TransformConfig {
    /// Threshold actually applied per group. An explicit `0.0` disables
    /// filtering the same way an absent threshold does.
    pub fn outlier_threshold(&self) -> Option<f64> {
        self.threshold.filter(|t| *t != 0.0)
    }
}

/// Which rows a run covers.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformRequest {
    pub countries: Vec<String>,
    pub start_year: i32,
    pub end_year: i32,
}

impl TransformRequest {
    pub fn new(countries: Vec<String>, start_year: i32, end_year: i32) -> Self {
        Self {
            countries,
            start_year,
            end_year,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.countries.is_empty() {
            return Err(ProcessingError::InvalidRange(
                "at least one country code is required".to_string(),
            ));
        }

        if self.start_year > self.end_year {
            return Err(ProcessingError::InvalidRange(format!(
                "start year {} is after end year {}",
                self.start_year, self.end_year
            )));
        }

        Ok(())
    }

    /// Label shared by every group in aggregate mode: the requested
    /// countries joined with commas, in the order given.
    pub fn aggregate_label(&self) -> String {
        self.countries.join(",")
    }

    pub fn contains_year(&self, year: i32) -> bool {
        (self.start_year..=self.end_year).contains(&year)
    }
}

/// Row and group counts collected during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineSummary {
    pub total_rows: usize,
    pub matched_rows: usize,
    pub dropped_rows: usize,
    pub groups: usize,
    pub outliers_removed: usize,
    pub empty_groups: usize,
    pub records: usize,
}

impl PipelineSummary {
    pub fn summary(&self) -> String {
        format!(
            "Pipeline Summary:\n\
            - Total rows: {}\n\
            - Rows matching filters: {}\n\
            - Rows dropped by cleaning: {}\n\
            - Groups: {}\n\
            - Outliers removed: {}\n\
            - Groups emptied by outlier removal: {}\n\
            - Records produced: {}",
            self.total_rows,
            self.matched_rows,
            self.dropped_rows,
            self.groups,
            self.outliers_removed,
            self.empty_groups,
            self.records
        )
    }
}

pub struct Pipeline {
    config: TransformConfig,
    max_workers: usize,
}

impl Pipeline {
    pub fn new(config: TransformConfig) -> Self {
        Self {
            config,
            max_workers: num_cpus::get(),
        }
    }

    pub fn with_unit(mut self, unit: TemperatureUnit) -> Self {
        self.config.unit = unit;
        self
    }

    pub fn with_threshold(mut self, threshold: Option<f64>) -> Self {
        self.config.threshold = threshold;
        self
    }

    pub fn with_aggregate(mut self, aggregate: bool) -> Self {
        self.config.aggregate = aggregate;
        self
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    /// Run every stage over an in-memory table and return the sorted records.
    ///
    /// Fails only when the request itself is invalid; rows and groups that
    /// do not survive cleaning or outlier removal are dropped silently and
    /// counted in the returned [`PipelineSummary`].
    pub fn run(
        &self,
        observations: &[RawObservation],
        request: &TransformRequest,
    ) -> Result<(Vec<StatsRecord>, PipelineSummary)> {
        request.validate()?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .build()
            .map_err(|e| ProcessingError::Config(e.to_string()))?;

        Ok(pool.install(|| self.run_stages(observations, request)))
    }

    fn run_stages(
        &self,
        observations: &[RawObservation],
        request: &TransformRequest,
    ) -> (Vec<StatsRecord>, PipelineSummary) {
        let mut summary = PipelineSummary {
            total_rows: observations.len(),
            ..Default::default()
        };

        let matched = self.filter_rows(observations, request);
        summary.matched_rows = matched.len();
        info!(
            "Processed {} total rows, {} matched filters",
            summary.total_rows, summary.matched_rows
        );

        let cleaned = self.clean_and_label(&matched, request);
        summary.dropped_rows = summary.matched_rows - cleaned.len();
        if summary.dropped_rows > 0 {
            debug!("Dropped {} invalid temperature readings", summary.dropped_rows);
        }

        let groups = group_by_key(cleaned);
        summary.groups = groups.len();
        debug!("Found {} unique country-month combinations", summary.groups);

        if let Some(threshold) = self.config.outlier_threshold() {
            debug!("Outlier detection enabled with threshold: {}", threshold);
        }

        let (mut records, outliers_removed, empty_groups) = self.summarize(groups);
        summary.outliers_removed = outliers_removed;
        summary.empty_groups = empty_groups;
        if outliers_removed > 0 {
            debug!(
                "Removed {} total outliers across all records",
                outliers_removed
            );
        }

        debug!("Sorting {} results", records.len());
        sort_records(&mut records);
        summary.records = records.len();

        (records, summary)
    }

    /// Keep rows for a requested country inside the year range.
    pub fn filter_rows<'a>(
        &self,
        observations: &'a [RawObservation],
        request: &TransformRequest,
    ) -> Vec<&'a RawObservation> {
        let countries: HashSet<&str> = request.countries.iter().map(String::as_str).collect();

        observations
            .par_iter()
            .filter(|obs| countries.contains(obs.country.as_str()) && request.contains_year(obs.year()))
            .collect()
    }

    /// Clean, convert and label each row. Rows failing cleaning are dropped.
    pub fn clean_and_label(
        &self,
        rows: &[&RawObservation],
        request: &TransformRequest,
    ) -> Vec<CleanedObservation> {
        let aggregate_label = self.config.aggregate.then(|| request.aggregate_label());
        let unit = self.config.unit;

        rows.par_iter()
            .filter_map(|obs| {
                let celsius = obs.temperature.and_then(clean)?;
                let label = match &aggregate_label {
                    Some(label) => label.clone(),
                    None => obs.country.clone(),
                };
                Some(CleanedObservation {
                    key: GroupKey::new(label, obs.year(), obs.month()),
                    value: unit.convert(celsius),
                })
            })
            .collect()
    }

    /// Apply outlier removal and build one record per non-empty group.
    ///
    /// Returns the records (unsorted), the number of values removed as
    /// outliers and the number of groups that ended up empty.
    pub fn summarize(&self, groups: HashMap<GroupKey, Vec<f64>>) -> (Vec<StatsRecord>, usize, usize) {
        let threshold = self.config.outlier_threshold();

        let outcomes: Vec<(Option<StatsRecord>, usize)> = groups
            .into_par_iter()
            .map(|(key, values)| {
                let original_count = values.len();
                let kept = match threshold {
                    Some(threshold) => remove_outliers(&values, threshold),
                    None => values,
                };
                let removed = original_count - kept.len();
                if removed > 0 {
                    debug!("Removed {} outliers for {}", removed, key);
                }

                if kept.is_empty() {
                    return (None, removed);
                }

                let record = StatsRecord::build(key.label, key.year, key.month, &kept);
                (Some(record), removed)
            })
            .collect();

        let mut records = Vec::with_capacity(outcomes.len());
        let mut outliers_removed = 0;
        let mut empty_groups = 0;
        for (record, removed) in outcomes {
            outliers_removed += removed;
            match record {
                Some(record) => records.push(record),
                None => empty_groups += 1,
            }
        }

        (records, outliers_removed, empty_groups)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(TransformConfig::default())
    }
}

/// Partition cleaned readings by key. Values inside each group keep their
/// input order, so results do not depend on how the work was split.
pub fn group_by_key(cleaned: Vec<CleanedObservation>) -> HashMap<GroupKey, Vec<f64>> {
    cleaned
        .into_par_iter()
        .fold(HashMap::new, |mut acc: HashMap<GroupKey, Vec<f64>>, obs| {
            acc.entry(obs.key).or_default().push(obs.value);
            acc
        })
        .reduce(HashMap::new, |mut left, right| {
            for (key, values) in right {
                left.entry(key).or_default().extend(values);
            }
            left
        })
}

/// Sort by [`GroupKey`] order: label, then year, then month.
pub fn sort_records(records: &mut [StatsRecord]) {
    records.sort_by_cached_key(StatsRecord::group_key);
}

/// Load a table from disk and run the pipeline over it.
pub fn process_file(
    path: &Path,
    request: &TransformRequest,
    pipeline: &Pipeline,
) -> Result<(Vec<StatsRecord>, PipelineSummary)> {
    request.validate()?;

    debug!("Reading source table: {}", path.display());
    let reader = ObservationReader::new();
    let observations = reader.read_observations(path)?;

    pipeline.run(&observations, request)
}
