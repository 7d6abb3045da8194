use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{ProcessingError, Result};
use crate::models::observation::GroupKey;

/// Descriptive statistics for one (label, year, month) group.
///
/// Field order here is the column order of every output format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct StatsRecord {
    #[validate(length(min = 1))]
    pub country: String,

    pub year: i32,

    #[validate(range(min = 1, max = 12))]
    pub month: u32,

    pub avg_temp: f64,
    pub min_temp: f64,
    pub max_temp: f64,
    pub std_dev: f64,
    pub median_temp: f64,
    pub count: u32,
    pub percentile_25: f64,
    pub percentile_75: f64,
    pub percentile_90: f64,
    pub percentile_95: f64,
}

impl StatsRecord {
    /// Summarize a group's values.
    ///
    /// - **Mean**: arithmetic average
    /// - **Standard deviation**: sample (n-1 divisor), 0.0 when count <= 1
    /// - **Median and percentiles**: linear interpolation at rank `p/100 * (n-1)`
    ///
    /// An empty slice yields [`StatsRecord::empty`].
    pub fn build(country: impl Into<String>, year: i32, month: u32, values: &[f64]) -> Self {
        let country = country.into();
        if values.is_empty() {
            return Self::empty(country, year, month);
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        Self {
            country,
            year,
            month,
            avg_temp: mean(values),
            min_temp: sorted[0],
            max_temp: sorted[sorted.len() - 1],
            std_dev: sample_std_dev(values),
            median_temp: median(&sorted),
            count: values.len() as u32,
            percentile_25: percentile(&sorted, 25.0),
            percentile_75: percentile(&sorted, 75.0),
            percentile_90: percentile(&sorted, 90.0),
            percentile_95: percentile(&sorted, 95.0),
        }
    }

    /// Record for a group with no values: count 0 and every statistic 0.0.
    pub fn empty(country: impl Into<String>, year: i32, month: u32) -> Self {
        Self {
            country: country.into(),
            year,
            month,
            avg_temp: 0.0,
            min_temp: 0.0,
            max_temp: 0.0,
            std_dev: 0.0,
            median_temp: 0.0,
            count: 0,
            percentile_25: 0.0,
            percentile_75: 0.0,
            percentile_90: 0.0,
            percentile_95: 0.0,
        }
    }

    pub fn group_key(&self) -> GroupKey {
        GroupKey::new(self.country.clone(), self.year, self.month)
    }

    /// Check field rules plus the ordering between the summary statistics.
    pub fn validate_relationships(&self) -> Result<()> {
        self.validate()?;

        let ordered = [
            ("min_temp", self.min_temp),
            ("percentile_25", self.percentile_25),
            ("median_temp", self.median_temp),
            ("percentile_75", self.percentile_75),
            ("percentile_90", self.percentile_90),
            ("percentile_95", self.percentile_95),
            ("max_temp", self.max_temp),
        ];
        for pair in ordered.windows(2) {
            let (lower_name, lower) = pair[0];
            let (upper_name, upper) = pair[1];
            if lower > upper {
                return Err(ProcessingError::InvalidRange(format!(
                    "{} {} > {} {} for {}/{}/{}",
                    lower_name, lower, upper_name, upper, self.country, self.year, self.month
                )));
            }
        }

        if self.std_dev < 0.0 || (self.count <= 1 && self.std_dev != 0.0) {
            return Err(ProcessingError::InvalidRange(format!(
                "std_dev {} inconsistent with count {}",
                self.std_dev, self.count
            )));
        }

        Ok(())
    }
}

/// Arithmetic mean, 0.0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n-1 divisor), 0.0 when fewer than two values.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean_val = mean(values);
    let variance =
        values.iter().map(|x| (x - mean_val).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Median of an ascending slice: the middle value, or the mean of the two
/// middle values for an even count. 0.0 for an empty slice.
pub fn median(sorted: &[f64]) -> f64 {
    let len = sorted.len();
    if len == 0 {
        return 0.0;
    }
    if len % 2 == 0 {
        (sorted[len / 2 - 1] + sorted[len / 2]) / 2.0
    } else {
        sorted[len / 2]
    }
}

/// Percentile of an ascending slice by linear interpolation between the
/// values either side of rank `p/100 * (n-1)`. 0.0 for an empty slice.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }

    let rank = (p / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;

    if lower == upper {
        return sorted[lower];
    }

    // Interpolate from the nearer end so the result stays inside [lo, hi].
    let weight = rank - lower as f64;
    let (lo, hi) = (sorted[lower], sorted[upper]);
    let diff = hi - lo;
    if weight >= 0.5 {
        hi - diff * (1.0 - weight)
    } else {
        lo + diff * weight
    }
}
