use crate::models::stats::{mean, sample_std_dev};

/// Drop values further than `threshold` sample standard deviations from the
/// mean.
///
/// Mean and standard deviation are computed once over the full input; the
/// filter is not iterated. Inputs with fewer than two values come back
/// unchanged. A non-positive threshold keeps only values equal to the mean,
/// or everything when the standard deviation is zero.
///
/// Typical thresholds:
/// - 2.0: moderate, removes ~5% of normally distributed data
/// - 3.0: conservative, removes ~0.3%
pub fn remove_outliers(values: &[f64], threshold: f64) -> Vec<f64> {
    if values.len() < 2 {
        return values.to_vec();
    }

    let mean_val = mean(values);
    let limit = threshold * sample_std_dev(values);

    values
        .iter()
        .filter(|&&v| (v - mean_val).abs() <= limit)
        .copied()
        .collect()
}
