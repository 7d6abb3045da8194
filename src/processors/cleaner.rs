use crate::utils::constants::{MAX_VALID_TEMP, MIN_VALID_TEMP};

/// Validate a raw Celsius reading.
///
/// Returns `None` for non-finite values (sensor or parse failures) and for
/// values outside the plausible surface range [-100, 70] °C. Anything else
/// passes through unchanged.
pub fn clean(temp: f64) -> Option<f64> {
    if !temp.is_finite() {
        return None;
    }

    if !(MIN_VALID_TEMP..=MAX_VALID_TEMP).contains(&temp) {
        return None;
    }

    Some(temp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_in_bounds_pass_unchanged() {
        for temp in [-100.0, -99.99, -12.3, 0.0, -0.0, 21.7, 69.999, 70.0] {
            assert_eq!(clean(temp), Some(temp));
        }
    }

    #[test]
    fn test_values_out_of_bounds_are_dropped() {
        for temp in [-100.0001, -273.15, 70.0001, 500.0, f64::MAX, f64::MIN] {
            assert_eq!(clean(temp), None, "{} should be dropped", temp);
        }
    }

    #[test]
    fn test_non_finite_values_are_dropped() {
        assert_eq!(clean(f64::NAN), None);
        assert_eq!(clean(f64::INFINITY), None);
        assert_eq!(clean(f64::NEG_INFINITY), None);
    }
}
