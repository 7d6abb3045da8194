use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// One input row: a daily reading for a country, in degrees Celsius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawObservation {
    pub country: String,
    pub date: NaiveDate,
    pub temperature: Option<f64>,
}

impl RawObservation {
    pub fn new(country: impl Into<String>, date: NaiveDate, temperature: Option<f64>) -> Self {
        Self {
            country: country.into(),
            date,
            temperature,
        }
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn month(&self) -> u32 {
        self.date.month()
    }
}

/// Grouping key: (label, year, month).
///
/// Ordering is lexicographic on the label, then numeric on year and month.
/// Output records are sorted through this key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    pub label: String,
    pub year: i32,
    pub month: u32,
}

impl GroupKey {
    pub fn new(label: impl Into<String>, year: i32, month: u32) -> Self {
        Self {
            label: label.into(),
            year,
            month,
        }
    }
}

impl std::fmt::Display for GroupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.label, self.year, self.month)
    }
}

/// A reading that survived cleaning, converted to the output unit and labelled
/// with the group it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedObservation {
    pub key: GroupKey,
    pub value: f64,
}
