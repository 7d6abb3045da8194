pub mod observation;
pub mod stats;
pub mod temperature;

pub use observation::{CleanedObservation, GroupKey, RawObservation};
pub use stats::StatsRecord;
pub use temperature::{convert, TemperatureUnit};
