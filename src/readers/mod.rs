pub mod observation_reader;

pub use observation_reader::{ObservationReader, SourceFormat, SourceTable};
