pub mod cleaner;
pub mod outlier_filter;
pub mod pipeline;

pub use cleaner::clean;
pub use outlier_filter::remove_outliers;
pub use pipeline::{
    process_file, Pipeline, PipelineSummary, TransformConfig, TransformRequest,
};
