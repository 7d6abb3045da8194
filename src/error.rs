use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("Failed to read source table {path}: {message}")]
    SourceRead { path: String, message: String },

    #[error("Required column missing from source table: {0}")]
    MissingColumn(String),

    #[error("Unsupported temperature unit: {0}")]
    InvalidUnit(String),

    #[error("Invalid request: {0}")]
    InvalidRange(String),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Settings error: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Async task error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl ProcessingError {
    /// Wrap any failure raised while loading the input table.
    pub fn source_read(path: &std::path::Path, cause: impl std::fmt::Display) -> Self {
        ProcessingError::SourceRead {
            path: path.display().to_string(),
            message: cause.to_string(),
        }
    }

    /// True for the failures that abort a run before any row is processed.
    pub fn is_request_error(&self) -> bool {
        matches!(
            self,
            ProcessingError::InvalidUnit(_) | ProcessingError::InvalidRange(_)
        )
    }
}
