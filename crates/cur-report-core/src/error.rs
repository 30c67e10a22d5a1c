// crates/cur-report-core/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("could not read Parquet content: {0}")]
    Format(#[source] polars::error::PolarsError),

    #[error("{0}")]
    Validation(String),

    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidConfig {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReportError {
    /// Type name reported to clients alongside the message.
    pub fn kind(&self) -> &'static str {
        match self {
            ReportError::Format(_) => "FormatError",
            ReportError::Validation(_) => "ValidationError",
            ReportError::Polars(_) => "ProcessingError",
            ReportError::InvalidConfig { .. } => "ConfigError",
            ReportError::Io(_) => "IOError",
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
