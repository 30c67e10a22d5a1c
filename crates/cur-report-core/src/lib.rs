pub mod aggregation;
pub mod columns;
pub mod config;
pub mod error;
pub mod ingestion;
pub mod pipeline;
pub mod report;
pub mod service_name;
pub mod summary;
pub mod validation;

pub use config::{ProcessingConfig, ServiceConfig, UploadLimits};
pub use error::{ReportError, Result};
pub use pipeline::process_parquet_bytes;
pub use report::{ConsumptionRecord, ErrorBody};
