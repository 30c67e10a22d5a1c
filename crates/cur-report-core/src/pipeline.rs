use tracing::{info, warn};

use crate::aggregation::aggregate;
use crate::config::ProcessingConfig;
use crate::error::Result;
use crate::ingestion::read_table;
use crate::report::ConsumptionRecord;
use crate::validation::sanitize;

/// Parses, sanitizes and aggregates one uploaded billing file.
///
/// `Ok` carries the report, which is empty when the file holds no usage line
/// items. Every failure along the way is returned as a [`crate::ReportError`].
pub fn process_parquet_bytes(
    contents: &[u8],
    config: &ProcessingConfig,
) -> Result<Vec<ConsumptionRecord>> {
    let result = read_table(contents)
        .and_then(|df| sanitize(df, config))
        .and_then(|df| aggregate(&df, config));

    match &result {
        Ok(records) => info!(records = records.len(), "consumption report generated"),
        Err(err) => warn!(kind = err.kind(), error = %err, "failed to process Parquet file"),
    }

    result
}
