// crates/cur-report-core/src/validation.rs

use polars::prelude::*;
use tracing::debug;

use crate::columns::{REQUIRED_COLUMNS, SANITIZED_COLUMNS, USAGE_AMOUNT};
use crate::config::ProcessingConfig;
use crate::error::{ReportError, Result};

/// Characters removed from the key string columns of the input.
pub const INPUT_DISALLOWED_CHARS: [char; 5] = ['<', '>', '"', '\'', ';'];
pub const INPUT_MAX_CHARS: usize = 100;

/// Checks the table against the processing limits and scrubs the columns the
/// aggregator groups by.
///
/// Steps run in a fixed order: usage amounts are coerced to numbers, negative
/// then missing amounts are dropped, and only then are string columns cleaned.
/// A table that ends up with no rows is rejected.
pub fn sanitize(df: DataFrame, config: &ProcessingConfig) -> Result<DataFrame> {
    if df.height() > config.max_records {
        return Err(ReportError::Validation(format!(
            "Too many records: {} (maximum {})",
            df.height(),
            config.max_records
        )));
    }

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|name| df.column(name).is_err())
        .collect();
    if !missing.is_empty() {
        return Err(ReportError::Validation(format!(
            "Missing required columns: {}",
            missing.join(", ")
        )));
    }

    let input_rows = df.height();
    let mut df = df;

    let amounts = numeric_amounts(&df)?;
    let amounts = amounts.f64()?;
    let keep: Vec<bool> = amounts
        .into_iter()
        .map(|value| matches!(value, Some(amount) if !amount.is_nan() && amount >= 0.0))
        .collect();

    df.with_column(amounts.clone().into_series())?;
    let mask = Series::new("keep".into(), keep);
    let mut df = df.filter(mask.bool()?)?;

    for name in SANITIZED_COLUMNS {
        let cleaned = clean_string_column(&df, name, |value| {
            truncate_chars(&strip_chars(value, &INPUT_DISALLOWED_CHARS), INPUT_MAX_CHARS)
        })?;
        df.with_column(cleaned)?;
    }

    if df.height() == 0 {
        return Err(ReportError::Validation(
            "No valid records remain after sanitization".to_string(),
        ));
    }

    debug!(
        input_rows,
        kept_rows = df.height(),
        "sanitized billing table"
    );

    Ok(df)
}

/// Usage amounts as `Float64`. Text amounts are trimmed first; anything that
/// still fails to parse becomes null.
pub(crate) fn numeric_amounts(df: &DataFrame) -> Result<Column> {
    let column = df.column(USAGE_AMOUNT)?;
    if column.dtype() != &DataType::String {
        return Ok(column.cast(&DataType::Float64)?);
    }

    let trimmed = clean_string_column(df, USAGE_AMOUNT, |value| value.trim().to_string())?;
    Ok(Column::from(trimmed.cast(&DataType::Float64)?))
}

/// Rewrites every non-null value of a column as a string through `clean`.
pub(crate) fn clean_string_column<F>(df: &DataFrame, name: &str, clean: F) -> Result<Series>
where
    F: Fn(&str) -> String,
{
    let column = df.column(name)?.cast(&DataType::String)?;
    let values: Vec<Option<String>> = column
        .str()?
        .into_iter()
        .map(|value| value.map(&clean))
        .collect();

    Ok(Series::new(
        name.into(),
        values
            .iter()
            .map(|opt| opt.as_deref())
            .collect::<Vec<Option<&str>>>(),
    ))
}

pub fn strip_chars(value: &str, disallowed: &[char]) -> String {
    value.chars().filter(|c| !disallowed.contains(c)).collect()
}

/// Keeps the first `max` characters (not bytes) of `value`.
pub fn truncate_chars(value: &str, max: usize) -> String {
    match value.char_indices().nth(max) {
        Some((byte_idx, _)) => value[..byte_idx].to_string(),
        None => value.to_string(),
    }
}
