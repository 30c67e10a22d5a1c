use polars::prelude::*;
use tracing::{debug, info, warn};

use crate::columns::{
    EFFECTIVE_SERVICE_NAME, LINE_ITEM_TYPE, OUT_AMOUNT, OUT_SERVICE, OUT_SERVICE_CODE, OUT_UNIT,
    OUT_USAGE_TYPE, PRICING_UNIT, PRODUCT_CODE, SERVICE_NAME_CANDIDATES, USAGE_AMOUNT,
    USAGE_LINE_ITEM_TYPES, USAGE_TYPE,
};
use crate::config::ProcessingConfig;
use crate::error::Result;
use crate::report::ConsumptionRecord;
use crate::service_name::{resolve_service_name, strip_vendor_prefix, UNKNOWN_SERVICE};
use crate::validation::{numeric_amounts, strip_chars, truncate_chars};

/// Characters removed from every string field of the report.
pub const OUTPUT_DISALLOWED_CHARS: [char; 4] = ['<', '>', '"', '\''];
pub const OUTPUT_MAX_CHARS: usize = 200;

/// Sums usage per (service name, product code, usage type, pricing unit).
///
/// Only usage line items are counted. A table without any of them yields an
/// empty report. Groups are emitted in order of first appearance.
pub fn aggregate(df: &DataFrame, config: &ProcessingConfig) -> Result<Vec<ConsumptionRecord>> {
    let usage = filter_usage_rows(df)?;
    if usage.height() == 0 {
        info!(input_rows = df.height(), "no usage line items found");
        return Ok(Vec::new());
    }

    let usage = with_effective_service_name(usage)?;

    let grouped = usage
        .lazy()
        .with_columns([
            col(PRODUCT_CODE).cast(DataType::String),
            col(USAGE_TYPE).cast(DataType::String),
            col(PRICING_UNIT).cast(DataType::String),
        ])
        .group_by_stable([
            col(EFFECTIVE_SERVICE_NAME),
            col(PRODUCT_CODE),
            col(USAGE_TYPE),
            col(PRICING_UNIT),
        ])
        .agg([col(USAGE_AMOUNT).sum()])
        .select([
            col(EFFECTIVE_SERVICE_NAME).alias(OUT_SERVICE),
            col(PRODUCT_CODE).alias(OUT_SERVICE_CODE),
            col(USAGE_TYPE).alias(OUT_USAGE_TYPE),
            col(PRICING_UNIT).alias(OUT_UNIT),
            col(USAGE_AMOUNT).alias(OUT_AMOUNT),
        ])
        .collect()?;

    let grouped = if grouped.height() > config.max_records {
        warn!(
            groups = grouped.height(),
            max_records = config.max_records,
            "report truncated to the record ceiling"
        );
        grouped.head(Some(config.max_records))
    } else {
        grouped
    };

    let records = collect_records(&grouped)?;
    debug!(
        input_rows = df.height(),
        groups = records.len(),
        "aggregated usage"
    );

    Ok(records)
}

/// Keeps usage line items whose amount is present and numeric.
fn filter_usage_rows(df: &DataFrame) -> Result<DataFrame> {
    let line_types = df.column(LINE_ITEM_TYPE)?.cast(&DataType::String)?;
    let is_usage: Vec<bool> = line_types
        .str()?
        .into_iter()
        .map(|value| matches!(value, Some(kind) if USAGE_LINE_ITEM_TYPES.contains(&kind)))
        .collect();
    let mut usage = df.filter(Series::new("is_usage".into(), is_usage).bool()?)?;
    if usage.height() == 0 {
        return Ok(usage);
    }

    let amounts = numeric_amounts(&usage)?;
    usage.with_column(amounts)?;

    let present: Vec<bool> = usage
        .column(USAGE_AMOUNT)?
        .f64()?
        .into_iter()
        .map(|value| matches!(value, Some(amount) if !amount.is_nan()))
        .collect();

    Ok(usage.filter(Series::new("present".into(), present).bool()?)?)
}

/// Adds the service label column: the preferred product name column present in
/// the table, else the product code, else [`UNKNOWN_SERVICE`].
fn with_effective_service_name(mut usage: DataFrame) -> Result<DataFrame> {
    let source = SERVICE_NAME_CANDIDATES
        .iter()
        .copied()
        .find(|name| usage.column(name).is_ok());

    let names = match source {
        Some(name) => Some(usage.column(name)?.cast(&DataType::String)?),
        None => None,
    };
    let names = names.as_ref().map(|column| column.str()).transpose()?;

    let codes = usage.column(PRODUCT_CODE)?.cast(&DataType::String)?;
    let codes = codes.str()?;

    let resolved: Vec<String> = (0..usage.height())
        .map(|idx| {
            resolve_service_name([names.and_then(|ca| ca.get(idx)), codes.get(idx)]).to_string()
        })
        .collect();

    usage.with_column(Series::new(EFFECTIVE_SERVICE_NAME.into(), resolved))?;
    Ok(usage)
}

fn collect_records(grouped: &DataFrame) -> Result<Vec<ConsumptionRecord>> {
    let services = grouped.column(OUT_SERVICE)?.str()?;
    let codes = grouped.column(OUT_SERVICE_CODE)?.str()?;
    let usage_types = grouped.column(OUT_USAGE_TYPE)?.str()?;
    let units = grouped.column(OUT_UNIT)?.str()?;
    let totals = grouped.column(OUT_AMOUNT)?.cast(&DataType::Float64)?;
    let totals = totals.f64()?;

    let records = (0..grouped.height())
        .map(|idx| {
            let service = strip_vendor_prefix(services.get(idx).unwrap_or(UNKNOWN_SERVICE));
            let amount = match totals.get(idx) {
                Some(total) if total.is_finite() => total,
                _ => 0.0,
            };

            ConsumptionRecord {
                service: clean_output_text(service),
                service_code: codes.get(idx).map(clean_output_text),
                usage_type: usage_types.get(idx).map(clean_output_text),
                unit: units.get(idx).map(clean_output_text),
                usage_amount: amount,
            }
        })
        .collect();

    Ok(records)
}

/// Final scrub of report text: truncate first, then strip.
pub fn clean_output_text(value: &str) -> String {
    strip_chars(&truncate_chars(value, OUTPUT_MAX_CHARS), &OUTPUT_DISALLOWED_CHARS)
}
