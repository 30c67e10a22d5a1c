use cur_report_core::validation::sanitize;
use cur_report_core::{ProcessingConfig, ReportError};
use polars::prelude::*;

fn billing_frame(amounts: &[&str]) -> DataFrame {
    let rows = amounts.len();
    df![
        "line_item_line_item_type" => vec!["Usage"; rows],
        "line_item_usage_amount" => amounts.to_vec(),
        "line_item_product_code" => vec!["AmazonEC2"; rows],
        "line_item_usage_type" => vec!["BoxUsage"; rows],
        "pricing_unit" => vec!["Hrs"; rows],
    ]
    .expect("df")
}

fn expect_validation(result: Result<DataFrame, ReportError>) -> String {
    match result {
        Err(ReportError::Validation(message)) => message,
        Err(other) => panic!("expected validation error, got {other:?}"),
        Ok(df) => panic!("expected validation error, got {} rows", df.height()),
    }
}

#[test]
fn sanitize_drops_negative_and_unparseable_amounts() -> anyhow::Result<()> {
    let df = billing_frame(&["5.0", "abc", "-1", "2"]);

    let sanitized = sanitize(df, &ProcessingConfig::default())?;

    assert_eq!(sanitized.height(), 2);
    let amounts: Vec<Option<f64>> = sanitized
        .column("line_item_usage_amount")?
        .f64()?
        .into_iter()
        .collect();
    assert_eq!(amounts, vec![Some(5.0), Some(2.0)]);
    Ok(())
}

#[test]
fn sanitize_keeps_zero_amounts() -> anyhow::Result<()> {
    let sanitized = sanitize(billing_frame(&["0"]), &ProcessingConfig::default())?;
    assert_eq!(sanitized.height(), 1);
    Ok(())
}

#[test]
fn sanitize_drops_missing_numeric_amounts() -> anyhow::Result<()> {
    let df = df![
        "line_item_line_item_type" => ["Usage", "Usage", "Usage"],
        "line_item_usage_amount" => [Some(1.5), None, Some(f64::NAN)],
        "line_item_product_code" => ["AmazonS3", "AmazonS3", "AmazonS3"],
        "line_item_usage_type" => ["TimedStorage", "TimedStorage", "TimedStorage"],
        "pricing_unit" => ["GB-Mo", "GB-Mo", "GB-Mo"],
    ]?;

    let sanitized = sanitize(df, &ProcessingConfig::default())?;

    assert_eq!(sanitized.height(), 1);
    Ok(())
}

#[test]
fn sanitize_strips_and_truncates_key_columns() -> anyhow::Result<()> {
    let long_usage_type = format!("{}{}", "x".repeat(99), "yz<>");
    let df = df![
        "line_item_line_item_type" => ["Usage"],
        "line_item_usage_amount" => [1.0],
        "line_item_product_code" => ["<Amazon;EC2>"],
        "line_item_usage_type" => [long_usage_type.as_str()],
        "pricing_unit" => [r#""Hrs'"#],
    ]?;

    let sanitized = sanitize(df, &ProcessingConfig::default())?;

    let code = sanitized.column("line_item_product_code")?.str()?.get(0);
    let usage_type = sanitized.column("line_item_usage_type")?.str()?.get(0);
    let unit = sanitized.column("pricing_unit")?.str()?.get(0);

    assert_eq!(code, Some("AmazonEC2"));
    assert_eq!(usage_type.map(|value| value.chars().count()), Some(100));
    assert_eq!(usage_type, Some(format!("{}y", "x".repeat(99)).as_str()));
    assert_eq!(unit, Some("Hrs"));
    Ok(())
}

#[test]
fn sanitize_strips_before_truncating() -> anyhow::Result<()> {
    let padded = format!("<{}", "x".repeat(100));
    let df = df![
        "line_item_line_item_type" => ["Usage"],
        "line_item_usage_amount" => [1.0],
        "line_item_product_code" => ["AmazonEC2"],
        "line_item_usage_type" => [padded.as_str()],
        "pricing_unit" => ["Hrs"],
    ]?;

    let sanitized = sanitize(df, &ProcessingConfig::default())?;

    let expected = "x".repeat(100);
    assert_eq!(
        sanitized.column("line_item_usage_type")?.str()?.get(0),
        Some(expected.as_str())
    );
    Ok(())
}

#[test]
fn sanitize_trims_padded_text_amounts() -> anyhow::Result<()> {
    let sanitized = sanitize(
        billing_frame(&["5", " 6 ", " -0.5", "7 "]),
        &ProcessingConfig::default(),
    )?;

    let amounts: Vec<Option<f64>> = sanitized
        .column("line_item_usage_amount")?
        .f64()?
        .into_iter()
        .collect();
    assert_eq!(amounts, vec![Some(5.0), Some(6.0), Some(7.0)]);
    Ok(())
}

#[test]
fn sanitize_leaves_other_columns_untouched() -> anyhow::Result<()> {
    let df = df![
        "line_item_line_item_type" => ["<Usage>"],
        "line_item_usage_amount" => [1.0],
        "line_item_product_code" => ["AmazonEC2"],
        "line_item_usage_type" => ["BoxUsage"],
        "pricing_unit" => ["Hrs"],
        "product_name" => ["Amazon \"Elastic\" Compute Cloud;"],
    ]?;

    let sanitized = sanitize(df, &ProcessingConfig::default())?;

    assert_eq!(
        sanitized.column("product_name")?.str()?.get(0),
        Some("Amazon \"Elastic\" Compute Cloud;")
    );
    assert_eq!(
        sanitized.column("line_item_line_item_type")?.str()?.get(0),
        Some("<Usage>")
    );
    Ok(())
}

#[test]
fn sanitize_reports_missing_pricing_unit() -> anyhow::Result<()> {
    let df = df![
        "line_item_line_item_type" => ["Usage"],
        "line_item_usage_amount" => [5.0],
        "line_item_product_code" => ["AmazonEC2"],
        "line_item_usage_type" => ["BoxUsage"],
    ]?;

    let message = expect_validation(sanitize(df, &ProcessingConfig::default()));

    assert!(message.contains("pricing_unit"), "message: {message}");
    assert!(!message.contains("line_item_usage_type"), "message: {message}");
    Ok(())
}

#[test]
fn sanitize_lists_every_missing_column() -> anyhow::Result<()> {
    let df = df!["unrelated" => [1i64]]?;

    let message = expect_validation(sanitize(df, &ProcessingConfig::default()));

    for column in [
        "line_item_line_item_type",
        "line_item_usage_amount",
        "line_item_product_code",
        "line_item_usage_type",
        "pricing_unit",
    ] {
        assert!(message.contains(column), "missing {column} in: {message}");
    }
    Ok(())
}

#[test]
fn sanitize_enforces_record_ceiling() {
    let config = ProcessingConfig { max_records: 2 };

    let at_limit = sanitize(billing_frame(&["1", "2"]), &config);
    assert!(at_limit.is_ok());

    let message = expect_validation(sanitize(billing_frame(&["1", "2", "3"]), &config));
    assert!(message.contains("Too many records"), "message: {message}");
}

#[test]
fn sanitize_rejects_table_without_valid_rows() {
    let message = expect_validation(sanitize(
        billing_frame(&["-5", "n/a"]),
        &ProcessingConfig::default(),
    ));
    assert!(message.contains("No valid records"), "message: {message}");
}
