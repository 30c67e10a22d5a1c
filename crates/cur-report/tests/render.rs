use cur_report::render::{render_report, OutputFormat};
use cur_report_core::summary::ReportSummary;
use cur_report_core::ConsumptionRecord;

fn records() -> Vec<ConsumptionRecord> {
    vec![
        ConsumptionRecord {
            service: "Elastic Compute Cloud".to_string(),
            service_code: Some("AmazonEC2".to_string()),
            usage_type: Some("BoxUsage".to_string()),
            unit: Some("Hrs".to_string()),
            usage_amount: 7.0,
        },
        ConsumptionRecord {
            service: "UnknownService".to_string(),
            service_code: None,
            usage_type: Some("Requests".to_string()),
            unit: None,
            usage_amount: 1.5,
        },
    ]
}

fn render(format: OutputFormat, with_summary: bool) -> String {
    let records = records();
    let summary = with_summary.then(|| ReportSummary::from_records(&records, 5));
    let mut out = Vec::new();
    render_report(&records, summary.as_ref(), format, &mut out).expect("render");
    String::from_utf8(out).expect("utf8")
}

#[test]
fn csv_output_uses_report_headers() {
    let output = render(OutputFormat::Csv, false);
    let lines: Vec<&str> = output.lines().collect();

    assert_eq!(
        lines,
        vec![
            "Servicio,CodigoServicio,TipoDeUso,Unidad,CantidadConsumida",
            "Elastic Compute Cloud,AmazonEC2,BoxUsage,Hrs,7.0",
            "UnknownService,,Requests,,1.5",
        ]
    );
}

#[test]
fn csv_output_for_empty_report_is_header_only() {
    let mut out = Vec::new();
    render_report(&[], None, OutputFormat::Csv, &mut out).expect("render");

    assert_eq!(
        String::from_utf8(out).expect("utf8"),
        "Servicio,CodigoServicio,TipoDeUso,Unidad,CantidadConsumida\n"
    );
}

#[test]
fn json_output_wraps_summary_when_requested() {
    let plain: serde_json::Value =
        serde_json::from_str(&render(OutputFormat::Json, false)).expect("json");
    assert_eq!(plain.as_array().map(Vec::len), Some(2));

    let wrapped: serde_json::Value =
        serde_json::from_str(&render(OutputFormat::Json, true)).expect("json");
    assert_eq!(wrapped["records"][1]["CodigoServicio"], serde_json::Value::Null);
    assert_eq!(wrapped["summary"]["totalRecords"], 2);
}

#[test]
fn table_output_lists_every_service() {
    let output = render(OutputFormat::Table, true);

    assert!(output.contains("CantidadConsumida"));
    assert!(output.contains("Elastic Compute Cloud"));
    assert!(output.contains("UnknownService"));
    assert!(output.contains("Usage types"));
}
