use std::io::Write;

use anyhow::{Context, Result};
use clap::ValueEnum;
use comfy_table::Table;
use cur_report_core::{summary::ReportSummary, ConsumptionRecord};
use serde_json::json;

const RECORD_HEADERS: [&str; 5] = [
    "Servicio",
    "CodigoServicio",
    "TipoDeUso",
    "Unidad",
    "CantidadConsumida",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
    Csv,
}

pub fn render_report<W: Write>(
    records: &[ConsumptionRecord],
    summary: Option<&ReportSummary>,
    format: OutputFormat,
    mut out: W,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let value = match summary {
                Some(summary) => json!({ "records": records, "summary": summary }),
                None => serde_json::to_value(records)?,
            };
            serde_json::to_writer_pretty(&mut out, &value).context("failed to write JSON report")?;
            writeln!(out)?;
        }
        OutputFormat::Table => {
            writeln!(out, "{}", records_table(records))?;
            if let Some(summary) = summary {
                writeln!(out, "{}", summary_table(summary))?;
            }
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(&mut out);
            // `serialize` only emits headers alongside the first row.
            if records.is_empty() {
                writer.write_record(RECORD_HEADERS).context("failed to write CSV header")?;
            }
            for record in records {
                writer.serialize(record).context("failed to write CSV row")?;
            }
            writer.flush()?;
        }
    }
    Ok(())
}

fn records_table(records: &[ConsumptionRecord]) -> Table {
    let mut table = Table::new();
    table.set_header(RECORD_HEADERS.to_vec());
    for record in records {
        table.add_row(vec![
            record.service.clone(),
            record.service_code.clone().unwrap_or_default(),
            record.usage_type.clone().unwrap_or_default(),
            record.unit.clone().unwrap_or_default(),
            record.usage_amount.to_string(),
        ]);
    }
    table
}

fn summary_table(summary: &ReportSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Unit", "Total", "Services", "Usage types", "Records"]);
    for unit in &summary.units {
        table.add_row(vec![
            unit.unit.clone(),
            unit.total_consumption.to_string(),
            unit.services.to_string(),
            unit.usage_types.to_string(),
            unit.records.to_string(),
        ]);
    }
    table
}
