use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::report::ConsumptionRecord;

pub const DEFAULT_TOP_ITEMS: usize = 15;
pub const UNKNOWN_UNIT: &str = "Unknown";

/// Consumption totals for one pricing unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitBreakdown {
    pub unit: String,
    pub total_consumption: f64,
    pub services: usize,
    pub usage_types: usize,
    pub records: usize,
}

/// Dashboard figures derived from a finished report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_records: usize,
    pub total_services: usize,
    pub total_units: usize,
    pub unique_usage_types: usize,
    pub units: Vec<UnitBreakdown>,
    pub top_items: Vec<ConsumptionRecord>,
}

#[derive(Default)]
struct UnitAccumulator<'a> {
    total: f64,
    services: BTreeSet<&'a str>,
    usage_types: BTreeSet<Option<&'a str>>,
    records: usize,
}

impl ReportSummary {
    pub fn from_records(records: &[ConsumptionRecord], top_n: usize) -> Self {
        let mut per_unit: BTreeMap<&str, UnitAccumulator<'_>> = BTreeMap::new();
        let mut services = BTreeSet::new();
        let mut usage_types = BTreeSet::new();

        for record in records {
            services.insert(record.service.as_str());
            usage_types.insert(record.usage_type.as_deref());

            let unit = record.unit.as_deref().unwrap_or(UNKNOWN_UNIT);
            let entry = per_unit.entry(unit).or_default();
            entry.total += record.usage_amount;
            entry.services.insert(record.service.as_str());
            entry.usage_types.insert(record.usage_type.as_deref());
            entry.records += 1;
        }

        let units: Vec<UnitBreakdown> = per_unit
            .into_iter()
            .map(|(unit, acc)| UnitBreakdown {
                unit: unit.to_string(),
                total_consumption: acc.total,
                services: acc.services.len(),
                usage_types: acc.usage_types.len(),
                records: acc.records,
            })
            .collect();

        let mut top_items = records.to_vec();
        top_items.sort_by(|a, b| b.usage_amount.total_cmp(&a.usage_amount));
        top_items.truncate(top_n);

        Self {
            total_records: records.len(),
            total_services: services.len(),
            total_units: units.len(),
            unique_usage_types: usage_types.len(),
            units,
            top_items,
        }
    }
}
