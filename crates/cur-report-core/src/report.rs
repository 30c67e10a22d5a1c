use serde::{Deserialize, Serialize};

use crate::error::ReportError;

/// One aggregated row of the consumption report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionRecord {
    #[serde(rename = "Servicio")]
    pub service: String,
    #[serde(rename = "CodigoServicio")]
    pub service_code: Option<String>,
    #[serde(rename = "TipoDeUso")]
    pub usage_type: Option<String>,
    #[serde(rename = "Unidad")]
    pub unit: Option<String>,
    #[serde(rename = "CantidadConsumida")]
    pub usage_amount: f64,
}

impl ConsumptionRecord {
    /// Tuple used to compare reports independent of group order.
    pub fn group_key(&self) -> (&str, Option<&str>, Option<&str>, Option<&str>) {
        (
            self.service.as_str(),
            self.service_code.as_deref(),
            self.usage_type.as_deref(),
            self.unit.as_deref(),
        )
    }
}

/// Legacy `{"error": ...}` payload returned when processing fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl From<&ReportError> for ErrorBody {
    fn from(err: &ReportError) -> Self {
        Self {
            error: format!("Failed to process Parquet file: {} - {}", err.kind(), err),
        }
    }
}
