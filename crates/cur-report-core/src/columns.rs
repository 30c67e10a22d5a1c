//! Column names of the billing export and of the generated report.

pub const LINE_ITEM_TYPE: &str = "line_item_line_item_type";
pub const USAGE_AMOUNT: &str = "line_item_usage_amount";
pub const PRODUCT_CODE: &str = "line_item_product_code";
pub const USAGE_TYPE: &str = "line_item_usage_type";
pub const PRICING_UNIT: &str = "pricing_unit";

/// Human readable service name columns, highest priority first.
pub const SERVICE_NAME_CANDIDATES: [&str; 2] = ["product.product_name", "product_name"];

pub const REQUIRED_COLUMNS: [&str; 5] = [
    LINE_ITEM_TYPE,
    USAGE_AMOUNT,
    PRODUCT_CODE,
    USAGE_TYPE,
    PRICING_UNIT,
];

/// String columns scrubbed during sanitization.
pub const SANITIZED_COLUMNS: [&str; 3] = [PRODUCT_CODE, USAGE_TYPE, PRICING_UNIT];

/// Line item kinds that represent metered consumption.
pub const USAGE_LINE_ITEM_TYPES: [&str; 3] = ["Usage", "SavingsPlanCoveredUsage", "DiscountedUsage"];

/// Working column holding the resolved service label before the rename.
pub const EFFECTIVE_SERVICE_NAME: &str = "EffectiveServiceName";

pub const OUT_SERVICE: &str = "Servicio";
pub const OUT_SERVICE_CODE: &str = "CodigoServicio";
pub const OUT_USAGE_TYPE: &str = "TipoDeUso";
pub const OUT_UNIT: &str = "Unidad";
pub const OUT_AMOUNT: &str = "CantidadConsumida";
