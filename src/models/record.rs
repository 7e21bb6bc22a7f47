use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// Site chosen in the selector, resolved to its directory code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    pub name: String,
    pub code: i64,
}

/// Forecast side of the comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastRecord {
    pub product_name: String,
    pub ndc: String,
    pub forecasted_order_qty: i64,
}

/// Purchase-order side of the comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActualRecord {
    pub ndc: String,
    pub ordered_qty: i64,
}

/// Row classification, highest priority first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RowStatus {
    Zero,
    Match,
    Mismatch,
}

impl RowStatus {
    /// Zero on either side wins over equality, so 0/0 is `Zero`, never `Match`.
    pub fn classify(forecasted_order_qty: i64, ordered_qty: i64) -> Self {
        if forecasted_order_qty == 0 || ordered_qty == 0 {
            RowStatus::Zero
        } else if forecasted_order_qty == ordered_qty {
            RowStatus::Match
        } else {
            RowStatus::Mismatch
        }
    }
}

/// One joined line of the comparison table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub product_name: String,
    pub ndc: String,
    pub forecasted_order_qty: i64,
    pub ordered_qty: i64,
    pub status: RowStatus,
}

/// Full forecast line as shown in the "Forecasted Orders" section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDetail {
    pub product_name: String,
    pub ndc: String,
    pub forecasted_order_qty: i64,
    pub order_uom: Option<String>,
    pub par_min: Option<BigDecimal>,
    pub par_max: Option<BigDecimal>,
    pub forecast_qty: Option<BigDecimal>,
    pub dispensed_qty: Option<BigDecimal>,
    pub pending_transfer_qty: Option<BigDecimal>,
    pub pending_ordered_qty: Option<BigDecimal>,
    pub current_inventory_qty: Option<BigDecimal>,
}

impl ForecastDetail {
    pub fn to_record(&self) -> ForecastRecord {
        ForecastRecord {
            product_name: self.product_name.clone(),
            ndc: self.ndc.clone(),
            forecasted_order_qty: self.forecasted_order_qty,
        }
    }
}

/// Purchase-order line as shown in the "Actual Orders" section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub ndc: String,
    pub drug_name: String,
    pub ordered_qty: i64,
}

impl OrderLine {
    pub fn to_record(&self) -> ActualRecord {
        ActualRecord {
            ndc: self.ndc.clone(),
            ordered_qty: self.ordered_qty,
        }
    }
}
