//! Loosely typed query results and their coercion into typed records.
//!
//! The source tables allow nulls and store quantities as numerics, so every
//! column arrives optional. Nulls become empty text or a zero quantity here;
//! anything that cannot be expressed as a whole number is rejected with a
//! [`ValidationError`] before the reconciler ever sees it.

use crate::error::{Side, ValidationError};
use crate::models::{ForecastDetail, OrderLine};
use bigdecimal::{BigDecimal, ToPrimitive};
use sqlx::FromRow;

/// Site dimension lookup result
#[derive(Debug, Clone, FromRow)]
pub struct SiteRow {
    pub site_code: i64,
}

/// Forecast detail joined to its forecast history
#[derive(Debug, Clone, Default, FromRow)]
pub struct ForecastDetailRow {
    pub product_name: Option<String>,
    pub ndc: Option<String>,
    pub order_qty: Option<BigDecimal>,
    pub order_uom: Option<String>,
    pub par_min: Option<BigDecimal>,
    pub par_max: Option<BigDecimal>,
    pub forecast_qty: Option<BigDecimal>,
    pub dispensed_qty: Option<BigDecimal>,
    pub pending_transfer_qty: Option<BigDecimal>,
    pub pending_ordered_qty: Option<BigDecimal>,
    pub current_inventory_qty: Option<BigDecimal>,
}

/// Latest status of one purchase order detail
#[derive(Debug, Clone, FromRow)]
pub struct OrderStatusRow {
    pub order_status_id: Option<i32>,
    pub purchase_order_id: i64,
}

/// Purchase-order line item
#[derive(Debug, Clone, Default, FromRow)]
pub struct OrderLineRow {
    pub ndc: Option<String>,
    pub drug_name: Option<String>,
    pub quantity: Option<BigDecimal>,
}

impl ForecastDetailRow {
    pub fn into_detail(self, index: usize) -> Result<ForecastDetail, ValidationError> {
        let ndc = text(self.ndc);
        let forecasted_order_qty =
            whole_quantity(self.order_qty.as_ref(), Side::Forecast, index, &ndc)?;
        Ok(ForecastDetail {
            product_name: text(self.product_name),
            ndc,
            forecasted_order_qty,
            order_uom: self.order_uom.map(|u| u.trim().to_string()),
            par_min: self.par_min,
            par_max: self.par_max,
            forecast_qty: self.forecast_qty,
            dispensed_qty: self.dispensed_qty,
            pending_transfer_qty: self.pending_transfer_qty,
            pending_ordered_qty: self.pending_ordered_qty,
            current_inventory_qty: self.current_inventory_qty,
        })
    }
}

impl OrderLineRow {
    pub fn into_line(self, index: usize) -> Result<OrderLine, ValidationError> {
        let ndc = text(self.ndc);
        let ordered_qty = whole_quantity(self.quantity.as_ref(), Side::Actual, index, &ndc)?;
        Ok(OrderLine {
            ndc,
            drug_name: text(self.drug_name),
            ordered_qty,
        })
    }
}

/// Coerce a whole result set, stopping at the first bad row.
pub fn coerce_forecast(rows: Vec<ForecastDetailRow>) -> Result<Vec<ForecastDetail>, ValidationError> {
    rows.into_iter()
        .enumerate()
        .map(|(idx, row)| row.into_detail(idx))
        .collect()
}

pub fn coerce_order_lines(rows: Vec<OrderLineRow>) -> Result<Vec<OrderLine>, ValidationError> {
    rows.into_iter()
        .enumerate()
        .map(|(idx, row)| row.into_line(idx))
        .collect()
}

fn text(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

/// Null counts as zero. Sign is kept so the reconciler can reject negatives.
fn whole_quantity(
    value: Option<&BigDecimal>,
    side: Side,
    index: usize,
    ndc: &str,
) -> Result<i64, ValidationError> {
    let Some(value) = value else {
        return Ok(0);
    };

    let truncated = value.with_scale(0);
    if &truncated != value {
        return Err(non_integral(side, index, ndc, value));
    }
    truncated
        .to_i64()
        .ok_or_else(|| non_integral(side, index, ndc, value))
}

fn non_integral(side: Side, index: usize, ndc: &str, value: &BigDecimal) -> ValidationError {
    ValidationError::NonIntegralQuantity {
        side,
        index,
        ndc: ndc.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn null_quantity_becomes_zero_and_text_is_trimmed() {
        let row = OrderLineRow {
            ndc: Some(" 00093-7146 ".into()),
            drug_name: None,
            quantity: None,
        };
        let line = row.into_line(0).unwrap();
        assert_eq!(line.ndc, "00093-7146");
        assert_eq!(line.drug_name, "");
        assert_eq!(line.ordered_qty, 0);
    }

    #[test]
    fn numeric_with_trailing_zero_scale_is_whole() {
        let row = ForecastDetailRow {
            product_name: Some("Heparin".into()),
            ndc: Some("NDC001".into()),
            order_qty: Some(dec("12.000")),
            ..Default::default()
        };
        let detail = row.into_detail(0).unwrap();
        assert_eq!(detail.forecasted_order_qty, 12);
        assert_eq!(detail.to_record().product_name, "Heparin");
    }

    #[test]
    fn fractional_quantity_is_rejected_with_row_index() {
        let rows = vec![
            OrderLineRow {
                ndc: Some("A".into()),
                quantity: Some(dec("1")),
                ..Default::default()
            },
            OrderLineRow {
                ndc: Some("B".into()),
                quantity: Some(dec("2.5")),
                ..Default::default()
            },
        ];
        let err = coerce_order_lines(rows).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NonIntegralQuantity {
                side: Side::Actual,
                index: 1,
                ndc: "B".into(),
                value: "2.5".into(),
            }
        );
    }

    #[test]
    fn negative_quantity_passes_through_coercion() {
        let row = OrderLineRow {
            ndc: Some("C".into()),
            quantity: Some(dec("-3")),
            ..Default::default()
        };
        assert_eq!(row.into_line(0).unwrap().ordered_qty, -3);
    }
}
