use crate::error::{Side, ValidationError};
use crate::models::{ActualRecord, ComparisonRow, ForecastRecord, RowStatus};
use indexmap::IndexMap;

/// Per-NDC accumulator for the outer join
#[derive(Debug, Default)]
struct JoinEntry {
    product_name: String,
    forecasted_order_qty: i64,
    ordered_qty: i64,
}

/// Join forecast and actual sets on NDC and classify each row.
///
/// Duplicate NDCs on one side are summed; the first non-empty product name
/// wins. An NDC missing from the forecast gets an empty product name. Output
/// is sorted by product name, then NDC.
pub fn reconcile(
    forecast: &[ForecastRecord],
    actual: &[ActualRecord],
) -> Result<Vec<ComparisonRow>, ValidationError> {
    for (idx, rec) in forecast.iter().enumerate() {
        validate(Side::Forecast, idx, &rec.ndc, rec.forecasted_order_qty)?;
    }
    for (idx, rec) in actual.iter().enumerate() {
        validate(Side::Actual, idx, &rec.ndc, rec.ordered_qty)?;
    }

    let mut joined: IndexMap<&str, JoinEntry> = IndexMap::with_capacity(forecast.len());

    for rec in forecast {
        let entry = joined.entry(rec.ndc.trim()).or_default();
        if entry.product_name.is_empty() {
            entry.product_name = rec.product_name.clone();
        }
        entry.forecasted_order_qty =
            sum_quantity(entry.forecasted_order_qty, rec.forecasted_order_qty, Side::Forecast, &rec.ndc)?;
    }

    for rec in actual {
        let entry = joined.entry(rec.ndc.trim()).or_default();
        entry.ordered_qty = sum_quantity(entry.ordered_qty, rec.ordered_qty, Side::Actual, &rec.ndc)?;
    }

    let mut rows: Vec<ComparisonRow> = joined
        .into_iter()
        .map(|(ndc, entry)| ComparisonRow {
            status: RowStatus::classify(entry.forecasted_order_qty, entry.ordered_qty),
            product_name: entry.product_name,
            ndc: ndc.to_string(),
            forecasted_order_qty: entry.forecasted_order_qty,
            ordered_qty: entry.ordered_qty,
        })
        .collect();

    rows.sort_by(|a, b| {
        a.product_name
            .cmp(&b.product_name)
            .then_with(|| a.ndc.cmp(&b.ndc))
    });

    Ok(rows)
}

fn sum_quantity(total: i64, qty: i64, side: Side, ndc: &str) -> Result<i64, ValidationError> {
    total
        .checked_add(qty)
        .ok_or_else(|| ValidationError::QuantityOverflow {
            side,
            ndc: ndc.trim().to_string(),
        })
}

fn validate(side: Side, index: usize, ndc: &str, qty: i64) -> Result<(), ValidationError> {
    if ndc.trim().is_empty() {
        return Err(ValidationError::EmptyNdc { side, index });
    }
    if qty < 0 {
        return Err(ValidationError::NegativeQuantity {
            side,
            index,
            ndc: ndc.to_string(),
            qty,
        });
    }
    Ok(())
}
