//! Error types for the forecast/order comparison.

use crate::models::ForecastDetail;
use chrono::NaiveDate;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Which input set a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Forecast,
    Actual,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Forecast => f.write_str("forecast"),
            Side::Actual => f.write_str("actual"),
        }
    }
}

/// Malformed input record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{side} row {index}: missing NDC")]
    EmptyNdc { side: Side, index: usize },

    #[error("{side} row {index} (NDC {ndc}): negative quantity {qty}")]
    NegativeQuantity {
        side: Side,
        index: usize,
        ndc: String,
        qty: i64,
    },

    #[error("{side} row {index} (NDC {ndc}): quantity {value} is not a whole number")]
    NonIntegralQuantity {
        side: Side,
        index: usize,
        ndc: String,
        value: String,
    },

    #[error("{side} NDC {ndc}: summed quantity does not fit in 64 bits")]
    QuantityOverflow { side: Side, ndc: String },
}

/// Failure talking to one of the databases.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("query `{query}` timed out after {after:?}")]
    Timeout { query: &'static str, after: Duration },
}

/// Everything that can abort a comparison.
#[derive(Error, Debug)]
pub enum CompareError {
    #[error("Please select a site to view forecast and orders.")]
    SiteNotSelected,

    #[error("No site found for {0}")]
    SiteNotFound(String),

    #[error("One or more orders for this site on {date} have invalid status ({}). Cannot proceed.", join_ids(.statuses))]
    BlockedOrderStatus {
        date: NaiveDate,
        statuses: Vec<i32>,
        /// Forecast fetched alongside, still shown above the error
        forecast: Vec<ForecastDetail>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),
}

fn join_ids(ids: &[i32]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocked_status_message_lists_ids() {
        let err = CompareError::BlockedOrderStatus {
            date: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
            statuses: vec![1, 6],
            forecast: Vec::new(),
        };
        assert_eq!(
            err.to_string(),
            "One or more orders for this site on 2026-10-18 have invalid status (1, 6). Cannot proceed."
        );
    }

    #[test]
    fn validation_message_names_side_and_row() {
        let err = ValidationError::NegativeQuantity {
            side: Side::Actual,
            index: 3,
            ndc: "NDC9".into(),
            qty: -2,
        };
        assert_eq!(err.to_string(), "actual row 3 (NDC NDC9): negative quantity -2");
    }
}
