//! Read-only data sources behind the comparison.
//!
//! Implementations hand back typed records; any coercion of loosely typed
//! rows happens inside them. Failures are returned, never replaced with an
//! empty result.

use crate::error::CompareError;
use crate::models::{ForecastDetail, OrderLine, Site};
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
pub trait SiteDirectory: Send + Sync + 'static {
    /// Resolve a selector name to its site code. `None` when nothing matches.
    async fn find_site(&self, name: &str) -> Result<Option<Site>, CompareError>;
}

#[async_trait]
pub trait ForecastSource: Send + Sync + 'static {
    async fn fetch_forecast(
        &self,
        site_code: i64,
        date: NaiveDate,
    ) -> Result<Vec<ForecastDetail>, CompareError>;
}

#[async_trait]
pub trait OrderSource: Send + Sync + 'static {
    /// Latest status ids of the purchase orders created on `date`
    async fn fetch_order_statuses(
        &self,
        site_code: i64,
        date: NaiveDate,
    ) -> Result<Vec<i32>, CompareError>;

    async fn fetch_order_lines(
        &self,
        site_code: i64,
        date: NaiveDate,
    ) -> Result<Vec<OrderLine>, CompareError>;
}
