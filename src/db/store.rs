use crate::db::queries;
use crate::error::CompareError;
use crate::models::row::{coerce_forecast, coerce_order_lines};
use crate::models::{ForecastDetail, OrderLine, Site};
use crate::service::source::{ForecastSource, OrderSource, SiteDirectory};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use std::time::Duration;

/// Integration database: site directory and forecasts
pub struct IntegrationStore {
    pool: PgPool,
    practice_code: i32,
    timeout: Duration,
}

impl IntegrationStore {
    pub fn new(pool: PgPool, practice_code: i32, timeout: Duration) -> Self {
        Self {
            pool,
            practice_code,
            timeout,
        }
    }
}

#[async_trait]
impl SiteDirectory for IntegrationStore {
    async fn find_site(&self, name: &str) -> Result<Option<Site>, CompareError> {
        let row =
            queries::find_site_code(&self.pool, self.practice_code, name, self.timeout).await?;
        Ok(row.map(|r| Site {
            name: name.to_string(),
            code: r.site_code,
        }))
    }
}

#[async_trait]
impl ForecastSource for IntegrationStore {
    async fn fetch_forecast(
        &self,
        site_code: i64,
        date: NaiveDate,
    ) -> Result<Vec<ForecastDetail>, CompareError> {
        let rows = queries::list_forecast_details(&self.pool, site_code, date, self.timeout).await?;
        tracing::info!("Site {} forecast for {}: {} lines", site_code, date, rows.len());
        Ok(coerce_forecast(rows)?)
    }
}

/// Order database: purchase orders and their line items
pub struct OrderStore {
    pool: PgPool,
    timeout: Duration,
}

impl OrderStore {
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl OrderSource for OrderStore {
    async fn fetch_order_statuses(
        &self,
        site_code: i64,
        date: NaiveDate,
    ) -> Result<Vec<i32>, CompareError> {
        let rows = queries::list_order_statuses(&self.pool, site_code, date, self.timeout).await?;
        Ok(rows.into_iter().filter_map(|r| r.order_status_id).collect())
    }

    async fn fetch_order_lines(
        &self,
        site_code: i64,
        date: NaiveDate,
    ) -> Result<Vec<OrderLine>, CompareError> {
        let rows = queries::list_order_lines(&self.pool, site_code, date, self.timeout).await?;
        tracing::info!("Site {} orders for {}: {} lines", site_code, date, rows.len());
        Ok(coerce_order_lines(rows)?)
    }
}
