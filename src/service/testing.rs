use crate::error::{CompareError, FetchError};
use crate::models::{ForecastDetail, OrderLine, Site};
use crate::service::source::{ForecastSource, OrderSource, SiteDirectory};
use crate::service::ComparisonService;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub fn detail(name: &str, ndc: &str, qty: i64) -> ForecastDetail {
    ForecastDetail {
        product_name: name.to_string(),
        ndc: ndc.to_string(),
        forecasted_order_qty: qty,
        order_uom: Some("EA".to_string()),
        par_min: None,
        par_max: None,
        forecast_qty: None,
        dispensed_qty: None,
        pending_transfer_qty: None,
        pending_ordered_qty: None,
        current_inventory_qty: None,
    }
}

pub fn line(ndc: &str, qty: i64) -> OrderLine {
    OrderLine {
        ndc: ndc.to_string(),
        drug_name: format!("Drug {ndc}"),
        ordered_qty: qty,
    }
}

#[derive(Default)]
struct FakeState {
    sites: HashMap<String, i64>,
    forecast: Vec<ForecastDetail>,
    orders: Vec<OrderLine>,
    statuses: Vec<i32>,
    failing_orders: bool,
    queried_dates: Mutex<Vec<NaiveDate>>,
    order_line_calls: AtomicUsize,
}

/// In-memory stand-in for both databases
#[derive(Clone)]
pub struct FakeSources {
    state: Arc<FakeState>,
}

impl FakeSources {
    pub fn with_site(name: &str, code: i64) -> Self {
        let mut state = FakeState::default();
        state.sites.insert(name.to_string(), code);
        Self {
            state: Arc::new(state),
        }
    }

    fn edit(mut self, f: impl FnOnce(&mut FakeState)) -> Self {
        if let Some(state) = Arc::get_mut(&mut self.state) {
            f(state);
        }
        self
    }

    pub fn forecast(self, forecast: Vec<ForecastDetail>) -> Self {
        self.edit(|s| s.forecast = forecast)
    }

    pub fn orders(self, orders: Vec<OrderLine>) -> Self {
        self.edit(|s| s.orders = orders)
    }

    pub fn statuses(self, statuses: Vec<i32>) -> Self {
        self.edit(|s| s.statuses = statuses)
    }

    pub fn failing_orders(self) -> Self {
        self.edit(|s| s.failing_orders = true)
    }

    pub fn service(&self, blocked_statuses: Vec<i32>) -> ComparisonService {
        ComparisonService::new(
            Arc::new(self.clone()),
            Arc::new(self.clone()),
            Arc::new(self.clone()),
            blocked_statuses,
        )
    }

    pub fn queried_dates(&self) -> Vec<NaiveDate> {
        self.state.queried_dates.lock().unwrap().clone()
    }

    pub fn order_line_calls(&self) -> usize {
        self.state.order_line_calls.load(Ordering::SeqCst)
    }

    fn record(&self, date: NaiveDate) {
        self.state.queried_dates.lock().unwrap().push(date);
    }
}

#[async_trait]
impl SiteDirectory for FakeSources {
    async fn find_site(&self, name: &str) -> Result<Option<Site>, CompareError> {
        Ok(self.state.sites.get(name).map(|&code| Site {
            name: name.to_string(),
            code,
        }))
    }
}

#[async_trait]
impl ForecastSource for FakeSources {
    async fn fetch_forecast(
        &self,
        _site_code: i64,
        date: NaiveDate,
    ) -> Result<Vec<ForecastDetail>, CompareError> {
        self.record(date);
        Ok(self.state.forecast.clone())
    }
}

#[async_trait]
impl OrderSource for FakeSources {
    async fn fetch_order_statuses(
        &self,
        _site_code: i64,
        date: NaiveDate,
    ) -> Result<Vec<i32>, CompareError> {
        self.record(date);
        if self.state.failing_orders {
            return Err(FetchError::Database(sqlx::Error::PoolTimedOut).into());
        }
        Ok(self.state.statuses.clone())
    }

    async fn fetch_order_lines(
        &self,
        _site_code: i64,
        date: NaiveDate,
    ) -> Result<Vec<OrderLine>, CompareError> {
        self.record(date);
        self.state.order_line_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.state.orders.clone())
    }
}
