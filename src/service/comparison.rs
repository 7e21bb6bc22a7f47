use crate::error::CompareError;
use crate::models::{
    ActualRecord, ComparisonReport, ForecastDetail, ForecastRecord, OrderLine, StatusSummary,
};
use crate::service::reconciler::reconcile;
use crate::service::source::{ForecastSource, OrderSource, SiteDirectory};
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Instant;

/// Site lookup, both fetches and the reconcile step for one page load
pub struct ComparisonService {
    sites: Arc<dyn SiteDirectory>,
    forecasts: Arc<dyn ForecastSource>,
    orders: Arc<dyn OrderSource>,
    blocked_statuses: Vec<i32>,
}

impl ComparisonService {
    pub fn new(
        sites: Arc<dyn SiteDirectory>,
        forecasts: Arc<dyn ForecastSource>,
        orders: Arc<dyn OrderSource>,
        blocked_statuses: Vec<i32>,
    ) -> Self {
        Self {
            sites,
            forecasts,
            orders,
            blocked_statuses,
        }
    }

    /// Build the report for `site_name` on `date`.
    ///
    /// The forecast and order fetches run concurrently; the first failure
    /// aborts the whole comparison.
    pub async fn compare(
        &self,
        site_name: &str,
        date: NaiveDate,
    ) -> Result<ComparisonReport, CompareError> {
        let site_name = site_name.trim();
        if site_name.is_empty() {
            return Err(CompareError::SiteNotSelected);
        }

        let start = Instant::now();
        let Some(site) = self.sites.find_site(site_name).await? else {
            tracing::warn!("No site found for {}", site_name);
            return Err(CompareError::SiteNotFound(site_name.to_string()));
        };
        tracing::info!("Comparing site {} (code {}) for {}", site.name, site.code, date);

        let (forecast, checked) = futures::future::try_join(
            self.forecasts.fetch_forecast(site.code, date),
            self.fetch_checked_orders(site.code, date),
        )
        .await?;

        let orders = match checked {
            Ok(orders) => orders,
            Err(statuses) => {
                return Err(CompareError::BlockedOrderStatus {
                    date,
                    statuses,
                    forecast,
                })
            }
        };

        let rows = reconcile(&forecast_records(&forecast), &order_records(&orders))?;
        let summary = StatusSummary::from_rows(&rows);

        tracing::info!(
            "Site {} compared in {:?}: {} rows, {} match, {} mismatch, {} zero",
            site.name,
            start.elapsed(),
            summary.total(),
            summary.matched,
            summary.mismatched,
            summary.zero
        );

        Ok(ComparisonReport {
            site,
            date,
            forecast,
            orders,
            rows,
            summary,
        })
    }

    /// The day's order lines, or the blocked status ids when any order carries one
    async fn fetch_checked_orders(
        &self,
        site_code: i64,
        date: NaiveDate,
    ) -> Result<Result<Vec<OrderLine>, Vec<i32>>, CompareError> {
        let statuses = self.orders.fetch_order_statuses(site_code, date).await?;

        let mut blocked: Vec<i32> = statuses
            .into_iter()
            .filter(|s| self.blocked_statuses.contains(s))
            .collect();
        if !blocked.is_empty() {
            blocked.sort_unstable();
            blocked.dedup();
            tracing::warn!("Site {} has orders in blocked status {:?} on {}", site_code, blocked, date);
            return Ok(Err(blocked));
        }

        Ok(Ok(self.orders.fetch_order_lines(site_code, date).await?))
    }
}

fn forecast_records(details: &[ForecastDetail]) -> Vec<ForecastRecord> {
    details.iter().map(ForecastDetail::to_record).collect()
}

fn order_records(lines: &[OrderLine]) -> Vec<ActualRecord> {
    lines.iter().map(OrderLine::to_record).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FetchError, ValidationError};
    use crate::models::RowStatus;
    use crate::service::testing::{detail, line, FakeSources};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[tokio::test]
    async fn builds_report_for_known_site() {
        let fake = FakeSources::with_site("Akron", 41)
            .forecast(vec![detail("ProductA", "NDC001", 10), detail("ProductB", "NDC002", 5)])
            .orders(vec![line("NDC001", 10), line("NDC002", 8), line("NDC004", 3)]);
        let service = fake.service(vec![1, 6]);

        let report = service.compare("Akron", date()).await.unwrap();

        assert_eq!(report.site.code, 41);
        assert_eq!(report.forecast.len(), 2);
        assert_eq!(report.orders.len(), 3);
        let statuses: Vec<_> = report.rows.iter().map(|r| (r.ndc.as_str(), r.status)).collect();
        assert_eq!(
            statuses,
            vec![
                ("NDC004", RowStatus::Zero),
                ("NDC001", RowStatus::Match),
                ("NDC002", RowStatus::Mismatch),
            ]
        );
        assert_eq!(report.summary, StatusSummary { matched: 1, mismatched: 1, zero: 1 });
        assert_eq!(fake.queried_dates(), vec![date(), date(), date()]);
    }

    #[tokio::test]
    async fn empty_selection_does_not_fetch() {
        let fake = FakeSources::with_site("Akron", 41);
        let service = fake.service(vec![]);
        let err = service.compare("   ", date()).await.unwrap_err();
        assert!(matches!(err, CompareError::SiteNotSelected));
        assert!(fake.queried_dates().is_empty());
    }

    #[tokio::test]
    async fn unknown_site_is_reported() {
        let service = FakeSources::with_site("Akron", 41).service(vec![]);
        let err = service.compare("Lorain", date()).await.unwrap_err();
        assert!(matches!(err, CompareError::SiteNotFound(name) if name == "Lorain"));
    }

    #[tokio::test]
    async fn blocked_status_aborts_before_order_lines() {
        let fake = FakeSources::with_site("Akron", 41)
            .forecast(vec![detail("ProductA", "NDC001", 10)])
            .orders(vec![line("NDC001", 10)])
            .statuses(vec![3, 6, 1, 6]);
        let service = fake.service(vec![1, 6]);

        let err = service.compare("Akron", date()).await.unwrap_err();
        match err {
            CompareError::BlockedOrderStatus { statuses, forecast, .. } => {
                assert_eq!(statuses, vec![1, 6]);
                assert_eq!(forecast, vec![detail("ProductA", "NDC001", 10)]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(fake.order_line_calls(), 0);
    }

    #[tokio::test]
    async fn fetch_failure_is_not_an_empty_table() {
        let fake = FakeSources::with_site("Akron", 41)
            .forecast(vec![detail("ProductA", "NDC001", 10)])
            .failing_orders();
        let service = fake.service(vec![]);

        let err = service.compare("Akron", date()).await.unwrap_err();
        assert!(matches!(err, CompareError::Fetch(FetchError::Database(_))));
    }

    #[tokio::test]
    async fn negative_source_quantity_fails_validation() {
        let fake = FakeSources::with_site("Akron", 41)
            .forecast(vec![detail("ProductA", "NDC001", -2)]);
        let service = fake.service(vec![]);

        let err = service.compare("Akron", date()).await.unwrap_err();
        assert!(matches!(
            err,
            CompareError::Validation(ValidationError::NegativeQuantity { qty: -2, .. })
        ));
    }
}
