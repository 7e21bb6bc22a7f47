use crate::error::FetchError;
use crate::models::{ForecastDetailRow, OrderLineRow, OrderStatusRow, SiteRow};
use chrono::NaiveDate;
use sqlx::PgPool;
use std::future::Future;
use std::time::{Duration, Instant};

/// Run one query under a deadline, logging how long it took
async fn timed<T, F>(query: &'static str, timeout: Duration, fut: F) -> Result<T, FetchError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    let start = Instant::now();
    match tokio::time::timeout(timeout, fut).await {
        Ok(Ok(value)) => {
            tracing::debug!("{} finished in {:?}", query, start.elapsed());
            Ok(value)
        }
        Ok(Err(e)) => {
            tracing::error!("{} failed after {:?}: {:?}", query, start.elapsed(), e);
            Err(FetchError::Database(e))
        }
        Err(_) => {
            tracing::error!("{} timed out (>{:?})", query, timeout);
            Err(FetchError::Timeout {
                query,
                after: timeout,
            })
        }
    }
}

/// Look up the site code by practice and a case-insensitive name fragment
pub async fn find_site_code(
    pool: &PgPool,
    practice_code: i32,
    site_name: &str,
    timeout: Duration,
) -> Result<Option<SiteRow>, FetchError> {
    timed(
        "find_site_code",
        timeout,
        sqlx::query_as::<_, SiteRow>(
            r#"
            SELECT "SiteCode"::bigint AS site_code
            FROM "contractDW"."DimSite"
            WHERE "PracticeCode" = $1
              AND "Name" ILIKE '%' || $2 || '%'
            ORDER BY "SiteCode"
            LIMIT 1
            "#,
        )
        .bind(practice_code)
        .bind(site_name)
        .fetch_optional(pool),
    )
    .await
}

/// Forecast lines created on `date` for the site
pub async fn list_forecast_details(
    pool: &PgPool,
    site_code: i64,
    date: NaiveDate,
    timeout: Duration,
) -> Result<Vec<ForecastDetailRow>, FetchError> {
    timed(
        "list_forecast_details",
        timeout,
        sqlx::query_as::<_, ForecastDetailRow>(
            r#"
            SELECT fd."ProductName"                   AS product_name,
                   fd."NDC"                           AS ndc,
                   fd."OrderQty"::numeric             AS order_qty,
                   fd."OrderUOM"                      AS order_uom,
                   fd."ParMin"::numeric               AS par_min,
                   fd."ParMax"::numeric               AS par_max,
                   fd."ForecastQty"::numeric          AS forecast_qty,
                   fd."DispensedQty"::numeric         AS dispensed_qty,
                   fd."PendingTransferQty"::numeric   AS pending_transfer_qty,
                   fd."PendingOrderedQty"::numeric    AS pending_ordered_qty,
                   fd."CurrentInventoryQty"::numeric  AS current_inventory_qty
            FROM "iq"."ForecastDetails" fd
            INNER JOIN "iq"."ForecastHistory" fh ON fd."ForecastId" = fh."Id"
            WHERE fh."CreatedDate" >= $2::date
              AND fh."CreatedDate" < ($2::date + 1)
              AND fh."SiteId" = $1
            "#,
        )
        .bind(site_code)
        .bind(date)
        .fetch_all(pool),
    )
    .await
}

/// Latest detail status of every purchase order created on `date`
pub async fn list_order_statuses(
    pool: &PgPool,
    site_code: i64,
    date: NaiveDate,
    timeout: Duration,
) -> Result<Vec<OrderStatusRow>, FetchError> {
    timed(
        "list_order_statuses",
        timeout,
        sqlx::query_as::<_, OrderStatusRow>(
            r#"
            SELECT pod."OrderStatusId"::int        AS order_status_id,
                   pod."PurchaseOrderId"::bigint   AS purchase_order_id
            FROM "dbo"."PurchaseOrderDetails" pod
            WHERE pod."IsLatest" = true
              AND pod."PurchaseOrderId" IN (
                    SELECT po."Id"
                    FROM "dbo"."PurchaseOrders" po
                    WHERE po."SiteId" = $1
                      AND po."CreatedDate" >= $2::date
                      AND po."CreatedDate" < ($2::date + 1)
              )
            "#,
        )
        .bind(site_code)
        .bind(date)
        .fetch_all(pool),
    )
    .await
}

/// Purchase-order line items for orders created on `date`
pub async fn list_order_lines(
    pool: &PgPool,
    site_code: i64,
    date: NaiveDate,
    timeout: Duration,
) -> Result<Vec<OrderLineRow>, FetchError> {
    timed(
        "list_order_lines",
        timeout,
        sqlx::query_as::<_, OrderLineRow>(
            r#"
            SELECT pli."NDC"                AS ndc,
                   pli."DrugName"           AS drug_name,
                   pli."Quantity"::numeric  AS quantity
            FROM "dbo"."PoLineItems" pli
            WHERE pli."PurchaseOrderId" IN (
                SELECT po."Id"
                FROM "dbo"."PurchaseOrders" po
                WHERE po."SiteId" = $1
                  AND po."CreatedDate" >= $2::date
                  AND po."CreatedDate" < ($2::date + 1)
            )
            "#,
        )
        .bind(site_code)
        .bind(date)
        .fetch_all(pool),
    )
    .await
}
