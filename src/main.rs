use forecast_order_compare::db::{IntegrationStore, OrderStore};
use forecast_order_compare::{api, create_pool, AppConfig, ComparisonService};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .with_level(true)
        .init();

    let config = AppConfig::load()?;
    info!("Starting server with config: {:?}", config.server);
    info!("Sites: {:?}, blocked order statuses: {:?}", config.report.sites, config.report.blocked_order_statuses);

    let slow = config.report.slow_statement_threshold();
    let timeout = config.report.query_timeout();

    let integration_pool = create_pool(&config.integration_db, slow).await?;
    info!("Integration database pool created");
    let order_pool = create_pool(&config.order_db, slow).await?;
    info!("Order database pool created");

    let integration = Arc::new(IntegrationStore::new(
        integration_pool,
        config.report.practice_code,
        timeout,
    ));
    let orders = Arc::new(OrderStore::new(order_pool, timeout));

    let service = ComparisonService::new(
        integration.clone(),
        integration,
        orders,
        config.report.blocked_order_statuses.clone(),
    );
    let app = api::router(api::AppState::new(service, config.report.sites.clone()));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("  GET /                - comparison page");
    info!("  GET /api/comparison  - comparison as JSON");
    info!("  GET /api/sites       - selector sites");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
