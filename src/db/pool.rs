use crate::config::DatabaseConfig;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;
use std::time::Duration;

/// Create a read-only connection pool for one of the source databases
pub async fn create_pool(
    config: &DatabaseConfig,
    slow_statement_threshold: Duration,
) -> Result<PgPool, sqlx::Error> {
    let mut connect_options = PgConnectOptions::from_str(&config.url)?
        .options([("default_transaction_read_only", "on")]);

    connect_options = connect_options.log_slow_statements(
        tracing::log::LevelFilter::Warn,
        slow_statement_threshold,
    );

    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(connect_options)
        .await
}
