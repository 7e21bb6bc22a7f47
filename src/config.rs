use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    /// Site directory and forecasts
    pub integration_db: DatabaseConfig,
    /// Purchase orders
    pub order_db: DatabaseConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Names offered in the site selector
    pub sites: Vec<String>,
    pub practice_code: i32,
    /// Order status ids that make a day's orders unfit for comparison
    pub blocked_order_statuses: Vec<i32>,
    pub query_timeout_secs: u64,
    pub slow_statement_secs: u64,
}

impl ReportConfig {
    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }

    pub fn slow_statement_threshold(&self) -> Duration {
        Duration::from_secs(self.slow_statement_secs)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            integration_db: DatabaseConfig {
                url: "postgres://localhost/integration_management".to_string(),
                max_connections: 5,
            },
            order_db: DatabaseConfig {
                url: "postgres://localhost/order_management".to_string(),
                max_connections: 5,
            },
            report: ReportConfig {
                sites: ["Akron", "Beachwood", "Lorain", "Middleburg", "Westlake", "Cuyahoga"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                practice_code: 293,
                blocked_order_statuses: vec![1, 6],
                query_timeout_secs: 30,
                slow_statement_secs: 5,
            },
        }
    }
}

impl AppConfig {
    /// Layered load: built-in defaults, then `forecast-compare.toml` if present,
    /// then `FORECAST_COMPARE__SECTION__KEY` variables, then the plain
    /// `INTEGRATION_DATABASE_URL` / `ORDER_DATABASE_URL` overrides.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("forecast-compare")
    }

    pub fn load_from(file_stem: &str) -> Result<Self, ConfigError> {
        let defaults = Config::try_from(&AppConfig::default())?;

        Config::builder()
            .add_source(defaults)
            .add_source(File::with_name(file_stem).required(false))
            .add_source(
                Environment::with_prefix("FORECAST_COMPARE")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("report.sites")
                    .with_list_parse_key("report.blocked_order_statuses")
                    .try_parsing(true),
            )
            .set_override_option("integration_db.url", std::env::var("INTEGRATION_DATABASE_URL").ok())?
            .set_override_option("order_db.url", std::env::var("ORDER_DATABASE_URL").ok())?
            .build()?
            .try_deserialize()
    }
}
