pub mod handlers;
pub mod render;

use crate::service::ComparisonService;
use axum::{routing::get, Router};
use std::sync::Arc;

pub use handlers::*;

/// Shared state: the comparison service and the selector's site list
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ComparisonService>,
    pub sites: Arc<Vec<String>>,
}

impl AppState {
    pub fn new(service: ComparisonService, sites: Vec<String>) -> Self {
        Self {
            service: Arc::new(service),
            sites: Arc::new(sites),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::comparison_page))
        .route("/health", get(handlers::health_check))
        .route("/api/sites", get(handlers::list_sites))
        .route("/api/comparison", get(handlers::comparison_json))
        .with_state(state)
}
