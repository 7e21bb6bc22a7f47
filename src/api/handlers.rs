use crate::api::render::{render_page, PageBody};
use crate::api::AppState;
use crate::error::{CompareError, FetchError};
use crate::models::ComparisonReport;
use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use chrono::{Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Query string shared by the page and the JSON endpoint
#[derive(Debug, Default, Deserialize)]
pub struct ComparisonQuery {
    pub site: Option<String>,
    /// `YYYY-MM-DD`; yesterday when absent
    pub date: Option<String>,
}

/// JSON response body
#[derive(Debug, Serialize)]
pub struct ComparisonResponse {
    pub success: bool,
    pub message: String,
    pub report: Option<ComparisonReport>,
}

/// Health check
pub async fn health_check() -> &'static str {
    "OK"
}

/// Site names offered in the selector
pub async fn list_sites(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.sites.to_vec())
}

/// The comparison page
pub async fn comparison_page(
    State(state): State<AppState>,
    Query(query): Query<ComparisonQuery>,
) -> Response {
    let selected = query.site.as_deref().unwrap_or_default().trim().to_string();
    let date = match resolve_date(query.date.as_deref()) {
        Ok(date) => date,
        Err(message) => {
            let html = render_page(&state.sites, &selected, yesterday(), PageBody::Error(&message));
            return (StatusCode::BAD_REQUEST, Html(html)).into_response();
        }
    };

    if selected.is_empty() {
        let html = render_page(&state.sites, &selected, date, PageBody::Prompt);
        return Html(html).into_response();
    }

    match run_comparison(&state, &selected, date).await {
        Ok(report) => Html(render_page(&state.sites, &selected, date, PageBody::Report(&report))).into_response(),
        Err(e) => {
            let message = e.to_string();
            let body = match &e {
                CompareError::BlockedOrderStatus { forecast, .. } => PageBody::Blocked {
                    message: &message,
                    forecast,
                },
                _ => PageBody::Error(&message),
            };
            let html = render_page(&state.sites, &selected, date, body);
            (status_for(&e), Html(html)).into_response()
        }
    }
}

/// The same report as JSON
pub async fn comparison_json(
    State(state): State<AppState>,
    Query(query): Query<ComparisonQuery>,
) -> Response {
    let date = match resolve_date(query.date.as_deref()) {
        Ok(date) => date,
        Err(message) => return failure(StatusCode::BAD_REQUEST, message),
    };
    let site = query.site.as_deref().unwrap_or_default().trim();

    match run_comparison(&state, site, date).await {
        Ok(report) => {
            let response = ComparisonResponse {
                success: true,
                message: format!(
                    "Compared {} rows for {} on {}",
                    report.summary.total(),
                    report.site.name,
                    report.date
                ),
                report: Some(report),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => failure(status_for(&e), format!("Error: {}", e)),
    }
}

async fn run_comparison(
    state: &AppState,
    site: &str,
    date: NaiveDate,
) -> Result<ComparisonReport, CompareError> {
    if !site.is_empty() && !state.sites.iter().any(|s| s == site) {
        return Err(CompareError::SiteNotFound(site.to_string()));
    }
    let result = state.service.compare(site, date).await;
    if let Err(e) = &result {
        tracing::error!("Comparison for {:?} on {} failed: {}", site, date, e);
    }
    result
}

fn failure(status: StatusCode, message: String) -> Response {
    let response = ComparisonResponse {
        success: false,
        message,
        report: None,
    };
    (status, Json(response)).into_response()
}

pub fn status_for(err: &CompareError) -> StatusCode {
    match err {
        CompareError::SiteNotSelected => StatusCode::BAD_REQUEST,
        CompareError::SiteNotFound(_) => StatusCode::NOT_FOUND,
        CompareError::BlockedOrderStatus { .. } => StatusCode::CONFLICT,
        CompareError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        CompareError::Fetch(FetchError::Timeout { .. }) => StatusCode::GATEWAY_TIMEOUT,
        CompareError::Fetch(FetchError::Database(_)) => StatusCode::BAD_GATEWAY,
    }
}

fn yesterday() -> NaiveDate {
    Local::now().date_naive() - Days::new(1)
}

fn resolve_date(raw: Option<&str>) -> Result<NaiveDate, String> {
    match raw.map(str::trim).filter(|d| !d.is_empty()) {
        None => Ok(yesterday()),
        Some(d) => NaiveDate::parse_from_str(d, "%Y-%m-%d")
            .map_err(|_| format!("Invalid date {:?}, expected YYYY-MM-DD", d)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_date_defaults_to_yesterday() {
        assert_eq!(resolve_date(None).unwrap(), yesterday());
        assert_eq!(resolve_date(Some("  ")).unwrap(), yesterday());
    }

    #[test]
    fn explicit_date_is_parsed() {
        assert_eq!(
            resolve_date(Some("2026-03-01")).unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
        );
        assert!(resolve_date(Some("03/01/2026")).is_err());
    }

    #[test]
    fn errors_map_to_distinct_statuses() {
        let timeout = CompareError::Fetch(FetchError::Timeout {
            query: "q",
            after: std::time::Duration::from_secs(1),
        });
        assert_eq!(status_for(&timeout), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(
            status_for(&CompareError::SiteNotFound("x".into())),
            StatusCode::NOT_FOUND
        );
    }
}
