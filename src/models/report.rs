use crate::models::{ComparisonRow, ForecastDetail, OrderLine, RowStatus, Site};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Row counts per status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSummary {
    pub matched: usize,
    pub mismatched: usize,
    pub zero: usize,
}

impl StatusSummary {
    pub fn from_rows(rows: &[ComparisonRow]) -> Self {
        let mut summary = Self::default();
        for row in rows {
            match row.status {
                RowStatus::Match => summary.matched += 1,
                RowStatus::Mismatch => summary.mismatched += 1,
                RowStatus::Zero => summary.zero += 1,
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.matched + self.mismatched + self.zero
    }
}

/// Everything one page load shows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub site: Site,
    pub date: NaiveDate,
    pub forecast: Vec<ForecastDetail>,
    pub orders: Vec<OrderLine>,
    pub rows: Vec<ComparisonRow>,
    pub summary: StatusSummary,
}
