pub mod record;
pub mod report;
pub mod row;

pub use record::{
    ActualRecord, ComparisonRow, ForecastDetail, ForecastRecord, OrderLine, RowStatus, Site,
};
pub use report::{ComparisonReport, StatusSummary};
pub use row::{ForecastDetailRow, OrderLineRow, OrderStatusRow, SiteRow};
