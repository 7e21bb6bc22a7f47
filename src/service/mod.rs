pub mod comparison;
pub mod reconciler;
pub mod source;

#[cfg(test)]
pub(crate) mod testing;

pub use comparison::ComparisonService;
pub use reconciler::reconcile;
pub use source::{ForecastSource, OrderSource, SiteDirectory};
