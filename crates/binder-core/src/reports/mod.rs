//! Portfolio reports
//!
//! Each report is a pure function over a slice of cards:
//!
//! - **Performance** - realized/unrealized gains, rankings, monthly and
//!   per-category returns, annualized return
//! - **Analytics** - collection composition by category, condition, year,
//!   brand and value bucket
//! - **Market** - biggest movers, per-player holdings, comparison against a
//!   baseline index
//! - **Tax** - sales in a calendar year split by holding period
//! - **Insurance** - replacement value and recommended coverage
//!
//! Reports reuse [`crate::filter`] and [`crate::metrics`] for the shared
//! filtering and aggregate steps.

pub mod analytics;
pub mod insurance;
pub mod market;
pub mod performance;
pub mod tax;

pub use analytics::generate_collection_analytics;
pub use insurance::{generate_insurance_report, COVERAGE_BUFFER};
pub use market::generate_market_analysis;
pub use performance::{annualize_return, generate_portfolio_performance, MAX_PERFORMERS};
pub use tax::generate_tax_report;

use std::cmp::Ordering;

/// Compare two floats for sorting, treating NaN as equal
pub(crate) fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}
