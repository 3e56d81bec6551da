//! Binder Core Library
//!
//! Portfolio analytics and valuation for a trading card collection:
//! - Filtering and aggregate metrics
//! - Performance, collection, market, tax and insurance reports
//! - Break-even and profit pricing with marketplace fees
//! - Grading ROI expected-value model
//! - ROI heatmap colors and weights
//! - Collection loading (JSON/CSV) and engine config
//!
//! Every analytics function is synchronous and pure over a borrowed slice
//! of cards; only loading and config can fail.

pub mod config;
pub mod error;
pub mod filter;
pub mod grading;
pub mod heatmap;
pub mod import;
pub mod metrics;
pub mod models;
pub mod pricing;
pub mod reports;

/// Card fixtures shared by tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::{default_config_path, ConfigSource, EngineConfig, MarketConfig};
pub use error::{Error, Result};
pub use filter::{filter_cards, FilterCriteria};
pub use grading::{
    calculate_grading_roi, get_grading_cost, map_condition_to_distribution, ConditionBucket,
    GradeOutcome, GradingRoiInput, GradingRoiResult, GradingTables, Recommendation,
};
pub use heatmap::{
    build_heatmap_data, calculate_card_roi, compute_heatmap_stats, roi_to_color,
    HeatmapCardData, HeatmapStats, Rgb,
};
pub use import::{load_collection, CollectionFormat};
pub use metrics::calculate_metrics;
pub use models::{Card, Category, CollectionType, HoldingTerm, PortfolioMetrics};
pub use pricing::{
    calculate_break_even, calculate_profit, BreakEvenInput, BreakEvenResult, FeeSchedule,
    ProfitInput, ProfitResult,
};
pub use reports::{
    generate_collection_analytics, generate_insurance_report, generate_market_analysis,
    generate_portfolio_performance, generate_tax_report,
};
