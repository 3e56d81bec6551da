//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (load collection/config, filters) and metrics/filter commands
//! - `reports` - Report commands (performance, analytics, market, tax, insurance)
//! - `pricing` - Break-even and profit calculators
//! - `grading` - Grading ROI estimate
//! - `heatmap` - ROI heatmap
//! - `config` - Config inspection

pub mod config;
pub mod core;
pub mod grading;
pub mod heatmap;
pub mod pricing;
pub mod reports;

// Re-export command functions for main.rs
pub use self::config::*;
pub use self::core::*;
pub use grading::*;
pub use heatmap::*;
pub use pricing::*;
pub use reports::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Format a signed money amount, e.g. "+$12.50" / "-$3.00"
pub fn signed_money(amount: f64) -> String {
    if amount < 0.0 {
        format!("-${:.2}", -amount)
    } else {
        format!("+${:.2}", amount)
    }
}
