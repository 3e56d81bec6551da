//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Binder - Know what your card collection is worth
#[derive(Parser)]
#[command(name = "binder")]
#[command(about = "Portfolio analytics and valuation for trading card collections", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Collection file (.json or .csv)
    #[arg(short, long, default_value = "collection.json", global = true)]
    pub collection: PathBuf,

    /// Engine config file (defaults to the data dir override, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show collection totals
    Metrics {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// List cards matching filters
    Filter {
        #[command(flatten)]
        filter: FilterArgs,

        /// Maximum number of cards to show
        #[arg(short, long, default_value = "50")]
        limit: usize,
    },

    /// Generate reports
    Report {
        #[command(subcommand)]
        report_type: ReportType,
    },

    /// Minimum sale price that covers costs and marketplace fees
    BreakEven {
        #[command(flatten)]
        costs: CostArgs,
    },

    /// Net profit of a sale at a given price
    Profit {
        #[command(flatten)]
        costs: CostArgs,

        /// Sale price
        #[arg(long)]
        sale: f64,
    },

    /// Estimate whether grading a raw card pays off
    Grade {
        /// Raw (ungraded) market value
        #[arg(long)]
        raw_value: f64,

        /// What was paid for the card (shown for reference)
        #[arg(long, default_value_t = 0.0)]
        purchase_price: f64,

        /// Condition label, e.g. "Near Mint", "EX-MT", "Raw"
        #[arg(long, default_value = "")]
        condition: String,

        /// Grading company: PSA, BGS, SGC, CGC
        #[arg(long, default_value = "PSA")]
        company: String,

        /// Service tier, e.g. Regular, Express
        #[arg(long, default_value = "Regular")]
        tier: String,

        /// Round-trip shipping and insurance
        #[arg(long, default_value_t = 0.0)]
        shipping: f64,

        /// Override a grade's value multiplier (GRADE=MULTIPLIER, repeatable)
        ///
        /// Example: --multiplier 10=8.0 --multiplier 9=2.5
        #[arg(long = "multiplier", value_name = "GRADE=MULTIPLIER")]
        multipliers: Vec<String>,
    },

    /// ROI heatmap of held cards
    Heatmap {
        /// Maximum number of cards to show (largest first)
        #[arg(short, long, default_value = "25")]
        limit: usize,
    },

    /// Inspect engine configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ReportType {
    /// Returns, top and bottom performers, monthly and per-category breakdown
    Performance {
        #[command(flatten)]
        filter: FilterArgs,

        /// Date holding periods are measured to (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        as_of: Option<String>,
    },

    /// Distribution by category, condition, year, brand and value
    Analytics,

    /// Gainers, losers, per-player holdings and market comparison
    Market {
        /// Baseline return percent (defaults to config [market] index_return)
        #[arg(long)]
        index: Option<f64>,
    },

    /// Short- and long-term capital gains for a year
    Tax {
        /// Calendar year of the sales
        #[arg(long)]
        year: i32,
    },

    /// Replacement value and recommended coverage
    Insurance,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,

    /// Show where configuration is loaded from
    Path,
}

/// Card filters shared by several commands
#[derive(Args, Debug, Default, Clone)]
pub struct FilterArgs {
    /// Purchased on or after (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// Purchased on or before (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,

    /// Category (repeatable)
    #[arg(long = "category")]
    pub categories: Vec<String>,

    /// Team (repeatable, exact match)
    #[arg(long = "team")]
    pub teams: Vec<String>,

    /// Brand (repeatable, exact match)
    #[arg(long = "brand")]
    pub brands: Vec<String>,

    /// Condition label (repeatable, exact match)
    #[arg(long = "condition")]
    pub conditions: Vec<String>,

    /// Card year (repeatable)
    #[arg(long = "year")]
    pub years: Vec<i32>,

    /// Player name fragment (repeatable, case-insensitive)
    #[arg(long = "player")]
    pub players: Vec<String>,

    /// Minimum current value
    #[arg(long)]
    pub min_value: Option<f64>,

    /// Maximum current value
    #[arg(long)]
    pub max_value: Option<f64>,
}

/// Costs of a prospective sale; fee rates default to the config [fees]
#[derive(Args, Debug, Clone)]
pub struct CostArgs {
    /// Purchase price
    #[arg(long)]
    pub purchase: f64,

    /// Grading fee paid
    #[arg(long, default_value_t = 0.0)]
    pub grading: f64,

    /// Shipping cost
    #[arg(long, default_value_t = 0.0)]
    pub shipping: f64,

    /// Final value fee rate (0.129 = 12.9%)
    #[arg(long)]
    pub fvf_rate: Option<f64>,

    /// Promoted listing rate
    #[arg(long)]
    pub promoted_rate: Option<f64>,

    /// Fixed per-order fee
    #[arg(long)]
    pub per_order_fee: Option<f64>,
}
