//! Binder CLI - Portfolio analytics for trading card collections
//!
//! Usage:
//!   binder -c cards.csv metrics                 Collection totals
//!   binder report performance --player trout   Performance for matching cards
//!   binder report tax --year 2024              Capital gains for a year
//!   binder break-even --purchase 10 --shipping 1.5
//!   binder grade --raw-value 100 --condition "NM-MT" --shipping 8

mod cli;
mod commands;


use anyhow::Result;
use binder_core::{GradingRoiInput, ProfitInput};
use chrono::Utc;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact().with_writer(std::io::stderr))
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Metrics { filter } => {
            let cards = commands::load_cards(&cli.collection)?;
            let criteria = commands::criteria_from_args(&filter)?;
            commands::cmd_metrics(&cards, &criteria, cli.json)
        }
        Commands::Filter { filter, limit } => {
            let cards = commands::load_cards(&cli.collection)?;
            let criteria = commands::criteria_from_args(&filter)?;
            commands::cmd_filter(&cards, &criteria, limit, cli.json)
        }
        Commands::Report { report_type } => {
            let cards = commands::load_cards(&cli.collection)?;
            match report_type {
                ReportType::Performance { filter, as_of } => {
                    let criteria = commands::criteria_from_args(&filter)?;
                    let as_of = match as_of {
                        Some(s) => commands::parse_date_arg(&s, "as-of")?,
                        None => Utc::now().date_naive(),
                    };
                    commands::cmd_report_performance(&cards, &criteria, as_of, cli.json)
                }
                ReportType::Analytics => commands::cmd_report_analytics(&cards, cli.json),
                ReportType::Market { index } => {
                    let index = match index {
                        Some(index) => index,
                        None => commands::load_config(config_path)?.market.index_return,
                    };
                    commands::cmd_report_market(&cards, index, cli.json)
                }
                ReportType::Tax { year } => commands::cmd_report_tax(&cards, year, cli.json),
                ReportType::Insurance => commands::cmd_report_insurance(&cards, cli.json),
            }
        }
        Commands::BreakEven { costs } => {
            let config = commands::load_config(config_path)?;
            let input = commands::costs_from_args(&costs, &config.fees)?;
            commands::cmd_break_even(&input, cli.json)
        }
        Commands::Profit { costs, sale } => {
            let config = commands::load_config(config_path)?;
            let input = commands::costs_from_args(&costs, &config.fees)?;
            commands::cmd_profit(&ProfitInput::new(input, sale), cli.json)
        }
        Commands::Grade {
            raw_value,
            purchase_price,
            condition,
            company,
            tier,
            shipping,
            multipliers,
        } => {
            let config = commands::load_config(config_path)?;
            let input = GradingRoiInput {
                raw_value,
                purchase_price,
                condition,
                company,
                tier,
                shipping_cost: shipping,
                multiplier_overrides: commands::parse_multiplier_overrides(&multipliers)?,
            };
            commands::cmd_grade(&input, &config.grading, cli.json)
        }
        Commands::Heatmap { limit } => {
            let cards = commands::load_cards(&cli.collection)?;
            commands::cmd_heatmap(&cards, limit, cli.json)
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let config = commands::load_config(config_path)?;
                commands::cmd_config_show(&config, cli.json)
            }
            ConfigAction::Path => commands::cmd_config_path(config_path),
        },
    }
}
