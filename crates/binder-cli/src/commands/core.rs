//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `load_cards` / `load_config` - Shared loaders used by every command
//! - `criteria_from_args` - Turn filter flags into `FilterCriteria`
//! - `cmd_metrics` - Collection totals
//! - `cmd_filter` - List matching cards

use std::path::Path;

use anyhow::{Context, Result};
use binder_core::{
    calculate_metrics, filter_cards, load_collection, Card, Category, EngineConfig,
    FilterCriteria,
};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use super::{signed_money, truncate};
use crate::cli::FilterArgs;

/// Load the card collection
pub fn load_cards(path: &Path) -> Result<Vec<Card>> {
    load_collection(path)
        .with_context(|| format!("Failed to load collection from {}", path.display()))
}

/// Load engine config (explicit path, data dir override, or built-in defaults)
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let (config, source) = EngineConfig::load(path).context("Failed to load engine config")?;
    debug!("Using config from {}", source);
    Ok(config)
}

/// Parse a YYYY-MM-DD date flag
pub fn parse_date_arg(value: &str, flag: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid --{} date format (use YYYY-MM-DD)", flag))
}

/// Build filter criteria from CLI flags
pub fn criteria_from_args(args: &FilterArgs) -> Result<FilterCriteria> {
    let from = args
        .from
        .as_deref()
        .map(|s| parse_date_arg(s, "from"))
        .transpose()?;
    let to = args
        .to
        .as_deref()
        .map(|s| parse_date_arg(s, "to"))
        .transpose()?;

    let categories = args
        .categories
        .iter()
        .map(|s| s.parse::<Category>().map_err(|e| anyhow::anyhow!(e)))
        .collect::<Result<Vec<_>>>()?;

    Ok(FilterCriteria::new()
        .purchased_between(from, to)
        .categories(categories)
        .teams(args.teams.iter().cloned())
        .brands(args.brands.iter().cloned())
        .conditions(args.conditions.iter().cloned())
        .years(args.years.iter().copied())
        .players(args.players.iter().cloned())
        .value_between(args.min_value, args.max_value))
}

/// Print any result structure as pretty JSON
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

pub fn cmd_metrics(cards: &[Card], criteria: &FilterCriteria, json: bool) -> Result<()> {
    let selected = filter_cards(cards, Some(criteria));
    let metrics = calculate_metrics(&selected);

    if json {
        return print_json(&metrics);
    }

    println!();
    println!("📊 Collection Metrics");
    if !criteria.is_empty() {
        println!("   Filtered: {} of {} cards", selected.len(), cards.len());
    }
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Cards:          {}", metrics.total_cards);
    println!("   Total value:    ${:.2}", metrics.total_value);
    println!("   Total cost:     ${:.2}", metrics.total_cost);
    println!(
        "   Profit:         {} ({:+.1}%)",
        signed_money(metrics.total_profit),
        metrics.roi
    );
    println!("   Average value:  ${:.2}", metrics.average_value);
    println!(
        "   Sold:           {} (${:.2} revenue)",
        metrics.cards_sold, metrics.sales_revenue
    );

    Ok(())
}

pub fn cmd_filter(cards: &[Card], criteria: &FilterCriteria, limit: usize, json: bool) -> Result<()> {
    let selected = filter_cards(cards, Some(criteria));

    if json {
        return print_json(&selected);
    }

    println!();
    println!("🔎 {} of {} cards match", selected.len(), cards.len());
    println!("   ─────────────────────────────────────────────────────────────");

    if selected.is_empty() {
        println!("   No cards match these filters.");
        return Ok(());
    }

    println!(
        "   {:36} │ {:10} │ {:>9} │ {:>9} │ {:4}",
        "Card", "Category", "Cost", "Value", "Sold"
    );
    println!("   ─────────────────────────────────────┼────────────┼───────────┼───────────┼─────");

    for card in selected.iter().take(limit) {
        println!(
            "   {:36} │ {:10} │ {:>9.2} │ {:>9.2} │ {:4}",
            truncate(&card.display_name(), 36),
            card.category.as_str(),
            card.purchase_price,
            card.current_value,
            if card.is_sold() { "yes" } else { "" }
        );
    }

    if selected.len() > limit {
        println!("   ... and {} more (use --limit)", selected.len() - limit);
    }

    Ok(())
}
