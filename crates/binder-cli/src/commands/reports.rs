//! Report command implementations

use anyhow::Result;
use binder_core::models::{DistributionEntry, MarketMover, Performer, TaxLot};
use binder_core::reports::analytics::largest_by_value;
use binder_core::{
    generate_collection_analytics, generate_insurance_report, generate_market_analysis,
    generate_portfolio_performance, generate_tax_report, Card, FilterCriteria,
};
use chrono::NaiveDate;

use super::{print_json, signed_money, truncate};

/// Rows shown per list in text output
const LIST_ROWS: usize = 5;

pub fn cmd_report_performance(
    cards: &[Card],
    criteria: &FilterCriteria,
    as_of: NaiveDate,
    json: bool,
) -> Result<()> {
    let report = generate_portfolio_performance(cards, Some(criteria), as_of);

    if json {
        return print_json(&report);
    }

    println!();
    println!("📈 Portfolio Performance (as of {})", report.as_of);
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Total return:      {}", signed_money(report.total_return));
    println!("     Realized:        {}", signed_money(report.realized_gains));
    println!("     Unrealized:      {}", signed_money(report.unrealized_gains));
    println!(
        "   Avg holding:       {:.0} days",
        report.average_holding_days
    );
    println!("   Annualized return: {:+.1}%", report.annualized_return);

    fn print_performers(title: &str, performers: &[Performer]) {
        if performers.is_empty() {
            return;
        }
        println!();
        println!("   {}", title);
        for p in performers.iter().take(LIST_ROWS) {
            println!(
                "     {:36} {:>10} {:>+8.1}%",
                truncate(&p.card.display_name(), 36),
                signed_money(p.gain),
                p.gain_percent
            );
        }
    }

    print_performers("🏆 Best performers", &report.best_performers);
    print_performers("📉 Worst performers", &report.worst_performers);

    if !report.category_performance.is_empty() {
        println!();
        println!(
            "   {:12} │ {:>5} │ {:>10} │ {:>10} │ {:>8}",
            "Category", "Cards", "Value", "Gain", "ROI"
        );
        println!("   ─────────────┼───────┼────────────┼────────────┼─────────");
        for cat in &report.category_performance {
            println!(
                "   {:12} │ {:>5} │ {:>10.2} │ {:>10.2} │ {:>7.1}%",
                cat.category.as_str(),
                cat.card_count,
                cat.total_value,
                cat.total_gain,
                cat.roi
            );
        }
    }

    if !report.monthly_returns.is_empty() {
        println!();
        println!(
            "   {:8} │ {:>5} │ {:>10} │ {:>10} │ {:>8}",
            "Month", "Cards", "Cost", "Net gain", "Return"
        );
        println!("   ─────────┼───────┼────────────┼────────────┼─────────");
        for month in &report.monthly_returns {
            println!(
                "   {:8} │ {:>5} │ {:>10.2} │ {:>10.2} │ {:>7.1}%",
                month.month,
                month.card_count,
                month.total_cost,
                month.net_gain,
                month.return_percent
            );
        }
    }

    Ok(())
}

pub fn cmd_report_analytics(cards: &[Card], json: bool) -> Result<()> {
    let analytics = generate_collection_analytics(cards);

    if json {
        return print_json(&analytics);
    }

    println!();
    println!("🗂️  Collection Analytics ({} cards)", analytics.total_cards);
    println!("   ─────────────────────────────────────────────────────────────");

    fn print_distribution(title: &str, entries: &[DistributionEntry], limit: usize) {
        println!();
        match largest_by_value(entries) {
            Some(top) => println!("   {} (most value: {})", title, top.label),
            None => println!("   {}", title),
        }
        for entry in entries.iter().take(limit) {
            println!(
                "     {:20} │ {:>5} │ {:>5.1}% │ {:>10.2}",
                truncate(&entry.label, 20),
                entry.count,
                entry.percentage,
                entry.total_value
            );
        }
        if entries.len() > limit {
            println!("     ... and {} more", entries.len() - limit);
        }
    }

    print_distribution("By category", &analytics.by_category, usize::MAX);
    print_distribution("By value", &analytics.by_value, usize::MAX);
    print_distribution("By condition", &analytics.by_condition, 10);
    print_distribution("By brand", &analytics.by_brand, 10);
    print_distribution("By year", &analytics.by_year, 10);

    Ok(())
}

pub fn cmd_report_market(cards: &[Card], market_index: f64, json: bool) -> Result<()> {
    let analysis = generate_market_analysis(cards, market_index);

    if json {
        return print_json(&analysis);
    }

    let cmp = &analysis.market_comparison;
    println!();
    println!("💹 Market Analysis");
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Portfolio return: {:+.1}%", cmp.portfolio_return);
    println!("   Market index:     {:+.1}%", cmp.market_index);
    if cmp.outperformance >= 0.0 {
        println!("   ✅ Outperforming by {:.1} points", cmp.outperformance);
    } else {
        println!("   ⚠️  Underperforming by {:.1} points", -cmp.outperformance);
    }

    fn print_movers(title: &str, movers: &[MarketMover]) {
        if movers.is_empty() {
            return;
        }
        println!();
        println!("   {}", title);
        for m in movers.iter().take(LIST_ROWS) {
            println!(
                "     {:36} {:>9.2} → {:>9.2} ({:+.1}%)",
                truncate(&m.card.display_name(), 36),
                m.purchase_value,
                m.current_value,
                m.change_percent
            );
        }
    }

    print_movers("🚀 Top gainers", &analysis.top_gainers);
    print_movers("🔻 Top losers", &analysis.top_losers);

    if !analysis.player_performance.is_empty() {
        println!();
        println!(
            "   {:24} │ {:>5} │ {:>10} │ {:>8}",
            "Player", "Cards", "Value", "Return"
        );
        println!("   ─────────────────────────┼───────┼────────────┼─────────");
        for player in analysis.player_performance.iter().take(10) {
            println!(
                "   {:24} │ {:>5} │ {:>10.2} │ {:>7.1}%",
                truncate(&player.player, 24),
                player.card_count,
                player.total_value,
                player.return_percent
            );
        }
    }

    Ok(())
}

pub fn cmd_report_tax(cards: &[Card], year: i32, json: bool) -> Result<()> {
    let report = generate_tax_report(cards, year);

    if json {
        return print_json(&report);
    }

    println!();
    println!("🧾 Capital Gains {}", report.year);
    println!("   ─────────────────────────────────────────────────────────────");

    if report.short_term_gains.is_empty() && report.long_term_gains.is_empty() {
        println!("   No sales in {}.", report.year);
        return Ok(());
    }

    fn print_lots(title: &str, lots: &[TaxLot], total: f64) {
        println!();
        println!("   {} ({} sales, {})", title, lots.len(), signed_money(total));
        for lot in lots {
            println!(
                "     {:36} {:>9.2} → {:>9.2} {:>10} {:>5}d",
                truncate(&lot.card.display_name(), 36),
                lot.cost_basis,
                lot.sale_price,
                signed_money(lot.gain_loss),
                lot.holding_period_days
            );
        }
    }

    print_lots("Short-term", &report.short_term_gains, report.total_short_term);
    print_lots("Long-term", &report.long_term_gains, report.total_long_term);

    println!();
    println!("   Net gain/loss: {}", signed_money(report.net_gain_loss));

    Ok(())
}

pub fn cmd_report_insurance(cards: &[Card], json: bool) -> Result<()> {
    let report = generate_insurance_report(cards);

    if json {
        return print_json(&report);
    }

    println!();
    println!("🛡️  Insurance Valuation");
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   Replacement value:    ${:.2}",
        report.total_replacement_value
    );
    println!(
        "   Recommended coverage: ${:.2}",
        report.recommended_coverage
    );

    if !report.high_value_cards.is_empty() {
        println!();
        println!("   High-value cards (schedule individually):");
        for card in &report.high_value_cards {
            println!(
                "     {:40} ${:>10.2}",
                truncate(&card.display_name(), 40),
                card.current_value
            );
        }
    }

    if !report.category_breakdown.is_empty() {
        println!();
        println!("   {:12} │ {:>5} │ {:>10}", "Category", "Cards", "Value");
        println!("   ─────────────┼───────┼────────────");
        for cat in &report.category_breakdown {
            println!(
                "   {:12} │ {:>5} │ {:>10.2}",
                cat.category.as_str(),
                cat.card_count,
                cat.total_value
            );
        }
    }

    Ok(())
}
