//! ROI heatmap command

use anyhow::Result;
use binder_core::{build_heatmap_data, compute_heatmap_stats, Card, HeatmapCardData, HeatmapStats};
use serde::Serialize;

use super::{print_json, truncate};

#[derive(Serialize)]
struct HeatmapOutput {
    stats: HeatmapStats,
    cards: Vec<HeatmapCardData>,
}

pub fn cmd_heatmap(cards: &[Card], limit: usize, json: bool) -> Result<()> {
    let data = build_heatmap_data(cards);
    let stats = compute_heatmap_stats(&data);

    if json {
        return print_json(&HeatmapOutput { stats, cards: data });
    }

    println!();
    println!("🌡️  ROI Heatmap");
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   Cards: {}    Value: ${:.2}    Avg ROI: {:+.1}%",
        stats.total_cards,
        stats.total_value,
        stats.avg_roi * 100.0
    );
    println!(
        "   🟢 {} winners   🟡 {} flat   🔴 {} losers",
        stats.winners, stats.flat, stats.losers
    );

    if data.is_empty() {
        println!("   No held cards with a current value.");
        return Ok(());
    }

    let mut by_weight: Vec<&HeatmapCardData> = data.iter().collect();
    by_weight.sort_by(|a, b| b.weight.total_cmp(&a.weight));

    println!();
    println!(
        "   {:30} │ {:>9} │ {:>8} │ {:>6} │ {:7}",
        "Card", "Value", "ROI", "Share", "Color"
    );
    println!("   ───────────────────────────────┼───────────┼──────────┼────────┼────────");
    for cell in by_weight.iter().take(limit) {
        let color = cell.color;
        println!(
            "   {:30} │ {:>9.2} │ {:>+7.1}% │ {:>5.1}% │ \x1b[38;2;{};{};{}m██\x1b[0m {}",
            truncate(&format!("{} {} {}", cell.year, cell.brand, cell.player), 30),
            cell.current_value,
            cell.roi_percent,
            cell.weight * 100.0,
            color.r,
            color.g,
            color.b,
            color
        );
    }

    if data.len() > limit {
        println!("   ... and {} more (use --limit)", data.len() - limit);
    }

    Ok(())
}
