//! Market analysis: movers, per-player holdings, baseline comparison

use std::collections::HashMap;

use tracing::debug;

use crate::metrics::{calculate_metrics, percent_of};
use crate::models::{Card, MarketAnalysis, MarketComparison, MarketMover, PlayerPerformance};

use super::cmp_f64;

/// Analyze current market values against purchase prices
///
/// `market_index` is the baseline return (percent) the portfolio is compared
/// against; it comes from configuration, not from this engine.
pub fn generate_market_analysis(cards: &[Card], market_index: f64) -> MarketAnalysis {
    let movers: Vec<MarketMover> = cards
        .iter()
        .filter(|c| c.purchase_price > 0.0)
        .map(|c| MarketMover {
            card: c.clone(),
            purchase_value: c.purchase_price,
            current_value: c.current_value,
            change: c.current_value - c.purchase_price,
            change_percent: (c.current_value - c.purchase_price) / c.purchase_price * 100.0,
        })
        .collect();

    let mut top_gainers: Vec<MarketMover> = movers
        .iter()
        .filter(|m| m.change_percent > 0.0)
        .cloned()
        .collect();
    top_gainers.sort_by(|a, b| cmp_f64(b.change_percent, a.change_percent));

    let mut top_losers: Vec<MarketMover> = movers
        .into_iter()
        .filter(|m| m.change_percent < 0.0)
        .collect();
    top_losers.sort_by(|a, b| cmp_f64(a.change_percent, b.change_percent));

    let portfolio_return = calculate_metrics(cards).roi;

    debug!(
        gainers = top_gainers.len(),
        losers = top_losers.len(),
        portfolio_return,
        market_index,
        "Generated market analysis"
    );

    MarketAnalysis {
        top_gainers,
        top_losers,
        player_performance: player_performance(cards),
        market_comparison: MarketComparison {
            portfolio_return,
            market_index,
            outperformance: portfolio_return - market_index,
        },
    }
}

/// Holdings per player, largest total value first
fn player_performance(cards: &[Card]) -> Vec<PlayerPerformance> {
    let mut order: Vec<String> = Vec::new();
    let mut by_player: HashMap<String, PlayerPerformance> = HashMap::new();

    for card in cards {
        let player = card.player.trim().to_string();
        let entry = by_player.entry(player.clone()).or_insert_with(|| {
            order.push(player.clone());
            PlayerPerformance {
                player,
                card_count: 0,
                total_value: 0.0,
                total_cost: 0.0,
                total_return: 0.0,
                return_percent: 0.0,
            }
        });
        entry.card_count += 1;
        entry.total_value += card.current_value;
        entry.total_cost += card.purchase_price;
    }

    let mut result: Vec<PlayerPerformance> = order
        .into_iter()
        .filter_map(|player| by_player.remove(&player))
        .map(|mut perf| {
            perf.total_return = perf.total_value - perf.total_cost;
            perf.return_percent = percent_of(perf.total_return, perf.total_cost);
            perf
        })
        .collect();

    result.sort_by(|a, b| cmp_f64(b.total_value, a.total_value));
    result
}
