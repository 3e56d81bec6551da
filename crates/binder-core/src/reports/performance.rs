//! Portfolio performance report

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use tracing::debug;

use crate::filter::{filter_cards, FilterCriteria};
use crate::metrics::percent_of;
use crate::models::{
    Card, Category, CategoryPerformance, MonthlyReturn, Performer, PortfolioPerformance,
};

use super::cmp_f64;

/// Length of the best/worst performer lists
pub const MAX_PERFORMERS: usize = 10;

/// Generate the performance report for the cards matching `criteria`
///
/// Holding periods of unsold cards run until `as_of`.
pub fn generate_portfolio_performance(
    cards: &[Card],
    criteria: Option<&FilterCriteria>,
    as_of: NaiveDate,
) -> PortfolioPerformance {
    let cards = filter_cards(cards, criteria);

    let mut realized_gains = 0.0;
    let mut unrealized_gains = 0.0;
    for card in &cards {
        if card.is_sold() {
            realized_gains += card.gain();
        } else {
            unrealized_gains += card.gain();
        }
    }
    let total_return: f64 = cards.iter().map(Card::gain).sum();
    let total_cost: f64 = cards.iter().map(|c| c.purchase_price).sum();

    let (best_performers, worst_performers) = rank_performers(&cards);

    let average_holding_days = average_holding_days(&cards, as_of);
    let roi = percent_of(total_return, total_cost);
    let annualized_return = annualize_return(roi, average_holding_days);

    debug!(
        cards = cards.len(),
        total_return,
        average_holding_days,
        "Generated portfolio performance"
    );

    PortfolioPerformance {
        as_of,
        total_return,
        realized_gains,
        unrealized_gains,
        best_performers,
        worst_performers,
        monthly_returns: monthly_returns(&cards),
        category_performance: category_performance(&cards),
        average_holding_days,
        annualized_return,
    }
}

/// Annualize a cumulative return percentage over an average holding period
///
/// Falls back to the cumulative figure when the holding period is zero or
/// the compounded figure overflows.
pub fn annualize_return(roi: f64, average_holding_days: f64) -> f64 {
    if average_holding_days <= 0.0 {
        return roi;
    }
    let growth = 1.0 + roi / 100.0;
    if growth <= 0.0 {
        return -100.0;
    }
    let annualized = (growth.powf(365.0 / average_holding_days) - 1.0) * 100.0;
    if annualized.is_finite() {
        annualized
    } else {
        roi
    }
}

/// Best and worst cards by percentage gain. Free cards are not ranked.
fn rank_performers(cards: &[Card]) -> (Vec<Performer>, Vec<Performer>) {
    let ranked: Vec<Performer> = cards
        .iter()
        .filter_map(|card| {
            card.gain_percent().map(|gain_percent| Performer {
                card: card.clone(),
                gain: card.gain(),
                gain_percent,
            })
        })
        .collect();

    // sort_by is stable, so equal percentages keep input order
    let mut best = ranked.clone();
    best.sort_by(|a, b| cmp_f64(b.gain_percent, a.gain_percent));
    best.truncate(MAX_PERFORMERS);

    let mut worst = ranked;
    worst.sort_by(|a, b| cmp_f64(a.gain_percent, b.gain_percent));
    worst.truncate(MAX_PERFORMERS);

    (best, worst)
}

fn holding_days(card: &Card, as_of: NaiveDate) -> i64 {
    let end = card.sale().map(|(_, date)| date).unwrap_or(as_of);
    (end - card.purchase_date).num_days().max(0)
}

fn average_holding_days(cards: &[Card], as_of: NaiveDate) -> f64 {
    if cards.is_empty() {
        return 0.0;
    }
    let total: i64 = cards.iter().map(|c| holding_days(c, as_of)).sum();
    total as f64 / cards.len() as f64
}

/// Net gain grouped by purchase month, oldest first
fn monthly_returns(cards: &[Card]) -> Vec<MonthlyReturn> {
    // month -> (count, cost, value)
    let mut months: BTreeMap<String, (usize, f64, f64)> = BTreeMap::new();
    for card in cards {
        let entry = months
            .entry(card.purchase_date.format("%Y-%m").to_string())
            .or_insert((0, 0.0, 0.0));
        entry.0 += 1;
        entry.1 += card.purchase_price;
        entry.2 += card.realized_or_current_value();
    }

    months
        .into_iter()
        .map(|(month, (card_count, total_cost, total_value))| {
            let net_gain = total_value - total_cost;
            MonthlyReturn {
                month,
                card_count,
                total_cost,
                total_value,
                net_gain,
                return_percent: percent_of(net_gain, total_cost),
            }
        })
        .collect()
}

/// Aggregate return per category, largest holdings first
fn category_performance(cards: &[Card]) -> Vec<CategoryPerformance> {
    let mut by_category: HashMap<Category, CategoryPerformance> = HashMap::new();
    for card in cards {
        let entry = by_category
            .entry(card.category)
            .or_insert_with(|| CategoryPerformance {
                category: card.category,
                card_count: 0,
                total_value: 0.0,
                total_cost: 0.0,
                total_gain: 0.0,
                roi: 0.0,
            });
        entry.card_count += 1;
        entry.total_value += card.current_value;
        entry.total_cost += card.purchase_price;
        entry.total_gain += card.gain();
    }

    let mut result: Vec<CategoryPerformance> = by_category
        .into_values()
        .map(|mut perf| {
            perf.roi = percent_of(perf.total_gain, perf.total_cost);
            perf
        })
        .collect();

    result.sort_by(|a, b| {
        cmp_f64(b.total_value, a.total_value).then_with(|| a.category.cmp(&b.category))
    });
    result
}
