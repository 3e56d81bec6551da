//! Aggregate portfolio metrics

use crate::models::{Card, PortfolioMetrics};

/// `numerator / denominator * 100`, or 0 when the denominator isn't positive
pub(crate) fn percent_of(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator * 100.0
    } else {
        0.0
    }
}

/// Round a money amount to cents
pub(crate) fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Compute totals for a set of cards
///
/// Empty and zero-cost collections produce zeros rather than NaN.
pub fn calculate_metrics(cards: &[Card]) -> PortfolioMetrics {
    let total_cards = cards.len();
    let total_value: f64 = cards.iter().map(|c| c.current_value).sum();
    let total_cost: f64 = cards.iter().map(|c| c.purchase_price).sum();
    let total_profit = total_value - total_cost;

    let (cards_sold, sales_revenue) = cards
        .iter()
        .filter_map(|c| c.sale())
        .fold((0usize, 0.0f64), |(count, revenue), (price, _)| {
            (count + 1, revenue + price)
        });

    let average_value = if total_cards > 0 {
        total_value / total_cards as f64
    } else {
        0.0
    };

    PortfolioMetrics {
        total_cards,
        total_value,
        total_cost,
        total_profit,
        roi: percent_of(total_profit, total_cost),
        average_value,
        cards_sold,
        sales_revenue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{card, date, sample_collection, sold};

    #[test]
    fn test_empty_collection() {
        let metrics = calculate_metrics(&[]);
        assert_eq!(metrics.total_cards, 0);
        assert_eq!(metrics.total_value, 0.0);
        assert_eq!(metrics.total_cost, 0.0);
        assert_eq!(metrics.total_profit, 0.0);
        assert_eq!(metrics.roi, 0.0);
        assert_eq!(metrics.average_value, 0.0);
        assert_eq!(metrics.cards_sold, 0);
        assert_eq!(metrics.sales_revenue, 0.0);
    }

    #[test]
    fn test_zero_cost_collection() {
        let cards = vec![card("1", "Promo", 0.0, 3.0), card("2", "Promo", 0.0, 2.0)];
        let metrics = calculate_metrics(&cards);
        assert_eq!(metrics.roi, 0.0);
        assert_eq!(metrics.total_profit, 5.0);
        assert_eq!(metrics.average_value, 2.5);
    }

    #[test]
    fn test_sample_collection_totals() {
        let metrics = calculate_metrics(&sample_collection());
        assert_eq!(metrics.total_cards, 6);
        assert!((metrics.total_value - 725.5).abs() < 1e-9);
        assert!((metrics.total_cost - 490.0).abs() < 1e-9);
        assert!((metrics.total_profit - 235.5).abs() < 1e-9);
        assert!((metrics.roi - 235.5 / 490.0 * 100.0).abs() < 1e-9);
        assert_eq!(metrics.cards_sold, 2);
        assert!((metrics.sales_revenue - 520.0).abs() < 1e-9);
    }

    #[test]
    fn test_profit_identity_holds() {
        let collections = vec![
            sample_collection(),
            vec![card("1", "A", 10.0, 0.0)],
            vec![sold(card("1", "A", 5.0, 1.0), 9.0, date(2024, 1, 1))],
        ];
        for cards in collections {
            let m = calculate_metrics(&cards);
            assert_eq!(m.total_profit, m.total_value - m.total_cost);
        }
    }

    #[test]
    fn test_half_sold_without_date_not_counted() {
        let mut c = card("1", "A", 10.0, 12.0);
        c.sell_price = Some(20.0);
        let m = calculate_metrics(&[c]);
        assert_eq!(m.cards_sold, 0);
        assert_eq!(m.sales_revenue, 0.0);
    }

    #[test]
    fn test_round_cents() {
        assert_eq!(round_cents(13.547646), 13.55);
        assert_eq!(round_cents(-2.004), -2.0);
        assert_eq!(percent_of(5.0, 0.0), 0.0);
        assert_eq!(percent_of(5.0, -1.0), 0.0);
    }
}
