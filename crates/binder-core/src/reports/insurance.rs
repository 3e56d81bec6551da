//! Insurance valuation report

use std::collections::HashMap;

use crate::metrics::calculate_metrics;
use crate::models::{Card, Category, CategoryValue, InsuranceReport};

use super::cmp_f64;

/// Coverage multiplier over replacement value (20% buffer)
pub const COVERAGE_BUFFER: f64 = 1.2;

/// Size insurance coverage for the whole collection
///
/// Replacement value covers every card, sold ones included.
pub fn generate_insurance_report(cards: &[Card]) -> InsuranceReport {
    let total_replacement_value = calculate_metrics(cards).total_value;

    // Top 10% by value, rounded up
    let high_value_count = cards.len().div_ceil(10);
    let mut by_value: Vec<&Card> = cards.iter().collect();
    by_value.sort_by(|a, b| cmp_f64(b.current_value, a.current_value));
    let high_value_cards: Vec<Card> = by_value
        .into_iter()
        .take(high_value_count)
        .cloned()
        .collect();

    InsuranceReport {
        total_replacement_value,
        high_value_cards,
        category_breakdown: category_breakdown(cards),
        recommended_coverage: total_replacement_value * COVERAGE_BUFFER,
    }
}

fn category_breakdown(cards: &[Card]) -> Vec<CategoryValue> {
    let mut by_category: HashMap<Category, (usize, f64)> = HashMap::new();
    for card in cards {
        let entry = by_category.entry(card.category).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += card.current_value;
    }

    let mut result: Vec<CategoryValue> = by_category
        .into_iter()
        .map(|(category, (card_count, total_value))| CategoryValue {
            category,
            card_count,
            total_value,
        })
        .collect();
    result.sort_by(|a, b| {
        cmp_f64(b.total_value, a.total_value).then_with(|| a.category.cmp(&b.category))
    });
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{card, sample_collection};

    #[test]
    fn test_sample_report() {
        let report = generate_insurance_report(&sample_collection());
        assert!((report.total_replacement_value - 725.5).abs() < 1e-9);
        assert!((report.recommended_coverage - 870.6).abs() < 1e-9);
        assert_eq!(report.high_value_cards.len(), 1);
        // Sold cards still count toward replacement value
        assert_eq!(report.high_value_cards[0].id, "c3");

        let cats: Vec<Category> = report.category_breakdown.iter().map(|c| c.category).collect();
        assert_eq!(
            cats,
            vec![Category::Basketball, Category::Baseball, Category::Football]
        );
        assert_eq!(report.category_breakdown[1].card_count, 3);
    }

    #[test]
    fn test_high_value_count_rounds_up() {
        for n in [1usize, 5, 9, 10, 11, 12, 20, 21] {
            let cards: Vec<Card> = (0..n)
                .map(|i| card(&i.to_string(), "P", 1.0, i as f64))
                .collect();
            let report = generate_insurance_report(&cards);
            assert_eq!(
                report.high_value_cards.len(),
                (n as f64 * 0.1).ceil() as usize,
                "n = {}",
                n
            );
        }
    }

    #[test]
    fn test_high_value_cards_are_most_valuable() {
        let cards: Vec<Card> = (0..12)
            .map(|i| card(&format!("c{}", i), "P", 1.0, (i * 7 % 12) as f64))
            .collect();
        let report = generate_insurance_report(&cards);
        let values: Vec<f64> = report
            .high_value_cards
            .iter()
            .map(|c| c.current_value)
            .collect();
        assert_eq!(values, vec![11.0, 10.0]);
    }

    #[test]
    fn test_empty_collection() {
        let report = generate_insurance_report(&[]);
        assert_eq!(report.total_replacement_value, 0.0);
        assert!(report.high_value_cards.is_empty());
        assert!(report.category_breakdown.is_empty());
        assert_eq!(report.recommended_coverage, 0.0);
    }
}
