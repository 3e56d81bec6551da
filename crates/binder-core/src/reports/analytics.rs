//! Collection composition analytics

use std::collections::HashMap;
use std::hash::Hash;

use crate::models::{Card, CollectionAnalytics, DistributionEntry};

use super::cmp_f64;

/// Fixed value buckets: (label, inclusive lower bound, exclusive upper bound)
const VALUE_BUCKETS: [(&str, f64, f64); 6] = [
    ("< $10", f64::NEG_INFINITY, 10.0),
    ("$10-$25", 10.0, 25.0),
    ("$25-$50", 25.0, 50.0),
    ("$50-$100", 50.0, 100.0),
    ("$100-$500", 100.0, 500.0),
    ("$500+", 500.0, f64::INFINITY),
];

const UNKNOWN_LABEL: &str = "Unknown";

/// Break a collection down by category, condition, year, brand and value
///
/// Counts within each distribution always sum to the number of cards.
pub fn generate_collection_analytics(cards: &[Card]) -> CollectionAnalytics {
    let total_cards = cards.len();

    let mut years = group(cards, |c| c.year);
    years.sort_by(|a, b| b.key.cmp(&a.key));

    CollectionAnalytics {
        total_cards,
        by_category: by_count(entries(group(cards, |c| c.category.as_str()), total_cards)),
        by_condition: by_count(entries(
            group(cards, |c| label_or_unknown(&c.condition)),
            total_cards,
        )),
        by_year: entries(years, total_cards),
        by_brand: by_count(entries(group(cards, |c| label_or_unknown(&c.brand)), total_cards)),
        by_value: value_distribution(cards),
    }
}

fn label_or_unknown(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        UNKNOWN_LABEL.to_string()
    } else {
        trimmed.to_string()
    }
}

fn share(count: usize, total: usize) -> f64 {
    if total > 0 {
        count as f64 / total as f64 * 100.0
    } else {
        0.0
    }
}

/// Cards sharing one grouping key
struct Group<K> {
    key: K,
    count: usize,
    total_value: f64,
}

/// Group cards by a key, unordered
fn group<K, F>(cards: &[Card], key: F) -> Vec<Group<K>>
where
    K: Eq + Hash,
    F: Fn(&Card) -> K,
{
    let mut groups: HashMap<K, (usize, f64)> = HashMap::new();
    for card in cards {
        let entry = groups.entry(key(card)).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += card.current_value;
    }

    groups
        .into_iter()
        .map(|(key, (count, total_value))| Group {
            key,
            count,
            total_value,
        })
        .collect()
}

/// Label groups and compute their share of `total` cards, keeping order
fn entries<K: ToString>(groups: Vec<Group<K>>, total: usize) -> Vec<DistributionEntry> {
    groups
        .into_iter()
        .map(|g| DistributionEntry {
            label: g.key.to_string(),
            count: g.count,
            total_value: g.total_value,
            percentage: share(g.count, total),
        })
        .collect()
}

/// Most common first, then alphabetical
fn by_count(mut distribution: Vec<DistributionEntry>) -> Vec<DistributionEntry> {
    distribution.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    distribution
}

fn value_distribution(cards: &[Card]) -> Vec<DistributionEntry> {
    VALUE_BUCKETS
        .iter()
        .map(|(label, low, high)| {
            let in_bucket: Vec<&Card> = cards
                .iter()
                .filter(|c| c.current_value >= *low && c.current_value < *high)
                .collect();
            DistributionEntry {
                label: label.to_string(),
                count: in_bucket.len(),
                total_value: in_bucket.iter().map(|c| c.current_value).sum(),
                percentage: share(in_bucket.len(), cards.len()),
            }
        })
        .collect()
}

/// Highest-value slice first; handy for charts
pub fn largest_by_value(entries: &[DistributionEntry]) -> Option<&DistributionEntry> {
    entries
        .iter()
        .max_by(|a, b| cmp_f64(a.total_value, b.total_value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{card, sample_collection};

    fn labels(entries: &[DistributionEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.label.as_str()).collect()
    }

    fn counts(entries: &[DistributionEntry]) -> Vec<usize> {
        entries.iter().map(|e| e.count).collect()
    }

    #[test]
    fn test_category_distribution() {
        let analytics = generate_collection_analytics(&sample_collection());
        assert_eq!(
            labels(&analytics.by_category),
            vec!["Baseball", "Basketball", "Football"]
        );
        assert_eq!(counts(&analytics.by_category), vec![3, 2, 1]);
        assert!((analytics.by_category[0].percentage - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_condition_distribution_ties_alphabetical() {
        let analytics = generate_collection_analytics(&sample_collection());
        assert_eq!(
            labels(&analytics.by_condition),
            vec!["Near Mint", "Excellent", "Near Mint-Mint", "PSA 9", "Very Good"]
        );
    }

    #[test]
    fn test_years_descending() {
        let analytics = generate_collection_analytics(&sample_collection());
        assert_eq!(
            labels(&analytics.by_year),
            vec!["2020", "2017", "2011", "2009", "2003", "1993"]
        );
    }

    #[test]
    fn test_years_sort_numerically() {
        let cards: Vec<Card> = [952, 2001, 1987, 2001]
            .iter()
            .enumerate()
            .map(|(i, year)| {
                let mut c = card(&i.to_string(), "P", 1.0, 2.0);
                c.year = *year;
                c
            })
            .collect();
        let analytics = generate_collection_analytics(&cards);
        assert_eq!(labels(&analytics.by_year), vec!["2001", "1987", "952"]);
        assert_eq!(counts(&analytics.by_year), vec![2, 1, 1]);
        assert!((analytics.by_year[0].total_value - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_value_buckets_fixed() {
        let analytics = generate_collection_analytics(&sample_collection());
        assert_eq!(analytics.by_value.len(), 6);
        assert_eq!(counts(&analytics.by_value), vec![1, 0, 1, 2, 2, 0]);
        assert_eq!(analytics.by_value[0].label, "< $10");
    }

    #[test]
    fn test_bucket_boundaries() {
        let cards = vec![
            card("1", "A", 1.0, 10.0),
            card("2", "B", 1.0, 500.0),
            card("3", "C", 1.0, 9.99),
        ];
        let analytics = generate_collection_analytics(&cards);
        assert_eq!(counts(&analytics.by_value), vec![1, 1, 0, 0, 0, 1]);
    }

    #[test]
    fn test_counts_sum_to_total() {
        let cards = sample_collection();
        let analytics = generate_collection_analytics(&cards);
        for dist in [
            &analytics.by_category,
            &analytics.by_condition,
            &analytics.by_year,
            &analytics.by_brand,
            &analytics.by_value,
        ] {
            assert_eq!(dist.iter().map(|e| e.count).sum::<usize>(), cards.len());
        }
    }

    #[test]
    fn test_blank_brand_is_unknown() {
        let mut c = card("1", "A", 1.0, 1.0);
        c.brand = "  ".to_string();
        let analytics = generate_collection_analytics(&[c]);
        assert_eq!(labels(&analytics.by_brand), vec!["Unknown"]);
    }

    #[test]
    fn test_empty_collection() {
        let analytics = generate_collection_analytics(&[]);
        assert_eq!(analytics.total_cards, 0);
        assert!(analytics.by_category.is_empty());
        assert_eq!(analytics.by_value.len(), 6);
        assert!(analytics.by_value.iter().all(|e| e.percentage == 0.0));
    }

    #[test]
    fn test_largest_by_value() {
        let analytics = generate_collection_analytics(&sample_collection());
        let largest = largest_by_value(&analytics.by_category).unwrap();
        assert_eq!(largest.label, "Basketball");
    }
}
