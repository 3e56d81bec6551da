//! Capital gains report for a calendar year

use chrono::Datelike;
use tracing::debug;

use crate::models::{Card, HoldingTerm, TaxLot, TaxReport};

/// Split the sales made in `year` into short- and long-term lots
///
/// A year with no sales yields empty lists and zero totals.
pub fn generate_tax_report(cards: &[Card], year: i32) -> TaxReport {
    let mut lots: Vec<TaxLot> = cards
        .iter()
        .filter_map(|card| {
            let (sale_price, sell_date) = card.sale()?;
            if sell_date.year() != year {
                return None;
            }
            let holding_period_days = (sell_date - card.purchase_date).num_days();
            Some(TaxLot {
                card: card.clone(),
                cost_basis: card.purchase_price,
                sale_price,
                gain_loss: sale_price - card.purchase_price,
                holding_period_days,
                term: HoldingTerm::classify(holding_period_days),
            })
        })
        .collect();

    lots.sort_by_key(|lot| lot.card.sell_date);

    let (short_term_gains, long_term_gains): (Vec<TaxLot>, Vec<TaxLot>) = lots
        .into_iter()
        .partition(|lot| lot.term == HoldingTerm::ShortTerm);

    let total_short_term: f64 = short_term_gains.iter().map(|l| l.gain_loss).sum();
    let total_long_term: f64 = long_term_gains.iter().map(|l| l.gain_loss).sum();

    debug!(
        year,
        short_term = short_term_gains.len(),
        long_term = long_term_gains.len(),
        "Generated tax report"
    );

    TaxReport {
        year,
        short_term_gains,
        long_term_gains,
        total_short_term,
        total_long_term,
        net_gain_loss: total_short_term + total_long_term,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{bought, card, date, sample_collection, sold};

    #[test]
    fn test_sample_year() {
        let report = generate_tax_report(&sample_collection(), 2023);
        assert_eq!(report.year, 2023);

        assert_eq!(report.short_term_gains.len(), 1);
        let short = &report.short_term_gains[0];
        assert_eq!(short.card.id, "c4");
        assert_eq!(short.holding_period_days, 228);
        assert_eq!(short.cost_basis, 80.0);
        assert_eq!(short.sale_price, 70.0);
        assert_eq!(short.gain_loss, -10.0);

        assert_eq!(report.long_term_gains.len(), 1);
        let long = &report.long_term_gains[0];
        assert_eq!(long.card.id, "c3");
        assert_eq!(long.holding_period_days, 576);
        assert_eq!(long.term, HoldingTerm::LongTerm);

        assert_eq!(report.total_short_term, -10.0);
        assert_eq!(report.total_long_term, 200.0);
        assert_eq!(report.net_gain_loss, 190.0);
    }

    #[test]
    fn test_year_without_sales() {
        let report = generate_tax_report(&sample_collection(), 1999);
        assert!(report.short_term_gains.is_empty());
        assert!(report.long_term_gains.is_empty());
        assert_eq!(report.total_short_term, 0.0);
        assert_eq!(report.total_long_term, 0.0);
        assert_eq!(report.net_gain_loss, 0.0);
    }

    #[test]
    fn test_exactly_one_year_is_short_term() {
        let c = bought(card("1", "A", 10.0, 10.0), date(2023, 1, 1));
        let c = sold(c, 20.0, date(2024, 1, 1));
        let report = generate_tax_report(&[c], 2024);
        assert_eq!(report.short_term_gains.len(), 1);
        assert_eq!(report.short_term_gains[0].holding_period_days, 365);

        let c = bought(card("2", "B", 10.0, 10.0), date(2023, 1, 1));
        let c = sold(c, 20.0, date(2024, 1, 2));
        let report = generate_tax_report(&[c], 2024);
        assert_eq!(report.long_term_gains.len(), 1);
    }

    #[test]
    fn test_unsold_and_half_sold_ignored() {
        let mut half = card("1", "A", 10.0, 10.0);
        half.sell_price = Some(50.0);
        let report = generate_tax_report(&[half, card("2", "B", 1.0, 1.0)], 2023);
        assert!(report.short_term_gains.is_empty());
        assert!(report.long_term_gains.is_empty());
    }

    #[test]
    fn test_lots_sorted_by_sale_date() {
        let a = sold(card("a", "A", 10.0, 10.0), 12.0, date(2023, 8, 1));
        let b = sold(card("b", "B", 10.0, 10.0), 15.0, date(2023, 3, 1));
        let report = generate_tax_report(&[a, b], 2023);
        let ids: Vec<&str> = report
            .short_term_gains
            .iter()
            .map(|l| l.card.id.as_str())
            .collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(report.total_short_term, 7.0);
    }
}
