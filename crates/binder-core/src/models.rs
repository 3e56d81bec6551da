//! Domain models for Binder

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Card category (the sport or game a card belongs to)
///
/// Serialized lowercase; parsed case-insensitively from JSON and CSV alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Baseball,
    Basketball,
    Football,
    Hockey,
    Soccer,
    Pokemon,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Baseball => "Baseball",
            Self::Basketball => "Basketball",
            Self::Football => "Football",
            Self::Hockey => "Hockey",
            Self::Soccer => "Soccer",
            Self::Pokemon => "Pokemon",
            Self::Other => "Other",
        }
    }

    /// Get all categories
    pub fn all() -> &'static [Category] {
        &[
            Self::Baseball,
            Self::Basketball,
            Self::Football,
            Self::Hockey,
            Self::Soccer,
            Self::Pokemon,
            Self::Other,
        ]
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "baseball" => Ok(Self::Baseball),
            "basketball" => Ok(Self::Basketball),
            "football" => Ok(Self::Football),
            "hockey" => Ok(Self::Hockey),
            "soccer" => Ok(Self::Soccer),
            "pokemon" | "pokémon" => Ok(Self::Pokemon),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which part of the collection a card belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CollectionType {
    /// Listed or intended for sale
    ForSale,
    /// Personal collection
    #[default]
    Keep,
}

impl CollectionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ForSale => "for_sale",
            Self::Keep => "keep",
        }
    }
}

impl std::str::FromStr for CollectionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "for_sale" | "forsale" | "sale" => Ok(Self::ForSale),
            "keep" | "personal" => Ok(Self::Keep),
            _ => Err(format!("Unknown collection type: {}", s)),
        }
    }
}

impl<'de> Deserialize<'de> for CollectionType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for CollectionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single owned card
///
/// Cards are supplied by the caller (the persistence layer owns the schema);
/// the engine only reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub category: Category,
    pub player: String,
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub brand: String,
    pub year: i32,
    #[serde(default)]
    pub card_number: String,
    /// Free-form condition label (e.g. "Near Mint", "PSA 9", "Raw")
    #[serde(default)]
    pub condition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grading_company: Option<String>,
    pub purchase_price: f64,
    pub purchase_date: NaiveDate,
    pub current_value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sell_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sell_date: Option<NaiveDate>,
    #[serde(default)]
    pub collection_type: CollectionType,
}

impl Card {
    /// A card counts as sold only when both sale price and sale date are set
    pub fn is_sold(&self) -> bool {
        self.sell_price.is_some() && self.sell_date.is_some()
    }

    /// Sale price and date, if the card is sold
    pub fn sale(&self) -> Option<(f64, NaiveDate)> {
        match (self.sell_price, self.sell_date) {
            (Some(price), Some(date)) => Some((price, date)),
            _ => None,
        }
    }

    /// The value the card is worth to the portfolio: sale price if sold,
    /// otherwise current market value
    pub fn realized_or_current_value(&self) -> f64 {
        self.sale()
            .map(|(price, _)| price)
            .unwrap_or(self.current_value)
    }

    /// Gain on the card (realized if sold, unrealized otherwise)
    pub fn gain(&self) -> f64 {
        self.realized_or_current_value() - self.purchase_price
    }

    /// Gain as a percentage of purchase price; None when the card was free
    pub fn gain_percent(&self) -> Option<f64> {
        if self.purchase_price > 0.0 {
            Some(self.gain() / self.purchase_price * 100.0)
        } else {
            None
        }
    }

    /// Short human label, e.g. "2018 Topps Shohei Ohtani #700"
    pub fn display_name(&self) -> String {
        let mut name = format!("{} {} {}", self.year, self.brand, self.player);
        if !self.card_number.is_empty() {
            name.push_str(&format!(" #{}", self.card_number));
        }
        if let Some(ref parallel) = self.parallel {
            name.push_str(&format!(" ({})", parallel));
        }
        name.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

// ========== Metrics Models ==========

/// Aggregate totals for a set of cards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioMetrics {
    pub total_cards: usize,
    pub total_value: f64,
    pub total_cost: f64,
    pub total_profit: f64,
    /// Percent; 0 when total cost is 0
    pub roi: f64,
    pub average_value: f64,
    pub cards_sold: usize,
    pub sales_revenue: f64,
}

// ========== Performance Models ==========

/// A card ranked by percentage gain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Performer {
    pub card: Card,
    pub gain: f64,
    pub gain_percent: f64,
}

/// Net gain for cards purchased in one calendar month
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyReturn {
    /// `YYYY-MM`
    pub month: String,
    pub card_count: usize,
    pub total_cost: f64,
    pub total_value: f64,
    pub net_gain: f64,
    pub return_percent: f64,
}

/// Aggregate return for one category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryPerformance {
    pub category: Category,
    pub card_count: usize,
    pub total_value: f64,
    pub total_cost: f64,
    pub total_gain: f64,
    pub roi: f64,
}

/// Performance report for a (filtered) portfolio
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioPerformance {
    pub as_of: NaiveDate,
    pub total_return: f64,
    pub realized_gains: f64,
    pub unrealized_gains: f64,
    pub best_performers: Vec<Performer>,
    pub worst_performers: Vec<Performer>,
    pub monthly_returns: Vec<MonthlyReturn>,
    pub category_performance: Vec<CategoryPerformance>,
    pub average_holding_days: f64,
    pub annualized_return: f64,
}

// ========== Analytics Models ==========

/// One slice of a distribution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionEntry {
    pub label: String,
    pub count: usize,
    pub total_value: f64,
    /// Share of cards (not value), percent
    pub percentage: f64,
}

/// Composition of a collection along five independent axes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionAnalytics {
    pub total_cards: usize,
    pub by_category: Vec<DistributionEntry>,
    pub by_condition: Vec<DistributionEntry>,
    pub by_year: Vec<DistributionEntry>,
    pub by_brand: Vec<DistributionEntry>,
    pub by_value: Vec<DistributionEntry>,
}

// ========== Market Models ==========

/// A card's move between purchase price and current market value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketMover {
    pub card: Card,
    pub purchase_value: f64,
    pub current_value: f64,
    pub change: f64,
    pub change_percent: f64,
}

/// Aggregate holdings for one player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerPerformance {
    pub player: String,
    pub card_count: usize,
    pub total_value: f64,
    pub total_cost: f64,
    pub total_return: f64,
    pub return_percent: f64,
}

/// Portfolio return against an external baseline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketComparison {
    pub portfolio_return: f64,
    pub market_index: f64,
    pub outperformance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketAnalysis {
    pub top_gainers: Vec<MarketMover>,
    pub top_losers: Vec<MarketMover>,
    pub player_performance: Vec<PlayerPerformance>,
    pub market_comparison: MarketComparison,
}

// ========== Tax Models ==========

/// Tax treatment of a sale, decided by holding period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoldingTerm {
    ShortTerm,
    LongTerm,
}

impl HoldingTerm {
    /// Holding periods up to and including this many days are short-term
    pub const SHORT_TERM_MAX_DAYS: i64 = 365;

    pub fn classify(holding_period_days: i64) -> Self {
        if holding_period_days <= Self::SHORT_TERM_MAX_DAYS {
            Self::ShortTerm
        } else {
            Self::LongTerm
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ShortTerm => "short_term",
            Self::LongTerm => "long_term",
        }
    }
}

impl std::fmt::Display for HoldingTerm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single sale in a tax year
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxLot {
    pub card: Card,
    pub cost_basis: f64,
    pub sale_price: f64,
    pub gain_loss: f64,
    pub holding_period_days: i64,
    pub term: HoldingTerm,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxReport {
    pub year: i32,
    pub short_term_gains: Vec<TaxLot>,
    pub long_term_gains: Vec<TaxLot>,
    pub total_short_term: f64,
    pub total_long_term: f64,
    pub net_gain_loss: f64,
}

// ========== Insurance Models ==========

/// Card count and value for one category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryValue {
    pub category: Category,
    pub card_count: usize,
    pub total_value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsuranceReport {
    pub total_replacement_value: f64,
    pub high_value_cards: Vec<Card>,
    pub category_breakdown: Vec<CategoryValue>,
    pub recommended_coverage: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{card, date, sold};

    #[test]
    fn test_category_round_trip() {
        for category in Category::all() {
            let parsed: Category = category.as_str().parse().unwrap();
            assert_eq!(parsed, *category);
        }
        assert!("curling".parse::<Category>().is_err());
    }

    #[test]
    fn test_sold_requires_price_and_date() {
        let mut c = card("1", "Ken Griffey Jr.", 10.0, 25.0);
        assert!(!c.is_sold());

        c.sell_price = Some(30.0);
        assert!(!c.is_sold());
        assert_eq!(c.gain(), 15.0);

        c.sell_date = Some(date(2024, 3, 1));
        assert!(c.is_sold());
        assert_eq!(c.gain(), 20.0);
    }

    #[test]
    fn test_gain_percent_free_card() {
        let c = card("1", "Promo", 0.0, 5.0);
        assert_eq!(c.gain_percent(), None);

        let c = sold(card("2", "Mike Trout", 50.0, 10.0), 75.0, date(2024, 1, 1));
        assert_eq!(c.gain_percent(), Some(50.0));
    }

    #[test]
    fn test_holding_term_boundary() {
        assert_eq!(HoldingTerm::classify(0), HoldingTerm::ShortTerm);
        assert_eq!(HoldingTerm::classify(365), HoldingTerm::ShortTerm);
        assert_eq!(HoldingTerm::classify(366), HoldingTerm::LongTerm);
    }

    #[test]
    fn test_display_name() {
        let mut c = card("1", "Shohei Ohtani", 10.0, 10.0);
        c.year = 2018;
        c.brand = "Topps".to_string();
        c.card_number = "700".to_string();
        c.parallel = Some("Gold".to_string());
        assert_eq!(c.display_name(), "2018 Topps Shohei Ohtani #700 (Gold)");
    }

    #[test]
    fn test_card_json_accepts_any_case() {
        let json = r#"{
            "id": "b1",
            "category": "Baseball",
            "player": "Cal Ripken Jr.",
            "year": 1982,
            "purchase_price": 20.0,
            "purchase_date": "2020-02-02",
            "current_value": 35.0,
            "collection_type": "For-Sale"
        }"#;
        let c: Card = serde_json::from_str(json).unwrap();
        assert_eq!(c.category, Category::Baseball);
        assert_eq!(c.collection_type, CollectionType::ForSale);

        let pokemon: Category = serde_json::from_str("\"POKEMON\"").unwrap();
        assert_eq!(pokemon, Category::Pokemon);
        assert!(serde_json::from_str::<Category>("\"curling\"").is_err());
        assert!(serde_json::from_str::<CollectionType>("\"trade\"").is_err());
    }

    #[test]
    fn test_enums_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&Category::Baseball).unwrap(), "\"baseball\"");
        assert_eq!(
            serde_json::to_string(&CollectionType::ForSale).unwrap(),
            "\"for_sale\""
        );
    }

    #[test]
    fn test_card_json_defaults() {
        let json = r#"{
            "id": "a1",
            "category": "baseball",
            "player": "Derek Jeter",
            "year": 1993,
            "purchase_price": 12.5,
            "purchase_date": "2021-06-01",
            "current_value": 40.0
        }"#;
        let c: Card = serde_json::from_str(json).unwrap();
        assert_eq!(c.category, Category::Baseball);
        assert_eq!(c.collection_type, CollectionType::Keep);
        assert!(c.team.is_empty());
        assert!(!c.is_sold());
    }
}
