//! Card filtering
//!
//! `FilterCriteria` is a set of independent predicates combined with AND.
//! A predicate that is unset (or an empty set) always passes, so the default
//! criteria returns the whole collection in its original order.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Card, Category};

/// Predicates for selecting cards
///
/// Membership predicates (categories, teams, brands, conditions, years) are
/// exact matches against the provided set. Player matching is a
/// case-insensitive substring match against any of the provided fragments.
/// Date and value ranges are inclusive at both ends.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub purchased_from: Option<NaiveDate>,
    pub purchased_to: Option<NaiveDate>,
    pub categories: Vec<Category>,
    pub teams: Vec<String>,
    pub brands: Vec<String>,
    pub conditions: Vec<String>,
    pub years: Vec<i32>,
    pub players: Vec<String>,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
}

impl FilterCriteria {
    /// Create empty criteria (matches everything)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set purchase date range (either bound may be open)
    pub fn purchased_between(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.purchased_from = from;
        self.purchased_to = to;
        self
    }

    /// Restrict to categories
    pub fn categories(mut self, categories: impl IntoIterator<Item = Category>) -> Self {
        self.categories = categories.into_iter().collect();
        self
    }

    /// Restrict to teams (exact match)
    pub fn teams<S: Into<String>>(mut self, teams: impl IntoIterator<Item = S>) -> Self {
        self.teams = teams.into_iter().map(Into::into).collect();
        self
    }

    /// Restrict to brands (exact match)
    pub fn brands<S: Into<String>>(mut self, brands: impl IntoIterator<Item = S>) -> Self {
        self.brands = brands.into_iter().map(Into::into).collect();
        self
    }

    /// Restrict to condition labels (exact match)
    pub fn conditions<S: Into<String>>(mut self, conditions: impl IntoIterator<Item = S>) -> Self {
        self.conditions = conditions.into_iter().map(Into::into).collect();
        self
    }

    /// Restrict to card years
    pub fn years(mut self, years: impl IntoIterator<Item = i32>) -> Self {
        self.years = years.into_iter().collect();
        self
    }

    /// Match player names containing any of these fragments
    pub fn players<S: Into<String>>(mut self, fragments: impl IntoIterator<Item = S>) -> Self {
        self.players = fragments.into_iter().map(Into::into).collect();
        self
    }

    /// Set current value range (either bound may be open)
    pub fn value_between(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_value = min;
        self.max_value = max;
        self
    }

    /// True when no predicate is set
    pub fn is_empty(&self) -> bool {
        self.purchased_from.is_none()
            && self.purchased_to.is_none()
            && self.categories.is_empty()
            && self.teams.is_empty()
            && self.brands.is_empty()
            && self.conditions.is_empty()
            && self.years.is_empty()
            && self.player_fragments().is_empty()
            && self.min_value.is_none()
            && self.max_value.is_none()
    }

    /// Lowercased, non-blank player fragments
    fn player_fragments(&self) -> Vec<String> {
        self.players
            .iter()
            .map(|p| p.trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect()
    }

    /// Check a single card against every predicate
    pub fn matches(&self, card: &Card) -> bool {
        self.matches_with(card, &self.player_fragments())
    }

    fn matches_with(&self, card: &Card, player_fragments: &[String]) -> bool {
        if let Some(from) = self.purchased_from {
            if card.purchase_date < from {
                return false;
            }
        }
        if let Some(to) = self.purchased_to {
            if card.purchase_date > to {
                return false;
            }
        }

        if !self.categories.is_empty() && !self.categories.contains(&card.category) {
            return false;
        }
        if !self.teams.is_empty() && !self.teams.iter().any(|t| *t == card.team) {
            return false;
        }
        if !self.brands.is_empty() && !self.brands.iter().any(|b| *b == card.brand) {
            return false;
        }
        if !self.conditions.is_empty() && !self.conditions.iter().any(|c| *c == card.condition) {
            return false;
        }
        if !self.years.is_empty() && !self.years.contains(&card.year) {
            return false;
        }

        if !player_fragments.is_empty() {
            let player = card.player.to_lowercase();
            if !player_fragments.iter().any(|f| player.contains(f.as_str())) {
                return false;
            }
        }

        if let Some(min) = self.min_value {
            if card.current_value < min {
                return false;
            }
        }
        if let Some(max) = self.max_value {
            if card.current_value > max {
                return false;
            }
        }

        true
    }
}

/// Select the cards matching `criteria`, preserving input order
///
/// `None` or empty criteria returns a copy of the full collection.
pub fn filter_cards(cards: &[Card], criteria: Option<&FilterCriteria>) -> Vec<Card> {
    let criteria = match criteria {
        Some(c) if !c.is_empty() => c,
        _ => return cards.to_vec(),
    };

    let fragments = criteria.player_fragments();
    let filtered: Vec<Card> = cards
        .iter()
        .filter(|card| criteria.matches_with(card, &fragments))
        .cloned()
        .collect();

    debug!(
        total = cards.len(),
        matched = filtered.len(),
        "Filtered card collection"
    );

    filtered
}
