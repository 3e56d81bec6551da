//! Grading ROI expected-value model
//!
//! Estimates whether sending a raw card to a grading company pays off:
//!
//! 1. The card's condition label is mapped to one of five condition buckets
//! 2. Each bucket has a probability distribution over the grades the card
//!    could come back with
//! 3. Each grade has a value multiplier over the raw value
//! 4. The probability-weighted value is compared against the total
//!    investment (raw value + grading fee + shipping)
//!
//! All tables live in [`GradingTables`]. The built-in tables are read from
//! the embedded `config/engine.toml` and can be overridden from a config file.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::builtin;
use crate::error::{Error, Result};
use crate::metrics::percent_of;

/// Canonical condition buckets, best first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConditionBucket {
    #[serde(rename = "Near Mint-Mint")]
    NearMintMint,
    #[serde(rename = "Near Mint")]
    NearMint,
    #[serde(rename = "Excellent-Mint")]
    ExcellentMint,
    #[serde(rename = "Excellent")]
    Excellent,
    #[serde(rename = "Very Good")]
    VeryGood,
}

impl ConditionBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NearMintMint => "Near Mint-Mint",
            Self::NearMint => "Near Mint",
            Self::ExcellentMint => "Excellent-Mint",
            Self::Excellent => "Excellent",
            Self::VeryGood => "Very Good",
        }
    }

    /// Get all buckets
    pub fn all() -> &'static [ConditionBucket] {
        &[
            Self::NearMintMint,
            Self::NearMint,
            Self::ExcellentMint,
            Self::Excellent,
            Self::VeryGood,
        ]
    }
}

impl fmt::Display for ConditionBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ConditionBucket {
    type Err = String;

    /// Parse an exact bucket name (case-insensitive)
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::all()
            .iter()
            .find(|b| b.as_str().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| format!("Unknown condition bucket: {}", s))
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Map a free-form condition label to a condition bucket
///
/// Matching is case-insensitive and substring based. Empty or unrecognized
/// labels fall back to Near Mint; "Raw", "Mint" and "Gem Mint" map to the
/// top bucket.
pub fn map_condition_to_distribution(condition: &str) -> ConditionBucket {
    let label = condition.trim().to_uppercase();

    if label.is_empty() {
        return ConditionBucket::NearMint;
    }
    if label.contains("GEM") {
        return ConditionBucket::NearMintMint;
    }
    if contains_any(
        &label,
        &["NM-MT", "NM/MT", "NMMT", "NM MT", "NEAR MINT-MINT", "NEAR MINT MINT", "NEAR MINT/MINT"],
    ) {
        return ConditionBucket::NearMintMint;
    }
    if contains_any(&label, &["NEAR MINT", "NM"]) {
        return ConditionBucket::NearMint;
    }
    if contains_any(
        &label,
        &["EX-MT", "EX/MT", "EXMT", "EX MT", "EXCELLENT-MINT", "EXCELLENT MINT", "EXCELLENT/MINT"],
    ) {
        return ConditionBucket::ExcellentMint;
    }
    if contains_any(&label, &["EXCELLENT", "EX"]) {
        return ConditionBucket::Excellent;
    }
    if contains_any(&label, &["VERY GOOD", "VG", "GOOD", "FAIR", "POOR"]) {
        return ConditionBucket::VeryGood;
    }
    if contains_any(&label, &["MINT", "RAW"]) {
        return ConditionBucket::NearMintMint;
    }

    ConditionBucket::NearMint
}

/// Numeric value of a grade label ("9.5" -> 9.5)
pub fn grade_value(grade: &str) -> Option<f64> {
    grade.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Normalize a company or tier name for lookup ("Super Express" -> "superexpress")
pub(crate) fn normalize_key(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Probability of receiving a grade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeProbability {
    pub grade: String,
    pub probability: f64,
}

/// Grading fee, multiplier and probability tables
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradingTables {
    /// normalized company -> normalized tier -> fee
    costs: HashMap<String, HashMap<String, f64>>,
    /// grade label -> multiplier over raw value
    multipliers: HashMap<String, f64>,
    /// bucket -> grade distribution, highest grade first
    distributions: HashMap<ConditionBucket, Vec<GradeProbability>>,
}

impl Default for GradingTables {
    /// The built-in tables from the embedded engine config
    fn default() -> Self {
        builtin().grading.clone()
    }
}

impl GradingTables {
    /// Tables with no companies, grades or distributions
    pub fn empty() -> Self {
        Self {
            costs: HashMap::new(),
            multipliers: HashMap::new(),
            distributions: HashMap::new(),
        }
    }

    /// Set the fee for a company's service tier
    pub fn set_cost(&mut self, company: &str, tier: &str, cost: f64) {
        self.costs
            .entry(normalize_key(company))
            .or_default()
            .insert(normalize_key(tier), cost);
    }

    pub fn set_multiplier(&mut self, grade: &str, multiplier: f64) {
        self.multipliers.insert(grade.trim().to_string(), multiplier);
    }

    /// Replace a bucket's distribution (stored highest grade first)
    pub fn set_distribution(&mut self, bucket: ConditionBucket, mut grades: Vec<GradeProbability>) {
        grades.sort_by(|a, b| {
            let a = grade_value(&a.grade).unwrap_or(f64::MIN);
            let b = grade_value(&b.grade).unwrap_or(f64::MIN);
            b.partial_cmp(&a).unwrap_or(std::cmp::Ordering::Equal)
        });
        self.distributions.insert(bucket, grades);
    }

    /// Fee for a company and tier; 0 when either is unknown
    pub fn grading_cost(&self, company: &str, tier: &str) -> f64 {
        self.costs
            .get(&normalize_key(company))
            .and_then(|tiers| tiers.get(&normalize_key(tier)))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn multiplier(&self, grade: &str) -> Option<f64> {
        self.multipliers.get(grade.trim()).copied()
    }

    pub fn distribution(&self, bucket: ConditionBucket) -> &[GradeProbability] {
        self.distributions
            .get(&bucket)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Known companies and their tiers, sorted (normalized names)
    pub fn services(&self) -> Vec<(String, Vec<String>)> {
        let mut services: Vec<(String, Vec<String>)> = self
            .costs
            .iter()
            .map(|(company, tiers)| {
                let mut tiers: Vec<String> = tiers.keys().cloned().collect();
                tiers.sort();
                (company.clone(), tiers)
            })
            .collect();
        services.sort();
        services
    }

    /// Check table consistency
    ///
    /// Distributions must sum to 1.0 (within 0.01), every grade in a
    /// distribution needs a multiplier, and no number may be negative.
    pub fn validate(&self) -> Result<()> {
        for bucket in ConditionBucket::all() {
            let grades = self.distribution(*bucket);
            if grades.is_empty() {
                return Err(Error::Config(format!(
                    "No grade distribution for condition '{}'",
                    bucket
                )));
            }
            let total: f64 = grades.iter().map(|g| g.probability).sum();
            if (total - 1.0).abs() > 0.01 {
                return Err(Error::Config(format!(
                    "Grade probabilities for '{}' sum to {:.3}, expected 1.0",
                    bucket, total
                )));
            }
            for g in grades {
                if g.probability < 0.0 || !g.probability.is_finite() {
                    return Err(Error::Config(format!(
                        "Invalid probability {} for grade {} in '{}'",
                        g.probability, g.grade, bucket
                    )));
                }
                if grade_value(&g.grade).is_none() {
                    return Err(Error::Config(format!("Grade '{}' is not numeric", g.grade)));
                }
                if self.multiplier(&g.grade).is_none() {
                    return Err(Error::Config(format!(
                        "No multiplier configured for grade {}",
                        g.grade
                    )));
                }
            }
        }

        if let Some((grade, m)) = self
            .multipliers
            .iter()
            .find(|(_, m)| **m < 0.0 || !m.is_finite())
        {
            return Err(Error::Config(format!(
                "Invalid multiplier {} for grade {}",
                m, grade
            )));
        }

        for (company, tiers) in &self.costs {
            if let Some((tier, cost)) = tiers.iter().find(|(_, c)| **c < 0.0 || !c.is_finite()) {
                return Err(Error::Config(format!(
                    "Invalid grading cost {} for {} {}",
                    cost, company, tier
                )));
            }
        }

        Ok(())
    }
}

/// Grading fee from the built-in table; 0 for an unknown company or tier
pub fn get_grading_cost(company: &str, tier: &str) -> f64 {
    builtin().grading.grading_cost(company, tier)
}

/// Whether to send a card in for grading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Grade,
    Borderline,
    DontGrade,
}

impl Recommendation {
    /// Expected ROI (percent) above which grading is recommended
    pub const GRADE_MIN_ROI: f64 = 20.0;
    /// Break-even grade at or below which grading is recommended
    pub const GRADE_MAX_BREAK_EVEN: f64 = 9.0;
    /// Break-even grade at or above which grading is never recommended
    pub const DONT_GRADE_BREAK_EVEN: f64 = 10.0;

    /// Classify an expected ROI and break-even grade
    pub fn classify(expected_roi: f64, break_even_grade: Option<f64>) -> Self {
        match break_even_grade {
            None => Self::DontGrade,
            Some(_) if expected_roi < 0.0 => Self::DontGrade,
            Some(grade) if grade >= Self::DONT_GRADE_BREAK_EVEN => Self::DontGrade,
            Some(grade)
                if expected_roi > Self::GRADE_MIN_ROI && grade <= Self::GRADE_MAX_BREAK_EVEN =>
            {
                Self::Grade
            }
            Some(_) => Self::Borderline,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Grade => "Grade",
            Self::Borderline => "Borderline",
            Self::DontGrade => "Don't Grade",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A card considered for grading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingRoiInput {
    pub raw_value: f64,
    /// What was paid for the card; reported but not used in the projection
    #[serde(default)]
    pub purchase_price: f64,
    #[serde(default)]
    pub condition: String,
    pub company: String,
    pub tier: String,
    #[serde(default)]
    pub shipping_cost: f64,
    /// Per-grade multipliers that take precedence over the tables
    #[serde(default)]
    pub multiplier_overrides: HashMap<String, f64>,
}

impl GradingRoiInput {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("raw_value", self.raw_value),
            ("purchase_price", self.purchase_price),
            ("shipping_cost", self.shipping_cost),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidInput(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        if let Some((grade, m)) = self
            .multiplier_overrides
            .iter()
            .find(|(_, m)| **m < 0.0 || !m.is_finite())
        {
            return Err(Error::InvalidInput(format!(
                "Invalid multiplier override {} for grade {}",
                m, grade
            )));
        }
        Ok(())
    }
}

/// Projected result of receiving one grade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeOutcome {
    pub grade: String,
    pub probability: f64,
    pub multiplier: f64,
    pub projected_value: f64,
    pub net_profit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingRoiResult {
    pub condition_bucket: ConditionBucket,
    pub purchase_price: f64,
    pub grading_cost: f64,
    pub total_investment: f64,
    /// Grades with non-zero probability, highest first
    pub outcomes: Vec<GradeOutcome>,
    pub expected_value: f64,
    pub expected_profit: f64,
    pub expected_roi: f64,
    /// Lowest grade whose projected value exceeds the investment
    pub break_even_grade: Option<String>,
    pub recommendation: Recommendation,
}

/// Project the expected return of grading a card
pub fn calculate_grading_roi(input: &GradingRoiInput, tables: &GradingTables) -> GradingRoiResult {
    let condition_bucket = map_condition_to_distribution(&input.condition);
    let grading_cost = tables.grading_cost(&input.company, &input.tier);
    let total_investment = input.raw_value + grading_cost + input.shipping_cost;

    let outcomes: Vec<GradeOutcome> = tables
        .distribution(condition_bucket)
        .iter()
        .filter(|g| g.probability > 0.0)
        .map(|g| {
            let multiplier = input
                .multiplier_overrides
                .get(g.grade.trim())
                .copied()
                .or_else(|| tables.multiplier(&g.grade))
                .unwrap_or_else(|| {
                    warn!(grade = %g.grade, "No multiplier for grade, valuing at 0");
                    0.0
                });
            let projected_value = input.raw_value * multiplier;
            GradeOutcome {
                grade: g.grade.clone(),
                probability: g.probability,
                multiplier,
                projected_value,
                net_profit: projected_value - total_investment,
            }
        })
        .collect();

    let expected_value: f64 = outcomes
        .iter()
        .map(|o| o.probability * o.projected_value)
        .sum();
    let expected_profit = expected_value - total_investment;
    let expected_roi = percent_of(expected_profit, total_investment);

    // Outcomes are highest grade first; scan from the lowest
    let break_even_grade = outcomes
        .iter()
        .rev()
        .find(|o| o.projected_value > total_investment)
        .map(|o| o.grade.clone());

    let recommendation = Recommendation::classify(
        expected_roi,
        break_even_grade.as_deref().and_then(grade_value),
    );

    debug!(
        bucket = %condition_bucket,
        grading_cost,
        expected_roi,
        recommendation = %recommendation,
        "Calculated grading ROI"
    );

    GradingRoiResult {
        condition_bucket,
        purchase_price: input.purchase_price,
        grading_cost,
        total_investment,
        outcomes,
        expected_value,
        expected_profit,
        expected_roi,
        break_even_grade,
        recommendation,
    }
}
