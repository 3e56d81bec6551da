//! Engine configuration
//!
//! Market baseline, marketplace fees and grading tables.
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. An explicit path, or the override in the data dir
//!    (~/.local/share/binder/config/engine.toml)
//! 2. Embedded defaults (compiled into binary)
//!
//! Override files may be partial; missing keys keep their defaults.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{Error, Result};
use crate::grading::{ConditionBucket, GradeProbability, GradingTables};
use crate::pricing::FeeSchedule;

/// Embedded default config (compiled into binary)
pub const DEFAULT_CONFIG: &str = include_str!("../../../config/engine.toml");

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarketConfig {
    /// Baseline return (percent) used by market analysis
    pub index_return: f64,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self { index_return: 10.0 }
    }
}

/// Everything the engine reads from configuration
///
/// `EngineConfig::default()` is the embedded config.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineConfig {
    pub market: MarketConfig,
    pub fees: FeeSchedule,
    pub grading: GradingTables,
}

impl Default for EngineConfig {
    fn default() -> Self {
        builtin().clone()
    }
}

/// Embedded config, parsed once
static BUILTIN: Lazy<EngineConfig> = Lazy::new(|| {
    parse_embedded().unwrap_or_else(|e| {
        error!("Embedded engine config is invalid: {}", e);
        EngineConfig::without_tables()
    })
});

/// The embedded config shared by `Default` impls and table lookups
pub(crate) fn builtin() -> &'static EngineConfig {
    &BUILTIN
}

fn parse_embedded() -> Result<EngineConfig> {
    let mut config = EngineConfig::without_tables();
    overlay(&mut config, DEFAULT_CONFIG)?;
    config.validate()?;
    Ok(config)
}

/// Where a loaded config came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Embedded,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Embedded => write!(f, "built-in defaults"),
        }
    }
}

impl EngineConfig {
    /// Scalar defaults with empty grading tables
    fn without_tables() -> Self {
        Self {
            market: MarketConfig::default(),
            fees: FeeSchedule::default(),
            grading: GradingTables::empty(),
        }
    }

    /// Load config from an explicit path, the data dir override, or the
    /// embedded defaults (in that order)
    ///
    /// An explicit path must exist; the data dir override is optional.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, ConfigSource)> {
        let source = resolve_config_source(explicit)?;
        let config = match &source {
            ConfigSource::File(path) => {
                let content = fs::read_to_string(path).map_err(|e| {
                    Error::Config(format!("Failed to read {}: {}", path.display(), e))
                })?;
                parse_config(&content)?
            }
            ConfigSource::Embedded => EngineConfig::default(),
        };
        debug!(source = %source, "Loaded engine config");
        Ok((config, source))
    }

    pub fn validate(&self) -> Result<()> {
        if !self.market.index_return.is_finite() {
            return Err(Error::Config(format!(
                "[market] index_return must be a number, got {}",
                self.market.index_return
            )));
        }
        self.fees
            .validate()
            .map_err(|e| Error::Config(format!("[fees] {}", e)))?;
        self.grading.validate()
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("binder").join("config").join("engine.toml"))
}

/// Decide which config file (if any) would be loaded
pub fn resolve_config_source(explicit: Option<&Path>) -> Result<ConfigSource> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        return Ok(ConfigSource::File(path.to_path_buf()));
    }

    Ok(default_config_path()
        .filter(|p| p.exists())
        .map(ConfigSource::File)
        .unwrap_or(ConfigSource::Embedded))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    market: Option<RawMarket>,
    fees: Option<RawFees>,
    grading: Option<RawGrading>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawMarket {
    index_return: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFees {
    fvf_rate: Option<f64>,
    promoted_rate: Option<f64>,
    per_order_fee: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawGrading {
    costs: Option<HashMap<String, HashMap<String, f64>>>,
    multipliers: Option<HashMap<String, f64>>,
    distributions: Option<HashMap<String, HashMap<String, f64>>>,
}

/// Parse config from TOML content, overlaying the built-in defaults
///
/// A distribution given for a condition replaces that condition's whole
/// table; costs and multipliers are merged key by key.
pub fn parse_config(content: &str) -> Result<EngineConfig> {
    let mut config = EngineConfig::default();
    overlay(&mut config, content)?;
    config.validate()?;
    Ok(config)
}

/// Apply the keys present in `content` on top of `config`
fn overlay(config: &mut EngineConfig, content: &str) -> Result<()> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    if let Some(market) = raw.market {
        if let Some(index_return) = market.index_return {
            config.market.index_return = index_return;
        }
    }

    if let Some(fees) = raw.fees {
        if let Some(rate) = fees.fvf_rate {
            config.fees.fvf_rate = rate;
        }
        if let Some(rate) = fees.promoted_rate {
            config.fees.promoted_rate = rate;
        }
        if let Some(fee) = fees.per_order_fee {
            config.fees.per_order_fee = fee;
        }
    }

    if let Some(grading) = raw.grading {
        for (company, tiers) in grading.costs.unwrap_or_default() {
            for (tier, cost) in tiers {
                config.grading.set_cost(&company, &tier, cost);
            }
        }

        for (grade, multiplier) in grading.multipliers.unwrap_or_default() {
            config.grading.set_multiplier(&grade, multiplier);
        }

        for (name, grades) in grading.distributions.unwrap_or_default() {
            let bucket: ConditionBucket = name.parse().map_err(Error::Config)?;
            let grades = grades
                .into_iter()
                .map(|(grade, probability)| GradeProbability { grade, probability })
                .collect();
            config.grading.set_distribution(bucket, grades);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_tables_come_from_embedded_config() {
        let embedded = parse_embedded().unwrap();
        assert_eq!(embedded, EngineConfig::default());
        assert_eq!(embedded.grading, GradingTables::default());

        let grading = &embedded.grading;
        assert_eq!(grading.grading_cost("PSA", "Super Express"), 200.0);
        assert_eq!(grading.grading_cost("CGC", "Bulk"), 15.0);
        assert_eq!(grading.multiplier("9.5"), Some(3.0));
        for bucket in ConditionBucket::all() {
            assert!(!grading.distribution(*bucket).is_empty(), "{}", bucket);
        }
    }

    #[test]
    fn test_builtin_parsed_once() {
        assert!(std::ptr::eq(builtin(), builtin()));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.market.index_return, 10.0);
        assert_eq!(config.fees, FeeSchedule::default());
    }

    #[test]
    fn test_partial_override() {
        let config = parse_config(
            r#"
            [market]
            index_return = 7.5

            [fees]
            promoted_rate = 0.02

            [grading.costs.PSA]
            regular = 40.0

            [grading.costs.TAG]
            basic = 18.0
            "#,
        )
        .unwrap();

        assert_eq!(config.market.index_return, 7.5);
        assert_eq!(config.fees.promoted_rate, 0.02);
        assert_eq!(config.fees.fvf_rate, 0.129);
        assert_eq!(config.grading.grading_cost("psa", "regular"), 40.0);
        assert_eq!(config.grading.grading_cost("PSA", "express"), 100.0);
        assert_eq!(config.grading.grading_cost("tag", "Basic"), 18.0);
    }

    #[test]
    fn test_distribution_override_replaces_table() {
        let config = parse_config(
            r#"
            [grading.distributions."very good"]
            "5" = 0.5
            "4" = 0.5
            "#,
        )
        .unwrap();
        let grades: Vec<&str> = config
            .grading
            .distribution(ConditionBucket::VeryGood)
            .iter()
            .map(|g| g.grade.as_str())
            .collect();
        assert_eq!(grades, vec!["5", "4"]);
    }

    #[test]
    fn test_invalid_configs_rejected() {
        // Probabilities don't sum to 1
        let err = parse_config(
            r#"
            [grading.distributions."Excellent"]
            "8" = 0.5
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        // Grade without a multiplier
        assert!(parse_config(
            r#"
            [grading.distributions."Excellent"]
            "2" = 1.0
            "#,
        )
        .is_err());

        // Unknown condition bucket
        assert!(parse_config(
            r#"
            [grading.distributions."Pristine"]
            "10" = 1.0
            "#,
        )
        .is_err());

        assert!(parse_config("[fees]\nfvf_rate = -0.1").is_err());
        assert!(parse_config("[grading.multipliers]\n\"10\" = -5.0").is_err());
        assert!(parse_config("[grading.costs.PSA]\nregular = -1.0").is_err());
        assert!(parse_config("[market]\nindex = 3.0").is_err());
        assert!(parse_config("not toml at all [").is_err());
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[market]\nindex_return = 4.0").unwrap();

        let (config, source) = EngineConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.market.index_return, 4.0);
        assert_eq!(source, ConfigSource::File(file.path().to_path_buf()));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            EngineConfig::load(Some(&missing)),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_default_config_path() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("binder/config/engine.toml"));
        }
    }
}
