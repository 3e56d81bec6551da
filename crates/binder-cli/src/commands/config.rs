//! Config inspection commands

use std::path::Path;

use anyhow::{Context, Result};
use binder_core::config::resolve_config_source;
use binder_core::grading::ConditionBucket;
use binder_core::{default_config_path, ConfigSource, EngineConfig};

use super::print_json;

pub fn cmd_config_path(explicit: Option<&Path>) -> Result<()> {
    let source = resolve_config_source(explicit).context("Failed to resolve config")?;

    println!("Active config: {}", source);
    match default_config_path() {
        Some(path) => {
            let status = if path.exists() { "present" } else { "not present" };
            println!("Override path: {} ({})", path.display(), status);
        }
        None => println!("Override path: unavailable (no data directory)"),
    }
    if source == ConfigSource::Embedded {
        println!();
        println!("Create the override file to customize fees and grading tables.");
    }

    Ok(())
}

pub fn cmd_config_show(config: &EngineConfig, json: bool) -> Result<()> {
    if json {
        return print_json(config);
    }

    println!();
    println!("⚙️  Engine Configuration");
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Market index return: {:.2}%", config.market.index_return);
    println!();
    println!("   Marketplace fees");
    println!("     Final value fee:  {:.2}%", config.fees.fvf_rate * 100.0);
    println!("     Promoted listing: {:.2}%", config.fees.promoted_rate * 100.0);
    println!("     Per-order fee:    ${:.2}", config.fees.per_order_fee);

    println!();
    println!("   Grading fees");
    for (company, tiers) in config.grading.services() {
        let priced: Vec<String> = tiers
            .iter()
            .map(|tier| format!("{} ${:.0}", tier, config.grading.grading_cost(&company, tier)))
            .collect();
        println!("     {:6} {}", company.to_uppercase(), priced.join(", "));
    }

    println!();
    println!("   Grade distributions");
    for bucket in ConditionBucket::all() {
        let grades: Vec<String> = config
            .grading
            .distribution(*bucket)
            .iter()
            .map(|g| {
                let multiplier = config.grading.multiplier(&g.grade).unwrap_or(0.0);
                format!("{} {:.0}% ×{}", g.grade, g.probability * 100.0, multiplier)
            })
            .collect();
        println!("     {:15} {}", bucket.as_str(), grades.join(", "));
    }

    Ok(())
}
