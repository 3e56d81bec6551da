//! Grading ROI command

use std::collections::HashMap;

use anyhow::{Context, Result};
use binder_core::grading::grade_value;
use binder_core::{calculate_grading_roi, GradingRoiInput, GradingTables, Recommendation};

use super::{print_json, signed_money};

/// Parse repeated `GRADE=MULTIPLIER` flags
pub fn parse_multiplier_overrides(values: &[String]) -> Result<HashMap<String, f64>> {
    values
        .iter()
        .map(|value| -> Result<(String, f64)> {
            let (grade, multiplier) = value
                .split_once('=')
                .with_context(|| format!("Expected GRADE=MULTIPLIER, got '{}'", value))?;
            let grade = grade.trim();
            if grade_value(grade).is_none() {
                anyhow::bail!("Invalid grade '{}' in --multiplier", grade);
            }
            let multiplier: f64 = multiplier
                .trim()
                .parse()
                .with_context(|| format!("Invalid multiplier in '{}'", value))?;
            Ok((grade.to_string(), multiplier))
        })
        .collect()
}

pub fn cmd_grade(input: &GradingRoiInput, tables: &GradingTables, json: bool) -> Result<()> {
    input.validate().context("Invalid grading input")?;
    let result = calculate_grading_roi(input, tables);

    if json {
        return print_json(&result);
    }

    println!();
    println!(
        "🔬 Grading Estimate: {} {}",
        input.company.to_uppercase(),
        input.tier
    );
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Condition bucket:  {}", result.condition_bucket);
    println!("   Raw value:         ${:.2}", input.raw_value);
    if result.purchase_price > 0.0 {
        println!("   Paid:              ${:.2}", result.purchase_price);
    }
    if result.grading_cost == 0.0 {
        println!("   Grading fee:       $0.00 (unknown company or tier)");
    } else {
        println!("   Grading fee:       ${:.2}", result.grading_cost);
    }
    println!("   Total investment:  ${:.2}", result.total_investment);
    println!();
    println!(
        "   {:>5} │ {:>6} │ {:>10} │ {:>10}",
        "Grade", "Chance", "Value", "Profit"
    );
    println!("   ──────┼────────┼────────────┼────────────");
    for outcome in &result.outcomes {
        println!(
            "   {:>5} │ {:>5.0}% │ {:>10.2} │ {:>10}",
            outcome.grade,
            outcome.probability * 100.0,
            outcome.projected_value,
            signed_money(outcome.net_profit)
        );
    }
    println!();
    println!("   Expected value:    ${:.2}", result.expected_value);
    println!(
        "   Expected profit:   {} ({:+.1}%)",
        signed_money(result.expected_profit),
        result.expected_roi
    );
    match &result.break_even_grade {
        Some(grade) => println!("   Break-even grade:  {}", grade),
        None => println!("   Break-even grade:  none"),
    }
    println!();

    let icon = match result.recommendation {
        Recommendation::Grade => "✅",
        Recommendation::Borderline => "🤔",
        Recommendation::DontGrade => "❌",
    };
    println!("   {} {}", icon, result.recommendation);

    Ok(())
}
