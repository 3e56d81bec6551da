//! Break-even and profit calculator commands

use anyhow::{Context, Result};
use binder_core::{
    calculate_break_even, calculate_profit, BreakEvenInput, FeeSchedule, ProfitInput,
};

use super::{print_json, signed_money};
use crate::cli::CostArgs;

/// Build pricing input from flags, falling back to the configured fees
pub fn costs_from_args(args: &CostArgs, fees: &FeeSchedule) -> Result<BreakEvenInput> {
    let fees = FeeSchedule {
        fvf_rate: args.fvf_rate.unwrap_or(fees.fvf_rate),
        promoted_rate: args.promoted_rate.unwrap_or(fees.promoted_rate),
        per_order_fee: args.per_order_fee.unwrap_or(fees.per_order_fee),
    };
    let input = BreakEvenInput::new(args.purchase, args.grading, args.shipping, &fees);
    input.validate().context("Invalid pricing input")?;
    Ok(input)
}

pub fn cmd_break_even(input: &BreakEvenInput, json: bool) -> Result<()> {
    let result = calculate_break_even(input);

    if json {
        return print_json(&result);
    }

    println!();
    println!("⚖️  Break-even Price");
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Costs (purchase + grading + shipping): ${:.2}", result.total_costs);

    if !result.achievable {
        println!(
            "   ⚠️  Fee rates total {:.1}% of the sale price; no price breaks even.",
            (input.fvf_rate + input.promoted_rate) * 100.0
        );
        return Ok(());
    }

    println!("   Final value fee:   ${:.2}", result.fvf_fee);
    if result.promoted_fee > 0.0 {
        println!("   Promoted listing:  ${:.2}", result.promoted_fee);
    }
    println!("   Per-order fee:     ${:.2}", result.per_order_fee);
    println!("   Total fees:        ${:.2}", result.total_fees);
    println!();
    println!("   ✅ List at ${:.2} or more to break even", result.break_even_price);

    Ok(())
}

pub fn cmd_profit(input: &ProfitInput, json: bool) -> Result<()> {
    input.validate().context("Invalid pricing input")?;
    let result = calculate_profit(input);

    if json {
        return print_json(&result);
    }

    println!();
    println!("💵 Profit at ${:.2}", result.sale_price);
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Costs:             ${:.2}", result.total_costs);
    println!("   Final value fee:   ${:.2}", result.fvf_fee);
    if result.promoted_fee > 0.0 {
        println!("   Promoted listing:  ${:.2}", result.promoted_fee);
    }
    println!("   Per-order fee:     ${:.2}", result.per_order_fee);
    println!("   Total fees:        ${:.2}", result.total_fees);
    println!();
    println!(
        "   Net profit: {} (ROI {:+.1}%, margin {:.1}%)",
        signed_money(result.net_profit),
        result.roi,
        result.profit_margin
    );

    Ok(())
}
