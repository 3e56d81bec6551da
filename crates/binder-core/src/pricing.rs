//! Break-even and profit pricing for marketplace sales
//!
//! Marketplace fees are modeled as a final value fee rate and an optional
//! promoted-listing rate (both charged on the sale price) plus a fixed
//! per-order fee. All monetary results are rounded to cents.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::metrics::{percent_of, round_cents};

/// Marketplace fee rates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Final value fee as a fraction of the sale price (0.129 = 12.9%)
    pub fvf_rate: f64,
    /// Promoted listing fee as a fraction of the sale price
    pub promoted_rate: f64,
    /// Fixed fee charged per order
    pub per_order_fee: f64,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            fvf_rate: 0.129,
            promoted_rate: 0.0,
            per_order_fee: 0.30,
        }
    }
}

impl FeeSchedule {
    pub fn validate(&self) -> Result<()> {
        check_rate("fvf_rate", self.fvf_rate)?;
        check_rate("promoted_rate", self.promoted_rate)?;
        check_amount("per_order_fee", self.per_order_fee)
    }
}

fn check_amount(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::InvalidInput(format!(
            "{} must be a non-negative number, got {}",
            name, value
        )));
    }
    Ok(())
}

fn check_rate(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(Error::InvalidInput(format!(
            "{} must be between 0 and 1, got {}",
            name, value
        )));
    }
    Ok(())
}

/// Costs and fees for a prospective sale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreakEvenInput {
    pub purchase_price: f64,
    #[serde(default)]
    pub grading_cost: f64,
    #[serde(default)]
    pub shipping_cost: f64,
    pub fvf_rate: f64,
    #[serde(default)]
    pub promoted_rate: f64,
    #[serde(default)]
    pub per_order_fee: f64,
}

impl BreakEvenInput {
    /// Build an input from costs and a fee schedule
    pub fn new(purchase_price: f64, grading_cost: f64, shipping_cost: f64, fees: &FeeSchedule) -> Self {
        Self {
            purchase_price,
            grading_cost,
            shipping_cost,
            fvf_rate: fees.fvf_rate,
            promoted_rate: fees.promoted_rate,
            per_order_fee: fees.per_order_fee,
        }
    }

    /// Reject negative or non-finite inputs before they reach the calculators
    pub fn validate(&self) -> Result<()> {
        check_amount("purchase_price", self.purchase_price)?;
        check_amount("grading_cost", self.grading_cost)?;
        check_amount("shipping_cost", self.shipping_cost)?;
        FeeSchedule {
            fvf_rate: self.fvf_rate,
            promoted_rate: self.promoted_rate,
            per_order_fee: self.per_order_fee,
        }
        .validate()
    }

    /// Purchase + grading + shipping (fees excluded)
    pub fn total_costs(&self) -> f64 {
        self.purchase_price + self.grading_cost + self.shipping_cost
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreakEvenResult {
    /// Minimum sale price that recovers all costs; 0 when not achievable
    pub break_even_price: f64,
    /// False when the fee rates consume the whole sale price
    pub achievable: bool,
    pub total_costs: f64,
    pub fvf_fee: f64,
    pub promoted_fee: f64,
    pub per_order_fee: f64,
    pub total_fees: f64,
}

/// Minimum sale price covering costs plus marketplace fees
///
/// `price = (costs + per_order_fee) / (1 - fvf_rate - promoted_rate)`. When
/// the rates sum to 1 or more no price can break even and 0 is returned.
pub fn calculate_break_even(input: &BreakEvenInput) -> BreakEvenResult {
    let fixed_costs = input.total_costs() + input.per_order_fee;
    let divisor = 1.0 - input.fvf_rate - input.promoted_rate;
    let achievable = divisor > 0.0;
    let price = if achievable { fixed_costs / divisor } else { 0.0 };

    let fvf_fee = price * input.fvf_rate;
    let promoted_fee = price * input.promoted_rate;

    BreakEvenResult {
        break_even_price: round_cents(price),
        achievable,
        total_costs: round_cents(input.total_costs()),
        fvf_fee: round_cents(fvf_fee),
        promoted_fee: round_cents(promoted_fee),
        per_order_fee: round_cents(input.per_order_fee),
        total_fees: round_cents(fvf_fee + promoted_fee + input.per_order_fee),
    }
}

/// A sale at a known price
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfitInput {
    #[serde(flatten)]
    pub costs: BreakEvenInput,
    pub sale_price: f64,
}

impl ProfitInput {
    pub fn new(costs: BreakEvenInput, sale_price: f64) -> Self {
        Self { costs, sale_price }
    }

    pub fn validate(&self) -> Result<()> {
        self.costs.validate()?;
        check_amount("sale_price", self.sale_price)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfitResult {
    pub sale_price: f64,
    pub fvf_fee: f64,
    pub promoted_fee: f64,
    pub per_order_fee: f64,
    pub total_fees: f64,
    pub total_costs: f64,
    pub net_profit: f64,
    /// Net profit over total costs, percent; 0 when costs are 0
    pub roi: f64,
    /// Net profit over sale price, percent; 0 when the sale price is 0
    pub profit_margin: f64,
}

/// Net profit of selling at `sale_price`, with fees charged on that price
pub fn calculate_profit(input: &ProfitInput) -> ProfitResult {
    let costs = &input.costs;
    let fvf_fee = input.sale_price * costs.fvf_rate;
    let promoted_fee = input.sale_price * costs.promoted_rate;
    let total_fees = fvf_fee + promoted_fee + costs.per_order_fee;
    let total_costs = costs.total_costs();
    let net_profit = input.sale_price - (total_fees + total_costs);

    ProfitResult {
        sale_price: round_cents(input.sale_price),
        fvf_fee: round_cents(fvf_fee),
        promoted_fee: round_cents(promoted_fee),
        per_order_fee: round_cents(costs.per_order_fee),
        total_fees: round_cents(total_fees),
        total_costs: round_cents(total_costs),
        net_profit: round_cents(net_profit),
        roi: round_cents(percent_of(net_profit, total_costs)),
        profit_margin: round_cents(percent_of(net_profit, input.sale_price)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ebay_input() -> BreakEvenInput {
        BreakEvenInput {
            purchase_price: 10.0,
            grading_cost: 0.0,
            shipping_cost: 1.50,
            fvf_rate: 0.129,
            promoted_rate: 0.0,
            per_order_fee: 0.30,
        }
    }

    #[test]
    fn test_break_even_price() {
        let result = calculate_break_even(&ebay_input());
        assert!((result.break_even_price - 13.55).abs() < 1e-9);
        assert!(result.achievable);
        assert_eq!(result.total_costs, 11.5);
        assert_eq!(result.fvf_fee, 1.75);
        assert_eq!(result.per_order_fee, 0.3);
        assert_eq!(result.total_fees, 2.05);
    }

    #[test]
    fn test_break_even_with_promoted_listing() {
        let input = BreakEvenInput {
            promoted_rate: 0.021,
            ..ebay_input()
        };
        let result = calculate_break_even(&input);
        // 11.80 / 0.85
        assert_eq!(result.break_even_price, 13.88);
        assert_eq!(result.promoted_fee, 0.29);
    }

    #[test]
    fn test_degenerate_fee_rates() {
        let input = BreakEvenInput {
            fvf_rate: 0.6,
            promoted_rate: 0.4,
            ..ebay_input()
        };
        let result = calculate_break_even(&input);
        assert_eq!(result.break_even_price, 0.0);
        assert!(!result.achievable);
        assert_eq!(result.fvf_fee, 0.0);
    }

    #[test]
    fn test_profit_at_sale_price() {
        let result = calculate_profit(&ProfitInput::new(ebay_input(), 20.0));
        assert_eq!(result.fvf_fee, 2.58);
        assert_eq!(result.total_fees, 2.88);
        assert_eq!(result.total_costs, 11.5);
        assert_eq!(result.net_profit, 5.62);
        assert_eq!(result.roi, 48.87);
        assert_eq!(result.profit_margin, 28.1);
    }

    #[test]
    fn test_profit_at_break_even_is_zero() {
        let input = ebay_input();
        let price = 11.8 / (1.0 - 0.129);
        let result = calculate_profit(&ProfitInput::new(input, price));
        assert_eq!(result.net_profit, 0.0);
    }

    #[test]
    fn test_profit_zero_costs() {
        let input = BreakEvenInput {
            purchase_price: 0.0,
            shipping_cost: 0.0,
            ..ebay_input()
        };
        let result = calculate_profit(&ProfitInput::new(input, 0.0));
        assert_eq!(result.roi, 0.0);
        assert_eq!(result.profit_margin, 0.0);
        assert_eq!(result.net_profit, -0.3);
    }

    #[test]
    fn test_from_fee_schedule() {
        let fees = FeeSchedule::default();
        let input = BreakEvenInput::new(10.0, 0.0, 1.5, &fees);
        assert_eq!(input, ebay_input());
    }

    #[test]
    fn test_validation() {
        assert!(ebay_input().validate().is_ok());

        let negative = BreakEvenInput {
            shipping_cost: -1.0,
            ..ebay_input()
        };
        assert!(negative.validate().is_err());

        let bad_rate = BreakEvenInput {
            fvf_rate: 1.5,
            ..ebay_input()
        };
        assert!(bad_rate.validate().is_err());

        let nan_sale = ProfitInput::new(ebay_input(), f64::NAN);
        assert!(nan_sale.validate().is_err());
    }

    #[test]
    fn test_profit_input_json_is_flat() {
        let input: ProfitInput = serde_json::from_str(
            r#"{"purchase_price": 10, "shipping_cost": 1.5, "fvf_rate": 0.129, "per_order_fee": 0.3, "sale_price": 20}"#,
        )
        .unwrap();
        assert_eq!(input.sale_price, 20.0);
        assert_eq!(input.costs.grading_cost, 0.0);
    }
}
