use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::UnitEconError;
use crate::types::{Money, Rate};

// ---------------------------------------------------------------------------
// Mode enumerations
// ---------------------------------------------------------------------------

/// How the marketplace commission is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommissionMode {
    /// `commission_value` is a fraction of the sale price.
    #[serde(alias = "PCT")]
    Percent,
    /// `commission_value` is a flat amount per sale.
    #[serde(alias = "RUB")]
    Fixed,
}

impl FromStr for CommissionMode {
    type Err = UnitEconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PERCENT" | "PCT" => Ok(CommissionMode::Percent),
            "FIXED" | "RUB" => Ok(CommissionMode::Fixed),
            other => Err(UnitEconError::InvalidInput {
                field: "commission_mode".into(),
                reason: format!("Unknown commission mode '{other}' (expected PERCENT or FIXED)"),
            }),
        }
    }
}

/// How the advertising spend is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdsMode {
    /// `ads_value` is a flat spend per sale.
    PerSale,
    /// `ads_value` is a fraction of the sale price (the DRR itself).
    #[serde(alias = "DRR")]
    ShareOfRevenue,
}

impl FromStr for AdsMode {
    type Err = UnitEconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PER_SALE" => Ok(AdsMode::PerSale),
            "SHARE_OF_REVENUE" | "DRR" => Ok(AdsMode::ShareOfRevenue),
            other => Err(UnitEconError::InvalidInput {
                field: "ads_mode".into(),
                reason: format!(
                    "Unknown ads mode '{other}' (expected PER_SALE or SHARE_OF_REVENUE)"
                ),
            }),
        }
    }
}

/// Tax base selection, canonical form.
///
/// Older stored records carry regime codes rather than the base itself;
/// those are normalized here once, at construction time: `REV`, `USN6`,
/// `NPD`, `CUSTOM` and any unrecognized code mean revenue-based tax,
/// `PROFIT` and `USN15` mean profit-based tax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", from = "String")]
pub enum TaxMode {
    OnRevenue,
    OnProfit,
}

impl TaxMode {
    /// Map a wire/legacy code to the canonical base. Never fails: unknown
    /// codes deliberately fall back to the revenue base.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "ON_PROFIT" | "PROFIT" | "USN15" => TaxMode::OnProfit,
            _ => TaxMode::OnRevenue,
        }
    }
}

impl From<String> for TaxMode {
    fn from(code: String) -> Self {
        TaxMode::from_code(&code)
    }
}

impl FromStr for TaxMode {
    type Err = UnitEconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(TaxMode::from_code(s))
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Per-unit cost and pricing parameters for one SKU listing.
///
/// Immutable value record: constructed once per calculation, never mutated.
/// The engine does not validate economic sensibility; callers coerce and
/// validate user input before construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalcInputs {
    /// Unit sale price
    pub price: Money,
    /// Cost of goods sold per unit
    pub cogs: Money,
    pub commission_mode: CommissionMode,
    /// Fraction of price (Percent) or flat amount per sale (Fixed)
    pub commission_value: Decimal,
    /// Per-unit logistics cost
    pub logistics: Money,
    /// Per-unit storage cost
    pub storage: Money,
    /// Probability a unit is returned, conceptually in [0, 1]
    pub returns_rate: Rate,
    /// Cost incurred per returned unit
    pub return_cost: Money,
    pub ads_mode: AdsMode,
    /// Flat spend per sale (PerSale) or fraction of price (ShareOfRevenue)
    pub ads_value: Decimal,
    /// Miscellaneous per-unit fees
    pub other_fees: Money,
    /// Other variable operating cost per unit
    pub opex_variable: Money,
    pub tax_mode: TaxMode,
    /// Tax rate applied to the selected base, as a fraction
    pub tax_rate: Rate,
}

impl CalcInputs {
    /// Copy of this record with only the price substituted. The breakeven
    /// solver's sole way of producing trial inputs.
    pub fn with_price(&self, price: Money) -> CalcInputs {
        CalcInputs {
            price,
            ..self.clone()
        }
    }
}

/// Per-unit profitability decomposition, rounded to 2 decimal places.
///
/// Field names and rounding are a compatibility contract with stored
/// historical records and downstream renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalcResult {
    pub profit_before_tax: Money,
    pub tax: Money,
    pub net_profit: Money,
    pub margin_pct: Decimal,
    pub ads_rub: Money,
    pub drr_pct: Decimal,
    pub max_ads_rub: Money,
    pub max_drr_pct: Decimal,
    pub commission_rub: Money,
    pub expected_return_cost: Money,
    pub breakeven_price: Option<Money>,
}

// ---------------------------------------------------------------------------
// Cost model
// ---------------------------------------------------------------------------

/// Full unrounded decomposition at one price.
///
/// Ratios are fractions, not percentages. Rounding happens once, at the
/// output boundary in `compute`; the breakeven solver reads `net_profit`
/// from here so its sign decisions never see rounded values.
#[derive(Debug, Clone)]
pub(crate) struct RawBreakdown {
    pub profit_before_tax: Money,
    pub tax: Money,
    pub net_profit: Money,
    pub ads: Money,
    pub drr: Rate,
    pub max_ads: Money,
    pub max_drr: Rate,
    pub commission: Money,
    pub expected_return_cost: Money,
}

/// Evaluate the cost model at the record's price. One pass, no iteration,
/// no failure modes for finite numeric input: every division is guarded
/// by a price > 0 check.
pub(crate) fn evaluate(input: &CalcInputs) -> RawBreakdown {
    let price = input.price;

    let commission = match input.commission_mode {
        CommissionMode::Percent => price * input.commission_value,
        CommissionMode::Fixed => input.commission_value,
    };

    let (ads, drr) = match input.ads_mode {
        AdsMode::PerSale => {
            let drr = if price > Decimal::ZERO {
                input.ads_value / price
            } else {
                Decimal::ZERO
            };
            (input.ads_value, drr)
        }
        AdsMode::ShareOfRevenue => (price * input.ads_value, input.ads_value),
    };

    // Out-of-range return rates are clamped, not rejected.
    let returns_rate = input.returns_rate.clamp(Decimal::ZERO, Decimal::ONE);
    let expected_return_cost = returns_rate * input.return_cost;

    let total_costs = input.cogs
        + commission
        + input.logistics
        + input.storage
        + ads
        + input.other_fees
        + expected_return_cost
        + input.opex_variable;
    let profit_before_tax = price - total_costs;

    let tax_base = match input.tax_mode {
        TaxMode::OnRevenue => price.max(Decimal::ZERO),
        TaxMode::OnProfit => profit_before_tax.max(Decimal::ZERO),
    };
    let tax = tax_base * input.tax_rate;
    let net_profit = profit_before_tax - tax;

    // Largest ad spend that still keeps net profit non-negative, every
    // other cost held at its current level.
    let fixed_costs = total_costs - ads;
    let max_ads = match input.tax_mode {
        // Tax is a fixed fraction of price here, independent of ad spend.
        TaxMode::OnRevenue => price - fixed_costs - input.tax_rate * price,
        // net = (price - fixed - ads) * (1 - t): the tax factor cancels
        // at the zero-profit boundary.
        TaxMode::OnProfit => price - fixed_costs,
    };
    let max_ads = max_ads.max(Decimal::ZERO);
    let max_drr = if price > Decimal::ZERO {
        max_ads / price
    } else {
        Decimal::ZERO
    };

    RawBreakdown {
        profit_before_tax,
        tax,
        net_profit,
        ads,
        drr,
        max_ads,
        max_drr,
        commission,
        expected_return_cost,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn base_inputs() -> CalcInputs {
        CalcInputs {
            price: dec!(1000),
            cogs: dec!(400),
            commission_mode: CommissionMode::Percent,
            commission_value: dec!(0.18),
            logistics: dec!(80),
            storage: dec!(15),
            returns_rate: dec!(0.05),
            return_cost: dec!(200),
            ads_mode: AdsMode::PerSale,
            ads_value: dec!(50),
            other_fees: dec!(20),
            opex_variable: dec!(10),
            tax_mode: TaxMode::OnRevenue,
            tax_rate: dec!(0.06),
        }
    }

    #[test]
    fn test_commission_percent() {
        let raw = evaluate(&base_inputs());
        assert_eq!(raw.commission, dec!(180));
    }

    #[test]
    fn test_commission_fixed_ignores_price() {
        let mut input = base_inputs();
        input.commission_mode = CommissionMode::Fixed;
        input.commission_value = dec!(95);
        let raw = evaluate(&input);
        assert_eq!(raw.commission, dec!(95));
    }

    #[test]
    fn test_ads_per_sale_drr() {
        let raw = evaluate(&base_inputs());
        assert_eq!(raw.ads, dec!(50));
        assert_eq!(raw.drr, dec!(0.05));
    }

    #[test]
    fn test_ads_share_of_revenue() {
        let mut input = base_inputs();
        input.ads_mode = AdsMode::ShareOfRevenue;
        input.ads_value = dec!(0.07);
        let raw = evaluate(&input);
        assert_eq!(raw.ads, dec!(70));
        assert_eq!(raw.drr, dec!(0.07));
    }

    #[test]
    fn test_expected_return_cost() {
        let raw = evaluate(&base_inputs());
        // 5% of a 200 handling cost
        assert_eq!(raw.expected_return_cost, dec!(10));
    }

    #[test]
    fn test_returns_rate_clamped_above_one() {
        let mut input = base_inputs();
        input.returns_rate = dec!(1.7);
        let raw = evaluate(&input);
        assert_eq!(raw.expected_return_cost, dec!(200));
    }

    #[test]
    fn test_returns_rate_clamped_below_zero() {
        let mut input = base_inputs();
        input.returns_rate = dec!(-0.3);
        let raw = evaluate(&input);
        assert_eq!(raw.expected_return_cost, Decimal::ZERO);
    }

    #[test]
    fn test_profit_before_tax_decomposition() {
        let raw = evaluate(&base_inputs());
        // 1000 - (400 + 180 + 80 + 15 + 50 + 20 + 10 + 10)
        assert_eq!(raw.profit_before_tax, dec!(235));
    }

    #[test]
    fn test_tax_on_revenue() {
        let raw = evaluate(&base_inputs());
        assert_eq!(raw.tax, dec!(60));
        assert_eq!(raw.net_profit, dec!(175));
    }

    #[test]
    fn test_tax_on_profit() {
        let mut input = base_inputs();
        input.tax_mode = TaxMode::OnProfit;
        input.tax_rate = dec!(0.15);
        let raw = evaluate(&input);
        assert_eq!(raw.tax, dec!(35.25));
        assert_eq!(raw.net_profit, dec!(199.75));
    }

    #[test]
    fn test_tax_on_profit_negative_base_floored() {
        let mut input = base_inputs();
        input.tax_mode = TaxMode::OnProfit;
        input.cogs = dec!(2000);
        let raw = evaluate(&input);
        assert!(raw.profit_before_tax < Decimal::ZERO);
        assert_eq!(raw.tax, Decimal::ZERO);
    }

    #[test]
    fn test_zero_price_no_division() {
        let mut input = base_inputs();
        input.price = Decimal::ZERO;
        let raw = evaluate(&input);
        assert_eq!(raw.drr, Decimal::ZERO);
        assert_eq!(raw.max_drr, Decimal::ZERO);
        // Percent commission of a zero price
        assert_eq!(raw.commission, Decimal::ZERO);
    }

    #[test]
    fn test_max_ads_on_revenue() {
        let raw = evaluate(&base_inputs());
        // fixed costs without ads = 715; 1000 - 715 - 60 of revenue tax
        assert_eq!(raw.max_ads, dec!(225));
        assert_eq!(raw.max_drr, dec!(0.225));
    }

    #[test]
    fn test_max_ads_on_profit_tax_cancels() {
        let mut input = base_inputs();
        input.tax_mode = TaxMode::OnProfit;
        input.tax_rate = dec!(0.15);
        let raw = evaluate(&input);
        assert_eq!(raw.max_ads, dec!(285));
    }

    #[test]
    fn test_max_ads_clamped_to_zero() {
        let mut input = base_inputs();
        input.cogs = dec!(2000);
        let raw = evaluate(&input);
        assert_eq!(raw.max_ads, Decimal::ZERO);
    }

    #[test]
    fn test_tax_mode_legacy_aliases() {
        for code in ["REV", "USN6", "NPD", "CUSTOM", "ON_REVENUE"] {
            assert_eq!(TaxMode::from_code(code), TaxMode::OnRevenue, "{code}");
        }
        for code in ["PROFIT", "USN15", "ON_PROFIT", "usn15"] {
            assert_eq!(TaxMode::from_code(code), TaxMode::OnProfit, "{code}");
        }
        // Unrecognized codes default to the revenue base
        assert_eq!(TaxMode::from_code("PATENT"), TaxMode::OnRevenue);
        assert_eq!(TaxMode::from_code(""), TaxMode::OnRevenue);
    }

    #[test]
    fn test_mode_codes_from_str() {
        assert_eq!("PCT".parse::<CommissionMode>().unwrap(), CommissionMode::Percent);
        assert_eq!("fixed".parse::<CommissionMode>().unwrap(), CommissionMode::Fixed);
        assert!("FLAT".parse::<CommissionMode>().is_err());
        assert_eq!("DRR".parse::<AdsMode>().unwrap(), AdsMode::ShareOfRevenue);
        assert!("CPM".parse::<AdsMode>().is_err());
    }

    #[test]
    fn test_inputs_deserialize_legacy_codes() {
        let json = r#"{
            "price": 1000, "cogs": 400,
            "commission_mode": "PCT", "commission_value": 0.18,
            "logistics": 80, "storage": 15,
            "returns_rate": 0.05, "return_cost": 200,
            "ads_mode": "DRR", "ads_value": 0.05,
            "other_fees": 20, "opex_variable": 10,
            "tax_mode": "USN15", "tax_rate": 0.15
        }"#;
        let input: CalcInputs = serde_json::from_str(json).unwrap();
        assert_eq!(input.commission_mode, CommissionMode::Percent);
        assert_eq!(input.ads_mode, AdsMode::ShareOfRevenue);
        assert_eq!(input.tax_mode, TaxMode::OnProfit);
    }

    #[test]
    fn test_inputs_deserialize_unknown_tax_code_defaults() {
        let json = r#"{
            "price": 100, "cogs": 10,
            "commission_mode": "PERCENT", "commission_value": 0.1,
            "logistics": 0, "storage": 0,
            "returns_rate": 0, "return_cost": 0,
            "ads_mode": "PER_SALE", "ads_value": 0,
            "other_fees": 0, "opex_variable": 0,
            "tax_mode": "SOMETHING_NEW", "tax_rate": 0.06
        }"#;
        let input: CalcInputs = serde_json::from_str(json).unwrap();
        assert_eq!(input.tax_mode, TaxMode::OnRevenue);
    }

    #[test]
    fn test_tax_mode_serializes_canonical() {
        let json = serde_json::to_string(&TaxMode::OnProfit).unwrap();
        assert_eq!(json, r#""ON_PROFIT""#);
    }

    #[test]
    fn test_with_price_overrides_only_price() {
        let input = base_inputs();
        let trial = input.with_price(dec!(750));
        assert_eq!(trial.price, dec!(750));
        assert_eq!(trial.cogs, input.cogs);
        assert_eq!(trial.tax_mode, input.tax_mode);
        // the original record is untouched
        assert_eq!(input.price, dec!(1000));
    }
}
