//! Per-SKU profitability: cost model and breakeven solver.
//!
//! Both halves are pure functions over their input record: no shared
//! state, no I/O, bounded work (the solver performs at most ~70 cost
//! model evaluations), safe to call concurrently from any context.

mod breakeven;
mod model;

pub use model::{AdsMode, CalcInputs, CalcResult, CommissionMode, TaxMode};

use rust_decimal::Decimal;
use std::time::Instant;

use crate::types::{round_money, round_pct, with_metadata, ComputationOutput};

const METHODOLOGY: &str = "Per-unit SKU economics with bracketed-bisection breakeven";

/// Evaluate the full profit decomposition and the breakeven price for one
/// SKU listing.
///
/// The sole entry point. Never fails for well-typed numeric input and
/// returns a fully populated result; `breakeven_price` is `None` when no
/// price within the search domain covers the costs.
pub fn compute(input: &CalcInputs) -> CalcResult {
    let raw = model::evaluate(input);
    let be = breakeven::breakeven_price(input);

    // One rounding pass, at the output boundary. Net profit is the exact
    // difference of the rounded terms and the margin derives from the
    // rounded net, so the published identities hold bit-for-bit.
    let profit_before_tax = round_money(raw.profit_before_tax);
    let tax = round_money(raw.tax);
    let net_profit = profit_before_tax - tax;
    let margin_pct = if input.price > Decimal::ZERO {
        round_pct(net_profit / input.price)
    } else {
        Decimal::ZERO
    };

    CalcResult {
        profit_before_tax,
        tax,
        net_profit,
        margin_pct,
        ads_rub: round_money(raw.ads),
        drr_pct: round_pct(raw.drr),
        max_ads_rub: round_money(raw.max_ads),
        max_drr_pct: round_pct(raw.max_drr),
        commission_rub: round_money(raw.commission),
        expected_return_cost: round_money(raw.expected_return_cost),
        breakeven_price: be.map(round_money),
    }
}

/// `compute` wrapped in the standard computation envelope, with warnings
/// for the conditions the pure calculation handles silently.
pub fn compute_report(input: &CalcInputs) -> ComputationOutput<CalcResult> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.returns_rate < Decimal::ZERO || input.returns_rate > Decimal::ONE {
        warnings.push(format!(
            "returns_rate {} is outside [0, 1] and was clamped for the expected return cost",
            input.returns_rate
        ));
    }

    let result = compute(input);

    if result.breakeven_price.is_none() {
        warnings.push(
            "No breakeven price within the search domain: costs exceed revenue at every candidate price"
                .to_string(),
        );
    }

    let elapsed = start.elapsed().as_micros() as u64;

    with_metadata(METHODOLOGY, input, warnings, elapsed, result)
}
