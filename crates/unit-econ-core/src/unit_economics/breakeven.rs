use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::model::{evaluate, CalcInputs};
use crate::types::Money;

/// Hard minimum price: one currency subunit. The solver never searches
/// below it.
const PRICE_FLOOR: Decimal = dec!(0.01);
/// Upper limit of the search domain during bracket expansion.
const EXPANSION_CEILING: Decimal = dec!(10_000_000);
/// Doubling attempts before the upper bracket is declared unreachable.
const MAX_EXPANSIONS: u32 = 10;
/// Bisection iteration budget.
const MAX_BISECTIONS: u32 = 60;
/// Net profit within this band of zero counts as breakeven.
const CONVERGENCE_THRESHOLD: Decimal = dec!(0.01);

/// Net profit with every field of the record held fixed except price.
fn net_profit_at(input: &CalcInputs, price: Money) -> Money {
    evaluate(&input.with_price(price)).net_profit
}

/// Lowest price at which net profit is non-negative, unrounded.
///
/// Bracket expansion followed by bisection; net profit is assumed monotone
/// non-decreasing in price over the bracket. `None` is the expected
/// non-exceptional outcome when no price within the search domain covers
/// the costs.
pub(crate) fn breakeven_price(input: &CalcInputs) -> Option<Money> {
    let mut lo = PRICE_FLOOR;
    let mut hi = (input.price * dec!(3)).max(dec!(1000));

    for _ in 0..MAX_EXPANSIONS {
        if net_profit_at(input, hi) > Decimal::ZERO {
            break;
        }
        hi *= dec!(2);
        if hi > EXPANSION_CEILING {
            return None;
        }
    }

    let f_lo = net_profit_at(input, lo);
    let f_hi = net_profit_at(input, hi);

    // Profitable already at the floor: the zero crossing sits below the
    // minimum meaningful price, so the floor itself is the answer.
    if f_lo > Decimal::ZERO && f_hi > Decimal::ZERO {
        return Some(lo);
    }
    // Expansion exhausted without finding a profitable bound.
    if f_lo < Decimal::ZERO && f_hi < Decimal::ZERO {
        return None;
    }

    for _ in 0..MAX_BISECTIONS {
        let mid = (lo + hi) / dec!(2);
        let f_mid = net_profit_at(input, mid);
        if f_mid.abs() < CONVERGENCE_THRESHOLD {
            return Some(mid);
        }
        if f_mid > Decimal::ZERO {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    Some((lo + hi) / dec!(2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit_economics::model::{AdsMode, CommissionMode, TaxMode};

    fn inputs(price: Decimal, cogs: Decimal) -> CalcInputs {
        CalcInputs {
            price,
            cogs,
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
    fn test_converges_to_zero_crossing() {
        // net(P) = 0.76*P - 585, root at 769.7368...
        let be = breakeven_price(&inputs(dec!(1000), dec!(400))).unwrap();
        assert!((be - dec!(769.7368)).abs() < dec!(0.02), "got {be}");
        let residual = net_profit_at(&inputs(dec!(1000), dec!(400)), be);
        assert!(residual.abs() < dec!(0.01), "residual {residual}");
    }

    #[test]
    fn test_floor_when_profitable_at_one_subunit() {
        let mut input = inputs(dec!(100), Decimal::ZERO);
        input.commission_value = Decimal::ZERO;
        input.logistics = Decimal::ZERO;
        input.storage = Decimal::ZERO;
        input.returns_rate = Decimal::ZERO;
        input.ads_value = Decimal::ZERO;
        input.other_fees = Decimal::ZERO;
        input.opex_variable = Decimal::ZERO;
        input.tax_rate = Decimal::ZERO;
        assert_eq!(breakeven_price(&input), Some(dec!(0.01)));
    }

    #[test]
    fn test_bracket_expansion_above_initial_bound() {
        // net(P) = 0.9*P - 900, root at 1000 == the initial hi, where net
        // is exactly zero; the bracket must double once before bisection.
        let mut input = inputs(dec!(100), dec!(900));
        input.commission_value = dec!(0.1);
        input.logistics = Decimal::ZERO;
        input.storage = Decimal::ZERO;
        input.returns_rate = Decimal::ZERO;
        input.ads_value = Decimal::ZERO;
        input.other_fees = Decimal::ZERO;
        input.opex_variable = Decimal::ZERO;
        input.tax_rate = Decimal::ZERO;
        let be = breakeven_price(&input).unwrap();
        assert!((be - dec!(1000)).abs() < dec!(0.02), "got {be}");
    }

    #[test]
    fn test_no_solution_when_costs_unreachable() {
        // A flat 20M cost cannot be covered anywhere in the search domain.
        let be = breakeven_price(&inputs(dec!(1000), dec!(20_000_000)));
        assert_eq!(be, None);
    }

    #[test]
    fn test_no_solution_via_expansion_ceiling() {
        // Large starting price pushes the first doubling past the ceiling.
        let be = breakeven_price(&inputs(dec!(5_000_000), dec!(20_000_000)));
        assert_eq!(be, None);
    }

    #[test]
    fn test_solver_leaves_input_untouched() {
        let input = inputs(dec!(1000), dec!(400));
        let before = input.clone();
        let _ = breakeven_price(&input);
        assert_eq!(input, before);
    }
}
