use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use unit_econ_core::reference::{FulfillmentScheme, Marketplace, SchemeDefaults};
use unit_econ_core::unit_economics::{self, AdsMode, CalcInputs, CommissionMode, TaxMode};

use crate::input;

/// Arguments shared by the profitability commands
#[derive(Args)]
pub struct EconomicsArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Unit sale price
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Cost of goods sold per unit
    #[arg(long, default_value = "0")]
    pub cogs: Decimal,

    /// Commission basis: PERCENT (fraction of price) or FIXED (flat amount per sale)
    #[arg(long, default_value = "PERCENT")]
    pub commission_mode: CommissionMode,

    /// Commission as a fraction of price (PERCENT) or flat amount (FIXED)
    #[arg(long, default_value = "0")]
    pub commission_value: Decimal,

    /// Per-unit logistics cost (reference default when omitted)
    #[arg(long)]
    pub logistics: Option<Decimal>,

    /// Per-unit storage cost (reference default when omitted)
    #[arg(long)]
    pub storage: Option<Decimal>,

    /// Probability a unit is returned, 0 to 1
    #[arg(long, default_value = "0")]
    pub returns_rate: Decimal,

    /// Cost per returned unit (reference default when omitted)
    #[arg(long)]
    pub return_cost: Option<Decimal>,

    /// Advertising basis: PER_SALE (flat per sale) or SHARE_OF_REVENUE (fraction of price)
    #[arg(long, default_value = "PER_SALE")]
    pub ads_mode: AdsMode,

    /// Ad spend per sale (PER_SALE) or fraction of price (SHARE_OF_REVENUE)
    #[arg(long, default_value = "0")]
    pub ads_value: Decimal,

    /// Miscellaneous per-unit fees (reference default when omitted)
    #[arg(long)]
    pub other_fees: Option<Decimal>,

    /// Other variable operating cost per unit (reference default when omitted)
    #[arg(long)]
    pub opex_variable: Option<Decimal>,

    /// Tax base: ON_REVENUE or ON_PROFIT (legacy codes REV, USN6, NPD, CUSTOM, PROFIT, USN15 accepted)
    #[arg(long, default_value = "ON_REVENUE")]
    pub tax_mode: TaxMode,

    /// Tax rate as a fraction of the selected base
    #[arg(long, default_value = "0")]
    pub tax_rate: Decimal,

    /// Prefill omitted cost flags from this marketplace's reference tariffs
    #[arg(long, requires = "scheme")]
    pub marketplace: Option<Marketplace>,

    /// Fulfillment scheme for the reference prefill (FBO, FBS, DBS)
    #[arg(long, requires = "marketplace")]
    pub scheme: Option<FulfillmentScheme>,
}

/// Resolve the input record: file, piped stdin, or flags with reference
/// prefill for omitted cost fields.
fn build_inputs(args: &EconomicsArgs) -> Result<CalcInputs, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        return input::file::read_typed(path);
    }
    if let Some(data) = input::stdin::read_stdin()? {
        return Ok(serde_json::from_value(data)?);
    }

    let defaults = match (args.marketplace, args.scheme) {
        (Some(marketplace), Some(scheme)) => {
            unit_econ_core::reference::scheme_defaults(marketplace, scheme).unwrap_or_default()
        }
        _ => SchemeDefaults::default(),
    };

    Ok(CalcInputs {
        price: args.price.ok_or("--price is required (or provide --input)")?,
        cogs: args.cogs,
        commission_mode: args.commission_mode,
        commission_value: args.commission_value,
        logistics: args.logistics.unwrap_or(defaults.logistics),
        storage: args.storage.unwrap_or(defaults.storage),
        returns_rate: args.returns_rate,
        return_cost: args.return_cost.unwrap_or(defaults.return_cost),
        ads_mode: args.ads_mode,
        ads_value: args.ads_value,
        other_fees: args.other_fees.unwrap_or(defaults.other_fees),
        opex_variable: args.opex_variable.unwrap_or(defaults.opex_variable),
        tax_mode: args.tax_mode,
        tax_rate: args.tax_rate,
    })
}

pub fn run_compute(args: EconomicsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let inputs = build_inputs(&args)?;
    let report = unit_economics::compute_report(&inputs);
    Ok(serde_json::to_value(report)?)
}

pub fn run_breakeven(args: EconomicsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let inputs = build_inputs(&args)?;
    let result = unit_economics::compute(&inputs);
    Ok(serde_json::json!({
        "result": {
            "price": inputs.price,
            "breakeven_price": result.breakeven_price,
            "net_profit_at_current_price": result.net_profit,
            "margin_pct": result.margin_pct,
        }
    }))
}
