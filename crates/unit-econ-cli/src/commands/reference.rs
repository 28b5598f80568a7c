use clap::Args;
use serde_json::Value;

use unit_econ_core::reference::{
    reference_value, scheme_defaults, CostField, FulfillmentScheme, Marketplace,
};

/// Arguments for reference default lookup
#[derive(Args)]
pub struct DefaultsArgs {
    /// Marketplace code (WB, OZON, YM, MEGA, ALI, LAMODA)
    #[arg(long)]
    pub marketplace: Marketplace,

    /// Fulfillment scheme (FBO, FBS, DBS)
    #[arg(long)]
    pub scheme: FulfillmentScheme,

    /// Single cost field to look up (logistics, storage, return_cost, other_fees, opex_variable)
    #[arg(long)]
    pub field: Option<CostField>,
}

pub fn run_defaults(args: DefaultsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    if let Some(field) = args.field {
        let value = reference_value(args.marketplace, args.scheme, field);
        return Ok(serde_json::json!({
            "result": {
                "marketplace": args.marketplace,
                "scheme": args.scheme,
                "field": field,
                "value": value,
            }
        }));
    }

    // Unregistered combinations fall back to an all-zero row, the same
    // contract the per-field lookup has.
    let row = scheme_defaults(args.marketplace, args.scheme).unwrap_or_default();
    Ok(serde_json::json!({
        "result": {
            "marketplace": args.marketplace,
            "scheme": args.scheme,
            "logistics": row.logistics,
            "storage": row.storage,
            "return_cost": row.return_cost,
            "other_fees": row.other_fees,
            "opex_variable": row.opex_variable,
        }
    }))
}
