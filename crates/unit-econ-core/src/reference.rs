//! Marketplace reference tariffs.
//!
//! Per-unit cost defaults by marketplace and fulfillment scheme, updated
//! by hand when marketplace rates change. The engine itself never reads
//! this table; callers use it to prefill a [`CalcInputs`] record before
//! construction.
//!
//! [`CalcInputs`]: crate::unit_economics::CalcInputs

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::UnitEconError;
use crate::types::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Marketplace {
    #[serde(alias = "WB")]
    Wildberries,
    Ozon,
    #[serde(alias = "YM")]
    YandexMarket,
    #[serde(alias = "MEGA")]
    Megamarket,
    #[serde(alias = "ALI")]
    AliExpress,
    Lamoda,
}

impl Marketplace {
    pub fn label(&self) -> &'static str {
        match self {
            Marketplace::Wildberries => "Wildberries",
            Marketplace::Ozon => "Ozon",
            Marketplace::YandexMarket => "Yandex Market",
            Marketplace::Megamarket => "Megamarket",
            Marketplace::AliExpress => "AliExpress",
            Marketplace::Lamoda => "Lamoda",
        }
    }

    /// Fulfillment schemes this marketplace actually offers.
    pub fn schemes(&self) -> &'static [FulfillmentScheme] {
        use FulfillmentScheme::*;
        match self {
            Marketplace::Wildberries
            | Marketplace::Ozon
            | Marketplace::YandexMarket
            | Marketplace::Megamarket => &[Fbo, Fbs, Dbs],
            Marketplace::AliExpress => &[Fbs, Dbs],
            Marketplace::Lamoda => &[Fbo, Fbs],
        }
    }
}

impl FromStr for Marketplace {
    type Err = UnitEconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "WB" | "WILDBERRIES" => Ok(Marketplace::Wildberries),
            "OZON" => Ok(Marketplace::Ozon),
            "YM" | "YANDEX" | "YANDEX_MARKET" => Ok(Marketplace::YandexMarket),
            "MEGA" | "SBER" | "MEGAMARKET" => Ok(Marketplace::Megamarket),
            "ALI" | "ALIEXPRESS" => Ok(Marketplace::AliExpress),
            "LAMODA" => Ok(Marketplace::Lamoda),
            other => Err(UnitEconError::InvalidInput {
                field: "marketplace".into(),
                reason: format!("Unknown marketplace '{other}' (expected WB, OZON, YM, MEGA, ALI or LAMODA)"),
            }),
        }
    }
}

/// Who stores and ships the unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FulfillmentScheme {
    /// Fulfillment by operator: marketplace warehouse and delivery
    Fbo,
    /// Fulfillment by seller: own warehouse, marketplace delivery
    Fbs,
    /// Delivery by seller
    Dbs,
}

impl FromStr for FulfillmentScheme {
    type Err = UnitEconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FBO" => Ok(FulfillmentScheme::Fbo),
            "FBS" => Ok(FulfillmentScheme::Fbs),
            "DBS" => Ok(FulfillmentScheme::Dbs),
            other => Err(UnitEconError::InvalidInput {
                field: "scheme".into(),
                reason: format!("Unknown fulfillment scheme '{other}' (expected FBO, FBS or DBS)"),
            }),
        }
    }
}

/// Cost fields a reference default exists for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostField {
    Logistics,
    Storage,
    ReturnCost,
    OtherFees,
    OpexVariable,
}

impl FromStr for CostField {
    type Err = UnitEconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "logistics" => Ok(CostField::Logistics),
            "storage" => Ok(CostField::Storage),
            "return_cost" => Ok(CostField::ReturnCost),
            "other_fees" => Ok(CostField::OtherFees),
            "opex_variable" => Ok(CostField::OpexVariable),
            other => Err(UnitEconError::InvalidInput {
                field: "field".into(),
                reason: format!(
                    "Unknown cost field '{other}' (expected logistics, storage, return_cost, other_fees or opex_variable)"
                ),
            }),
        }
    }
}

/// One row of the tariff table: per-unit cost defaults for a
/// (marketplace, scheme) pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SchemeDefaults {
    pub logistics: Money,
    pub storage: Money,
    pub return_cost: Money,
    pub other_fees: Money,
    pub opex_variable: Money,
}

impl SchemeDefaults {
    pub fn get(&self, field: CostField) -> Money {
        match field {
            CostField::Logistics => self.logistics,
            CostField::Storage => self.storage,
            CostField::ReturnCost => self.return_cost,
            CostField::OtherFees => self.other_fees,
            CostField::OpexVariable => self.opex_variable,
        }
    }
}

const fn row(
    logistics: Decimal,
    storage: Decimal,
    return_cost: Decimal,
    other_fees: Decimal,
    opex_variable: Decimal,
) -> SchemeDefaults {
    SchemeDefaults {
        logistics,
        storage,
        return_cost,
        other_fees,
        opex_variable,
    }
}

/// Registered defaults for a (marketplace, scheme) pair, `None` when the
/// pair has no row in the tariff table.
pub fn scheme_defaults(
    marketplace: Marketplace,
    scheme: FulfillmentScheme,
) -> Option<SchemeDefaults> {
    use FulfillmentScheme::*;
    use Marketplace::*;
    match (marketplace, scheme) {
        (Ozon, Fbo) => Some(row(dec!(120), dec!(15), dec!(200), dec!(25), dec!(10))),
        (Ozon, Fbs) => Some(row(dec!(80), dec!(0), dec!(150), dec!(15), dec!(10))),
        (Wildberries, Fbo) => Some(row(dec!(110), dec!(18), dec!(180), dec!(20), dec!(8))),
        (Wildberries, Fbs) => Some(row(dec!(70), dec!(0), dec!(140), dec!(12), dec!(8))),
        (YandexMarket, Fbo) => Some(row(dec!(130), dec!(20), dec!(220), dec!(30), dec!(12))),
        (YandexMarket, Fbs) => Some(row(dec!(90), dec!(0), dec!(170), dec!(18), dec!(12))),
        (Megamarket, Fbo) => Some(row(dec!(140), dec!(22), dec!(240), dec!(35), dec!(15))),
        (Megamarket, Fbs) => Some(row(dec!(100), dec!(0), dec!(190), dec!(22), dec!(15))),
        (AliExpress, Fbo) => Some(row(dec!(180), dec!(25), dec!(300), dec!(40), dec!(20))),
        _ => None,
    }
}

/// Reference default for one cost field, or zero when no default is
/// registered for the combination.
pub fn reference_value(
    marketplace: Marketplace,
    scheme: FulfillmentScheme,
    field: CostField,
) -> Money {
    scheme_defaults(marketplace, scheme)
        .map(|defaults| defaults.get(field))
        .unwrap_or(Decimal::ZERO)
}
