pub mod error;
pub mod types;
pub mod unit_economics;

#[cfg(feature = "reference")]
pub mod reference;

pub use error::UnitEconError;
pub use types::*;
pub use unit_economics::{
    compute, compute_report, AdsMode, CalcInputs, CalcResult, CommissionMode, TaxMode,
};

/// Standard result type for all unit-econ operations
pub type UnitEconResult<T> = Result<T, UnitEconError>;
