use thiserror::Error;

#[derive(Debug, Error)]
pub enum UnitEconError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },
}
