// src/error.rs

use thiserror::Error;

/// A malformed scenario. Raised before the first simulated day.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field}: must be positive")]
    NonPositive { field: String },

    #[error("{field}: probabilities sum to {sum}, expected 1")]
    ProbabilitySum { field: String, sum: f64 },

    #[error("{field}: probability {value} is outside [0, 1]")]
    ProbabilityRange { field: String, value: f64 },

    #[error("{field}: order quantity {quantity} exceeds lane capacity {capacity}")]
    OrderExceedsCapacity {
        field: String,
        quantity: u32,
        capacity: u32,
    },

    #[error("{field}: average order interval {avg} exceeds maximum {max}")]
    IntervalRange { field: String, avg: u32, max: u32 },

    #[error("{field}: platoon name must not be empty")]
    EmptyName { field: String },

    #[error("{field}: platoon name {name:?} is already used by {first}")]
    DuplicateName {
        field: String,
        name: String,
        first: String,
    },

    #[error("{field}: expected {expected} values, got {actual}")]
    Length {
        field: String,
        expected: usize,
        actual: usize,
    },

    #[error("failed to read scenario: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse scenario: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConfigError {
    pub(crate) fn non_positive(field: impl Into<String>) -> Self {
        ConfigError::NonPositive {
            field: field.into(),
        }
    }
}

/// Ledger misuse or a broken ledger invariant.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("lot quantity must be positive")]
    NonPositiveQuantity,

    #[error("lot already expired ({days_until_expiry} days until expiry)")]
    ExpiredLot { days_until_expiry: i32 },

    #[error("requested {requested} units but the ledger holds {available}")]
    Underflow { requested: u32, available: u32 },

    #[error("invariant violated at lot {index}: {detail}")]
    InvariantViolation { index: usize, detail: String },
}

/// Anything that aborts a simulation run.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("day {day}: {source}")]
    Ledger {
        day: usize,
        #[source]
        source: LedgerError,
    },

    #[error("failed to write report: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
