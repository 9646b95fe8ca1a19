//! Error types for the batching engine.
//!
//! Malformed orders are not errors: they are left unassigned and reported
//! through `solver::UnassignedReason`.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlanError {
    /// A produced route broke pickup-before-dropoff. Programming error.
    #[error("route invariant violated for order {order_id}: {reason}")]
    InvariantViolation { order_id: String, reason: String },

    #[error("invalid batch options: {0}")]
    InvalidOptions(String),
}

pub type Result<T> = std::result::Result<T, PlanError>;
