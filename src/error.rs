//! Error taxonomy, per spec.md §7: contract violations detected at entry
//! (structured, fail-fast), and replication-level failures surfaced from the PSA
//! driver. Numeric edge cases are handled by clamping in §4, not by this module;
//! internal-invariant violations use `debug_assert!` at the call site instead of a
//! dedicated error type, per spec.md §7.3.
//!
//! Grounded on the teacher's *declared* (if unused in its own source)
//! `thiserror`/`anyhow` dependencies — this crate actually uses them, since
//! spec.md's error-handling section explicitly calls for a structured taxonomy.

use thiserror::Error;

/// Caller-side contract violations, detected at entry point A/B before any
/// simulation work begins.
#[derive(Debug, Error, PartialEq)]
pub enum ContractError {
    #[error("missing required key: {key}")]
    MissingKey { key: String },

    #[error("column `{key}` has length {actual}, expected {expected}")]
    LengthMismatch { key: String, expected: usize, actual: usize },

    #[error("invalid time horizon: {months} months")]
    InvalidHorizon { months: i64 },

    #[error("discount rate {rate} outside [0, 1)")]
    InvalidDiscountRate { rate: f64 },

    #[error("non-finite value for key `{key}`")]
    NonFiniteValue { key: String },

    #[error("unknown enum tag `{tag}` for field `{field}`")]
    UnknownEnumTag { field: String, tag: String },
}

/// A single PSA replication's failure, surfaced as an explicit sentinel in the
/// driver's output vector rather than aborting the whole PSA run, per spec.md §7's
/// note that callers may want to keep positional correspondence to the PSA list.
#[derive(Debug, Error, PartialEq)]
pub enum ReplicationError {
    #[error("cumulative probability exceeded 1.0 after composition for replication {index}")]
    CompositionOverflow { index: usize },

    #[error("numeric failure in replication {index}: {detail}")]
    Numeric { index: usize, detail: String },
}
