//! Error types for tax engine inputs.

use thiserror::Error;

/// Errors returned when tax engine inputs are unusable.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaxInputError {
    /// A monetary input was negative.
    #[error("{field} must not be negative")]
    NegativeAmount {
        /// Name of the offending input.
        field: &'static str,
    },
    /// A monetary total or product did not fit in a decimal.
    #[error("{field} is too large")]
    AmountTooLarge {
        /// Name of the overflowing quantity.
        field: &'static str,
    },
}

/// Error returned while parsing a regime name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown tax regime: {0}")]
pub struct ParseRegimeError(pub String);
