//! Error types for filing domain validation and parsing.

use super::{CommentId, FilingStatus, FilingTrigger};
use crate::tax::TaxInputError;
use thiserror::Error;

/// Errors returned while validating or mutating a filing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilingDomainError {
    /// The trigger is not legal from the current status.
    #[error("cannot {trigger} a filing in {from} status")]
    InvalidTransition {
        /// Status the filing was in.
        from: FilingStatus,
        /// Trigger that was rejected.
        trigger: FilingTrigger,
    },

    /// Approval was requested while comments remain open.
    #[error("unresolved comments exist ({0} open)")]
    UnresolvedComments(usize),

    /// A filing may only be created as draft, pending review, or submitted.
    #[error("a filing cannot be created in {0} status")]
    InvalidInitialStatus(FilingStatus),

    /// No comment with the given identifier exists on the filing.
    #[error("comment not found: {0}")]
    CommentNotFound(CommentId),

    /// Comment section is empty after trimming.
    #[error("comment section must not be empty")]
    EmptyCommentSection,

    /// Comment text is empty after trimming.
    #[error("comment text must not be empty")]
    EmptyCommentText,

    /// A monetary input was negative.
    #[error("{field} must not be negative")]
    NegativeAmount {
        /// Name of the offending input.
        field: &'static str,
    },

    /// A monetary total did not fit in a decimal.
    #[error("{field} is too large")]
    AmountTooLarge {
        /// Name of the overflowing total.
        field: &'static str,
    },

    /// The assessment year is not `YYYY-YYYY` with consecutive years.
    #[error("invalid assessment year '{0}', expected YYYY-YYYY")]
    InvalidAssessmentYear(String),

    /// The PAN does not have the `AAAAA9999A` shape.
    #[error("invalid PAN '{0}'")]
    InvalidPan(String),

    /// The acknowledgement prefix is not 1 to 8 uppercase ASCII letters.
    #[error("invalid acknowledgement prefix '{0}'")]
    InvalidAcknowledgementPrefix(String),

    /// The acknowledgement number does not follow the issued format.
    #[error("invalid acknowledgement number '{0}'")]
    InvalidAcknowledgementNumber(String),
}

impl From<TaxInputError> for FilingDomainError {
    fn from(value: TaxInputError) -> Self {
        match value {
            TaxInputError::NegativeAmount { field } => Self::NegativeAmount { field },
            TaxInputError::AmountTooLarge { field } => Self::AmountTooLarge { field },
        }
    }
}

/// Error returned while parsing a filing status from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown filing status: {0}")]
pub struct ParseFilingStatusError(pub String);

/// Error returned while parsing an ITR form type.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown ITR form type: {0}")]
pub struct ParseItrFormError(pub String);
