//! Filing lifecycle states and the transition function.

use super::{FilingDomainError, ParseFilingStatusError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle position of a filing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilingStatus {
    /// Being assembled by the taxpayer.
    Draft,
    /// Waiting for the assigned reviewer.
    PendingReview,
    /// The reviewer has raised comments the taxpayer must address.
    ActionRequired,
    /// The reviewer has signed off.
    Approved,
    /// Submitted by the taxpayer without review.
    Submitted,
    /// E-filed; terminal.
    Filed,
}

impl FilingStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 6] = [
        Self::Draft,
        Self::PendingReview,
        Self::ActionRequired,
        Self::Approved,
        Self::Submitted,
        Self::Filed,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::PendingReview => "pending_review",
            Self::ActionRequired => "action_required",
            Self::Approved => "approved",
            Self::Submitted => "submitted",
            Self::Filed => "filed",
        }
    }

    /// Returns `true` when no trigger is accepted any more.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Filed)
    }

    /// Returns `true` when the reviewer has finished with the filing.
    #[must_use]
    pub const fn is_completed(self) -> bool {
        matches!(self, Self::Approved | Self::Filed)
    }

    /// Returns `true` when `trigger` is legal from this status.
    #[must_use]
    pub fn accepts(self, trigger: FilingTrigger) -> bool {
        transition(self, trigger).is_ok()
    }
}

impl fmt::Display for FilingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for FilingStatus {
    type Error = ParseFilingStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "draft" => Ok(Self::Draft),
            "pending_review" => Ok(Self::PendingReview),
            "action_required" => Ok(Self::ActionRequired),
            "approved" => Ok(Self::Approved),
            "submitted" => Ok(Self::Submitted),
            "filed" => Ok(Self::Filed),
            _ => Err(ParseFilingStatusError(value.to_owned())),
        }
    }
}

/// Event that asks a filing to move through its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilingTrigger {
    /// Taxpayer asks for a reviewer.
    RequestReview,
    /// Taxpayer submits directly, skipping review.
    Submit,
    /// Taxpayer edits income, deductions, or personal details.
    Edit,
    /// Reviewer raises a comment.
    AddComment,
    /// Reviewer signs off.
    Approve,
    /// Taxpayer e-files the return.
    File,
}

impl FilingTrigger {
    /// Every trigger.
    pub const ALL: [Self; 6] = [
        Self::RequestReview,
        Self::Submit,
        Self::Edit,
        Self::AddComment,
        Self::Approve,
        Self::File,
    ];

    /// Returns the canonical name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RequestReview => "request_review",
            Self::Submit => "submit",
            Self::Edit => "edit",
            Self::AddComment => "add_comment",
            Self::Approve => "approve",
            Self::File => "file",
        }
    }
}

impl fmt::Display for FilingTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decides whether `trigger` is legal from `current` and where it leads.
///
/// This is the only place transition legality is decided. Guards that depend
/// on more than the status (open comments, reviewer identity) are checked by
/// the caller before the transition is applied.
///
/// # Errors
///
/// Returns [`FilingDomainError::InvalidTransition`] naming both the current
/// status and the rejected trigger.
pub fn transition(
    current: FilingStatus,
    trigger: FilingTrigger,
) -> Result<FilingStatus, FilingDomainError> {
    use FilingStatus as S;
    use FilingTrigger as T;

    match (current, trigger) {
        (S::Draft, T::RequestReview) => Ok(S::PendingReview),
        (S::Draft, T::Submit) => Ok(S::Submitted),
        (S::Draft | S::ActionRequired, T::Edit) => Ok(current),
        (S::PendingReview | S::ActionRequired | S::Approved, T::AddComment) => {
            Ok(S::ActionRequired)
        }
        (S::PendingReview | S::ActionRequired | S::Approved, T::Approve) => Ok(S::Approved),
        (S::Approved | S::Submitted, T::File) => Ok(S::Filed),
        _ => Err(FilingDomainError::InvalidTransition {
            from: current,
            trigger,
        }),
    }
}
