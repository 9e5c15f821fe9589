//! Reviewer assignment and comment thread of a filing.

use super::{CaId, CommentId, FilingDomainError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A reviewer remark attached to one section of a filing.
///
/// Only the `resolved` flag changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    id: CommentId,
    section: String,
    text: String,
    created_at: DateTime<Utc>,
    resolved: bool,
}

impl Comment {
    /// Creates an unresolved comment.
    ///
    /// # Errors
    ///
    /// Returns [`FilingDomainError::EmptyCommentSection`] or
    /// [`FilingDomainError::EmptyCommentText`] when either value is blank.
    pub fn new(
        section: impl Into<String>,
        text: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, FilingDomainError> {
        let section_value = section.into().trim().to_owned();
        let text_value = text.into().trim().to_owned();
        if section_value.is_empty() {
            return Err(FilingDomainError::EmptyCommentSection);
        }
        if text_value.is_empty() {
            return Err(FilingDomainError::EmptyCommentText);
        }
        Ok(Self {
            id: CommentId::new(),
            section: section_value,
            text: text_value,
            created_at,
            resolved: false,
        })
    }

    /// Returns the comment identifier.
    #[must_use]
    pub const fn id(&self) -> CommentId {
        self.id
    }

    /// Returns the filing section the comment refers to.
    #[must_use]
    pub fn section(&self) -> &str {
        &self.section
    }

    /// Returns the comment body.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns `true` once the comment has been resolved.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.resolved
    }

    const fn resolve(&mut self) {
        self.resolved = true;
    }
}

/// Review state of a filing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaReview {
    assigned_ca: Option<CaId>,
    comments: Vec<Comment>,
    reviewed_at: Option<DateTime<Utc>>,
}

impl CaReview {
    /// Reconstructs review state from storage.
    #[must_use]
    pub const fn from_persisted(
        assigned_ca: Option<CaId>,
        comments: Vec<Comment>,
        reviewed_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            assigned_ca,
            comments,
            reviewed_at,
        }
    }

    /// Returns the assigned reviewer, if any.
    #[must_use]
    pub const fn assigned_ca(&self) -> Option<CaId> {
        self.assigned_ca
    }

    /// Returns comments in creation order.
    #[must_use]
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Returns when the reviewer last approved the filing.
    #[must_use]
    pub const fn reviewed_at(&self) -> Option<DateTime<Utc>> {
        self.reviewed_at
    }

    /// Returns the number of open comments.
    #[must_use]
    pub fn unresolved_count(&self) -> usize {
        self.comments
            .iter()
            .filter(|comment| !comment.is_resolved())
            .count()
    }

    /// Returns `true` when `ca` is the assigned reviewer.
    #[must_use]
    pub fn is_assigned_to(&self, ca: CaId) -> bool {
        self.assigned_ca == Some(ca)
    }

    /// Sets the reviewer unless one is already assigned.
    ///
    /// Returns `true` when the reviewer was set by this call.
    pub(super) const fn assign(&mut self, ca: CaId) -> bool {
        if self.assigned_ca.is_some() {
            return false;
        }
        self.assigned_ca = Some(ca);
        true
    }

    pub(super) fn push(&mut self, comment: Comment) -> Comment {
        self.comments.push(comment.clone());
        comment
    }

    pub(super) fn resolve(&mut self, id: CommentId) -> Result<&Comment, FilingDomainError> {
        let comment = self
            .comments
            .iter_mut()
            .find(|comment| comment.id() == id)
            .ok_or(FilingDomainError::CommentNotFound(id))?;
        comment.resolve();
        Ok(comment)
    }

    pub(super) const fn mark_reviewed(&mut self, at: DateTime<Utc>) {
        self.reviewed_at = Some(at);
    }
}
