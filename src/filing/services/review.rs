//! Reviewer-facing operations: comments, approval, and the CA workspace.

use super::{
    FilingServiceError, FilingServiceResult, MissingResource,
    scope::load_assigned,
};
use crate::filing::{
    domain::{CaId, Comment, CommentId, Filing, FilingId, FilingStatus, UserId},
    ports::{CaDirectory, FilingRepository},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Maximum number of pending filings listed on the dashboard.
pub const RECENT_PENDING_REVIEW_LIMIT: usize = 5;

/// Summary of a reviewer's workload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaDashboard {
    /// Number of clients on the reviewer's books.
    pub total_clients: usize,
    /// Assigned filings waiting in `pending_review`.
    pub pending_reviews: usize,
    /// Assigned filings that are approved or filed.
    pub completed_filings: usize,
    /// Newest pending filings, at most [`RECENT_PENDING_REVIEW_LIMIT`].
    pub recent_pending_reviews: Vec<Filing>,
}

/// Status of a client's most recent filing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LatestFiling {
    /// Filing identifier.
    pub filing_id: FilingId,
    /// Lifecycle status.
    pub status: FilingStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// One row of the reviewer's client list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClientSummary {
    /// Client reference.
    pub user_id: UserId,
    /// The client's newest filing; `None` when they have not filed yet.
    pub latest_filing: Option<LatestFiling>,
}

/// Review and approval orchestration service.
#[derive(Clone)]
pub struct ReviewService<R, D, C>
where
    R: FilingRepository,
    D: CaDirectory,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    directory: Arc<D>,
    clock: Arc<C>,
}

impl<R, D, C> ReviewService<R, D, C>
where
    R: FilingRepository,
    D: CaDirectory,
    C: Clock + Send + Sync,
{
    /// Creates a new review service.
    #[must_use]
    pub const fn new(repository: Arc<R>, directory: Arc<D>, clock: Arc<C>) -> Self {
        Self {
            repository,
            directory,
            clock,
        }
    }

    /// Appends a comment and moves the filing to `action_required`.
    ///
    /// Commenting on an approved filing revokes the approval.
    ///
    /// # Errors
    ///
    /// Returns [`FilingServiceError::Unauthorized`] when `ca` is not the
    /// assigned reviewer and [`FilingServiceError::Validation`] for blank
    /// input or a status that does not accept comments.
    pub async fn add_comment(
        &self,
        ca: CaId,
        filing_id: FilingId,
        section: &str,
        text: &str,
    ) -> FilingServiceResult<Comment> {
        let mut filing = load_assigned(&*self.repository, ca, filing_id).await?;
        let expected_version = filing.version();

        let comment = filing.add_comment(section, text, &*self.clock)?;
        self.repository.update(&filing, expected_version).await?;
        info!(
            filing_id = %filing_id,
            comment_id = %comment.id(),
            section = comment.section(),
            "comment added; action required"
        );
        Ok(comment)
    }

    /// Marks a comment resolved without changing the filing status.
    ///
    /// # Errors
    ///
    /// Returns [`FilingServiceError::NotFound`] for an unknown comment and
    /// [`FilingServiceError::Unauthorized`] when `ca` is not the assigned
    /// reviewer.
    pub async fn resolve_comment(
        &self,
        ca: CaId,
        filing_id: FilingId,
        comment_id: CommentId,
    ) -> FilingServiceResult<Comment> {
        let mut filing = load_assigned(&*self.repository, ca, filing_id).await?;
        let expected_version = filing.version();

        let comment = filing.resolve_comment(comment_id, &*self.clock)?;
        self.repository.update(&filing, expected_version).await?;
        info!(
            filing_id = %filing_id,
            comment_id = %comment_id,
            unresolved = filing.review().unresolved_count(),
            "comment resolved"
        );
        Ok(comment)
    }

    /// Approves a filing with no open comments.
    ///
    /// The unresolved-comment check and the status change are written with
    /// one conditional update, so a comment added concurrently makes this
    /// call fail with a conflict instead of approving past it.
    ///
    /// # Errors
    ///
    /// Returns [`FilingServiceError::Validation`] while comments are open or
    /// outside the review states, and [`FilingServiceError::Conflict`] when
    /// the filing changed since it was read.
    pub async fn approve_filing(&self, ca: CaId, filing_id: FilingId) -> FilingServiceResult<Filing> {
        let mut filing = load_assigned(&*self.repository, ca, filing_id).await?;
        let expected_version = filing.version();

        filing.approve(&*self.clock)?;
        self.repository.update(&filing, expected_version).await?;
        info!(filing_id = %filing_id, ca_id = %ca, "filing approved");
        Ok(filing)
    }

    /// Returns a filing assigned to `ca`.
    ///
    /// # Errors
    ///
    /// Returns [`FilingServiceError::NotFound`] when the filing is absent or
    /// assigned to another reviewer.
    pub async fn get_filing_for_review(
        &self,
        ca: CaId,
        filing_id: FilingId,
    ) -> FilingServiceResult<Filing> {
        match load_assigned(&*self.repository, ca, filing_id).await {
            Err(FilingServiceError::Unauthorized { .. }) => {
                Err(FilingServiceError::filing_not_found(filing_id))
            }
            other => other,
        }
    }

    /// Summarises the reviewer's workload.
    ///
    /// # Errors
    ///
    /// Returns [`FilingServiceError::NotFound`] for an unknown reviewer.
    pub async fn dashboard(&self, ca: CaId) -> FilingServiceResult<CaDashboard> {
        let reviewer = self
            .directory
            .find_by_id(ca)
            .await?
            .ok_or(FilingServiceError::NotFound(MissingResource::Reviewer(ca)))?;
        let assigned = self.repository.find_by_reviewer(ca).await?;

        let completed_filings = assigned
            .iter()
            .filter(|filing| filing.status().is_completed())
            .count();
        let pending: Vec<Filing> = assigned
            .into_iter()
            .filter(|filing| filing.status() == FilingStatus::PendingReview)
            .collect();

        Ok(CaDashboard {
            total_clients: reviewer.client_count(),
            pending_reviews: pending.len(),
            completed_filings,
            recent_pending_reviews: pending
                .into_iter()
                .take(RECENT_PENDING_REVIEW_LIMIT)
                .collect(),
        })
    }

    /// Lists the reviewer's clients with their newest filing.
    ///
    /// # Errors
    ///
    /// Returns [`FilingServiceError::NotFound`] for an unknown reviewer.
    pub async fn clients(&self, ca: CaId) -> FilingServiceResult<Vec<ClientSummary>> {
        let reviewer = self
            .directory
            .find_by_id(ca)
            .await?
            .ok_or(FilingServiceError::NotFound(MissingResource::Reviewer(ca)))?;

        let mut summaries = Vec::with_capacity(reviewer.client_count());
        for &user_id in reviewer.clients() {
            let filings = self.repository.find_by_owner(user_id).await?;
            summaries.push(ClientSummary {
                user_id,
                latest_filing: filings.first().map(|filing| LatestFiling {
                    filing_id: filing.id(),
                    status: filing.status(),
                    created_at: filing.created_at(),
                }),
            });
        }
        Ok(summaries)
    }
}
