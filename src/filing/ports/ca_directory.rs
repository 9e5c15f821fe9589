//! Reviewer directory port used by the assignment policy.

use crate::filing::domain::{CaId, Reviewer, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for reviewer directory operations.
pub type CaDirectoryResult<T> = Result<T, CaDirectoryError>;

/// Read and write access to chartered accountant records.
#[async_trait]
pub trait CaDirectory: Send + Sync {
    /// Returns every reviewer ordered by ascending client count.
    ///
    /// Ties are ordered by registration time, then identifier, so the first
    /// entry is a deterministic least-loaded choice.
    async fn rank_by_load(&self) -> CaDirectoryResult<Vec<Reviewer>>;

    /// Finds a reviewer by identifier.
    async fn find_by_id(&self, id: CaId) -> CaDirectoryResult<Option<Reviewer>>;

    /// Adds `user` to the reviewer's clients unless already present.
    ///
    /// Returns `true` when the client was added by this call.
    ///
    /// # Errors
    ///
    /// Returns [`CaDirectoryError::NotFound`] when the reviewer does not
    /// exist.
    async fn add_client(&self, ca: CaId, user: UserId) -> CaDirectoryResult<bool>;
}

/// Errors returned by reviewer directory implementations.
#[derive(Debug, Clone, Error)]
pub enum CaDirectoryError {
    /// The reviewer was not found.
    #[error("reviewer not found: {0}")]
    NotFound(CaId),

    /// A reviewer with the same identifier already exists.
    #[error("duplicate reviewer identifier: {0}")]
    DuplicateReviewer(CaId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl CaDirectoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
