//! Repository port for filing persistence and scoped lookup.

use crate::filing::domain::{AcknowledgementNumber, CaId, Filing, FilingId, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for filing repository operations.
pub type FilingRepositoryResult<T> = Result<T, FilingRepositoryError>;

/// Filing persistence contract.
#[async_trait]
pub trait FilingRepository: Send + Sync {
    /// Stores a new filing.
    ///
    /// # Errors
    ///
    /// Returns [`FilingRepositoryError::DuplicateFiling`] when the filing ID
    /// already exists.
    async fn store(&self, filing: &Filing) -> FilingRepositoryResult<()>;

    /// Replaces a stored filing if its stored version equals
    /// `expected_version`.
    ///
    /// The version check and the write are a single atomic operation.
    ///
    /// # Errors
    ///
    /// Returns [`FilingRepositoryError::NotFound`] when the filing does not
    /// exist, [`FilingRepositoryError::VersionConflict`] when another writer
    /// got there first, or [`FilingRepositoryError::DuplicateAcknowledgement`]
    /// when the acknowledgement number is already taken.
    async fn update(&self, filing: &Filing, expected_version: u64) -> FilingRepositoryResult<()>;

    /// Finds a filing by identifier.
    ///
    /// Returns `None` when the filing does not exist.
    async fn find_by_id(&self, id: FilingId) -> FilingRepositoryResult<Option<Filing>>;

    /// Returns the owner's filings, newest first.
    async fn find_by_owner(&self, owner: UserId) -> FilingRepositoryResult<Vec<Filing>>;

    /// Returns filings assigned to the reviewer, newest first.
    async fn find_by_reviewer(&self, ca: CaId) -> FilingRepositoryResult<Vec<Filing>>;

    /// Returns `true` when a filing already carries `number`.
    async fn acknowledgement_exists(
        &self,
        number: &AcknowledgementNumber,
    ) -> FilingRepositoryResult<bool>;
}

/// Errors returned by filing repository implementations.
#[derive(Debug, Clone, Error)]
pub enum FilingRepositoryError {
    /// A filing with the same identifier already exists.
    #[error("duplicate filing identifier: {0}")]
    DuplicateFiling(FilingId),

    /// The filing was not found.
    #[error("filing not found: {0}")]
    NotFound(FilingId),

    /// The stored version no longer matches the version that was read.
    #[error("filing {filing_id} was modified concurrently (expected version {expected}, found {actual})")]
    VersionConflict {
        /// Filing being written.
        filing_id: FilingId,
        /// Version the writer read.
        expected: u64,
        /// Version currently stored.
        actual: u64,
    },

    /// Another filing already carries the acknowledgement number.
    #[error("duplicate acknowledgement number: {0}")]
    DuplicateAcknowledgement(AcknowledgementNumber),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl FilingRepositoryError {
    /// Wraps a data-quality or deserialization error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
