//! User record updater port.

use crate::filing::domain::{CaId, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for user directory operations.
pub type UserDirectoryResult<T> = Result<T, UserDirectoryError>;

/// Write access to the reviewer reference kept on user records.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Records `ca` as the user's assigned reviewer.
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError::NotFound`] when the user record does not
    /// exist.
    async fn set_assigned_ca(&self, user: UserId, ca: CaId) -> UserDirectoryResult<()>;

    /// Returns the user's assigned reviewer, if any.
    async fn assigned_ca(&self, user: UserId) -> UserDirectoryResult<Option<CaId>>;
}

/// Errors returned by user directory implementations.
#[derive(Debug, Clone, Error)]
pub enum UserDirectoryError {
    /// The user record was not found.
    #[error("user not found: {0}")]
    NotFound(UserId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl UserDirectoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
