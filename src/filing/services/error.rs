//! Service-level error taxonomy for filing operations.

use crate::filing::{
    domain::{CaId, CommentId, FilingDomainError, FilingId},
    ports::{CaDirectoryError, FilingRepositoryError, UserDirectoryError},
};
use std::fmt;
use thiserror::Error;

/// Result type for filing service operations.
pub type FilingServiceResult<T> = Result<T, FilingServiceError>;

/// Coarse error discriminant for callers that map errors onto a transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Invalid input or an operation not legal in the current state.
    Validation,
    /// The resource is absent or not visible to the caller.
    NotFound,
    /// The caller is not the assigned reviewer.
    Authorization,
    /// A concurrent writer or a duplicate acknowledgement won.
    Conflict,
    /// A collaborator failed.
    Service,
}

impl ErrorKind {
    /// Returns the canonical name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Authorization => "authorization",
            Self::Conflict => "conflict",
            Self::Service => "service",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resource a lookup failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingResource {
    /// A filing, or a filing the caller may not see.
    Filing(FilingId),
    /// A comment on a filing.
    Comment(CommentId),
    /// A reviewer record.
    Reviewer(CaId),
}

impl fmt::Display for MissingResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Filing(id) => write!(f, "filing {id}"),
            Self::Comment(id) => write!(f, "comment {id}"),
            Self::Reviewer(id) => write!(f, "reviewer {id}"),
        }
    }
}

/// Why a write lost to another writer.
#[derive(Debug, Error)]
pub enum ConflictReason {
    /// The repository rejected a stale or duplicate write.
    #[error(transparent)]
    Repository(FilingRepositoryError),

    /// Every generated acknowledgement number was already taken.
    #[error("no unused acknowledgement number after {attempts} attempts")]
    AcknowledgementExhausted {
        /// Number of candidates tried.
        attempts: u32,
    },
}

/// Collaborator that failed.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    /// Filing storage failed.
    #[error(transparent)]
    Repository(FilingRepositoryError),
    /// Reviewer directory failed.
    #[error(transparent)]
    CaDirectory(#[from] CaDirectoryError),
    /// User record updater failed.
    #[error(transparent)]
    UserDirectory(#[from] UserDirectoryError),
}

/// Errors returned by filing services.
#[derive(Debug, Error)]
pub enum FilingServiceError {
    /// Domain validation failed; the filing was not written.
    #[error(transparent)]
    Validation(FilingDomainError),

    /// The resource does not exist or the caller may not see it.
    #[error("{0} not found")]
    NotFound(MissingResource),

    /// The caller is not the filing's assigned reviewer.
    #[error("reviewer {ca_id} is not assigned to filing {filing_id}")]
    Unauthorized {
        /// Filing the caller tried to act on.
        filing_id: FilingId,
        /// Caller.
        ca_id: CaId,
    },

    /// Another write won.
    #[error("conflict: {0}")]
    Conflict(#[source] ConflictReason),

    /// A collaborator failed; the source error is preserved.
    #[error("service unavailable: {0}")]
    Service(#[source] CollaboratorError),
}

impl FilingServiceError {
    /// Returns the error discriminant.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Unauthorized { .. } => ErrorKind::Authorization,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Service(_) => ErrorKind::Service,
        }
    }

    pub(super) const fn filing_not_found(id: FilingId) -> Self {
        Self::NotFound(MissingResource::Filing(id))
    }
}

impl From<FilingDomainError> for FilingServiceError {
    fn from(value: FilingDomainError) -> Self {
        match value {
            FilingDomainError::CommentNotFound(id) => Self::NotFound(MissingResource::Comment(id)),
            other => Self::Validation(other),
        }
    }
}

impl From<FilingRepositoryError> for FilingServiceError {
    fn from(value: FilingRepositoryError) -> Self {
        match value {
            FilingRepositoryError::NotFound(id) => Self::filing_not_found(id),
            FilingRepositoryError::VersionConflict { .. }
            | FilingRepositoryError::DuplicateAcknowledgement(_) => {
                Self::Conflict(ConflictReason::Repository(value))
            }
            other => Self::Service(CollaboratorError::Repository(other)),
        }
    }
}

impl From<CaDirectoryError> for FilingServiceError {
    fn from(value: CaDirectoryError) -> Self {
        Self::Service(value.into())
    }
}

impl From<UserDirectoryError> for FilingServiceError {
    fn from(value: UserDirectoryError) -> Self {
        Self::Service(value.into())
    }
}
