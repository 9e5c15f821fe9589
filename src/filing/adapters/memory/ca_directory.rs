//! In-memory reviewer directory.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::filing::{
    domain::{CaId, Reviewer, UserId},
    ports::{CaDirectory, CaDirectoryError, CaDirectoryResult},
};

/// Thread-safe in-memory reviewer directory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCaDirectory {
    reviewers: Arc<RwLock<HashMap<CaId, Reviewer>>>,
}

impl InMemoryCaDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a reviewer record.
    ///
    /// Reviewer registration belongs to an external admin flow; this exists
    /// so tests and local tooling can seed the directory.
    ///
    /// # Errors
    ///
    /// Returns [`CaDirectoryError::DuplicateReviewer`] when the identifier is
    /// already registered.
    pub fn insert(&self, reviewer: Reviewer) -> CaDirectoryResult<()> {
        let mut reviewers = self.reviewers.write().map_err(lock_error)?;
        if reviewers.contains_key(&reviewer.id()) {
            return Err(CaDirectoryError::DuplicateReviewer(reviewer.id()));
        }
        reviewers.insert(reviewer.id(), reviewer);
        Ok(())
    }
}

fn lock_error(err: impl ToString) -> CaDirectoryError {
    CaDirectoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl CaDirectory for InMemoryCaDirectory {
    async fn rank_by_load(&self) -> CaDirectoryResult<Vec<Reviewer>> {
        let reviewers = self.reviewers.read().map_err(lock_error)?;
        let mut ranked: Vec<Reviewer> = reviewers.values().cloned().collect();
        ranked.sort_by(Reviewer::load_order);
        Ok(ranked)
    }

    async fn find_by_id(&self, id: CaId) -> CaDirectoryResult<Option<Reviewer>> {
        let reviewers = self.reviewers.read().map_err(lock_error)?;
        Ok(reviewers.get(&id).cloned())
    }

    async fn add_client(&self, ca: CaId, user: UserId) -> CaDirectoryResult<bool> {
        let mut reviewers = self.reviewers.write().map_err(lock_error)?;
        let reviewer = reviewers.get_mut(&ca).ok_or(CaDirectoryError::NotFound(ca))?;
        Ok(reviewer.add_client(user))
    }
}
