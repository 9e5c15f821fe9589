//! In-memory user record updater.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::filing::{
    domain::{CaId, UserId},
    ports::{UserDirectory, UserDirectoryError, UserDirectoryResult},
};

/// Thread-safe map of user to assigned reviewer.
///
/// Every user is treated as existing; user registration lives outside this
/// crate.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserDirectory {
    assignments: Arc<RwLock<HashMap<UserId, CaId>>>,
}

impl InMemoryUserDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> UserDirectoryError {
    UserDirectoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn set_assigned_ca(&self, user: UserId, ca: CaId) -> UserDirectoryResult<()> {
        let mut assignments = self.assignments.write().map_err(lock_error)?;
        assignments.insert(user, ca);
        Ok(())
    }

    async fn assigned_ca(&self, user: UserId) -> UserDirectoryResult<Option<CaId>> {
        let assignments = self.assignments.read().map_err(lock_error)?;
        Ok(assignments.get(&user).copied())
    }
}
