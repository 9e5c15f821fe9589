//! Chartered accountant records as seen by the assignment policy.

use super::{CaId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A reviewer and the clients assigned to them.
///
/// The client list is only a load metric. It grows through assignment and
/// shrinks only through administrative action outside this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reviewer {
    id: CaId,
    name: String,
    clients: Vec<UserId>,
    created_at: DateTime<Utc>,
}

impl Reviewer {
    /// Creates a reviewer with no clients.
    #[must_use]
    pub fn new(id: CaId, name: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.into(),
            clients: Vec::new(),
            created_at,
        }
    }

    /// Sets the existing client list.
    #[must_use]
    pub fn with_clients(mut self, clients: impl IntoIterator<Item = UserId>) -> Self {
        for client in clients {
            self.add_client(client);
        }
        self
    }

    /// Returns the reviewer identifier.
    #[must_use]
    pub const fn id(&self) -> CaId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns clients in the order they were added.
    #[must_use]
    pub fn clients(&self) -> &[UserId] {
        &self.clients
    }

    /// Returns the current load.
    #[must_use]
    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    /// Returns the registration timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns `true` when `user` is already a client.
    #[must_use]
    pub fn has_client(&self, user: UserId) -> bool {
        self.clients.contains(&user)
    }

    /// Adds `user` unless already a client; returns `true` when added.
    pub fn add_client(&mut self, user: UserId) -> bool {
        if self.has_client(user) {
            return false;
        }
        self.clients.push(user);
        true
    }

    /// Orders reviewers by ascending load, then registration time, then id.
    #[must_use]
    pub fn load_order(&self, other: &Self) -> std::cmp::Ordering {
        self.client_count()
            .cmp(&other.client_count())
            .then_with(|| self.created_at.cmp(&other.created_at))
            .then_with(|| self.id.cmp(&other.id))
    }
}
