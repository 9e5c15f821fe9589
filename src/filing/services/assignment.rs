//! Least-loaded reviewer assignment.
//!
//! Two concurrent requests may read the same least-loaded reviewer before
//! either write lands. The resulting imbalance is transient and accepted:
//! the policy is a load-balancing heuristic, not a strict guarantee.

use super::FilingServiceResult;
use crate::filing::{
    domain::{CaId, Filing},
    ports::{CaDirectory, UserDirectory},
};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What an assignment attempt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentOutcome {
    /// A reviewer was chosen by this call.
    Assigned(CaId),
    /// The filing already had a reviewer; nothing was written.
    AlreadyAssigned(CaId),
    /// No reviewer exists; the filing proceeds unassigned.
    NoReviewerAvailable,
}

impl AssignmentOutcome {
    /// Returns the reviewer now responsible for the filing, if any.
    #[must_use]
    pub const fn reviewer(self) -> Option<CaId> {
        match self {
            Self::Assigned(ca) | Self::AlreadyAssigned(ca) => Some(ca),
            Self::NoReviewerAvailable => None,
        }
    }
}

/// Picks the reviewer with the fewest clients for a filing.
#[derive(Clone)]
pub struct CaAssignmentPolicy<D, U>
where
    D: CaDirectory,
    U: UserDirectory,
{
    directory: Arc<D>,
    users: Arc<U>,
}

impl<D, U> CaAssignmentPolicy<D, U>
where
    D: CaDirectory,
    U: UserDirectory,
{
    /// Creates a policy over the given collaborators.
    #[must_use]
    pub const fn new(directory: Arc<D>, users: Arc<U>) -> Self {
        Self { directory, users }
    }

    /// Assigns the least-loaded reviewer to `filing` unless one is already
    /// set.
    ///
    /// The filing is mutated in memory only; the caller persists it. The
    /// owner joins the reviewer's clients unless already a member, and the
    /// owner's user record is pointed at the reviewer.
    ///
    /// # Errors
    ///
    /// Returns [`super::FilingServiceError::Service`] when a collaborator
    /// fails. An empty directory is not an error.
    pub async fn assign(
        &self,
        filing: &mut Filing,
        clock: &(impl Clock + Sync),
    ) -> FilingServiceResult<AssignmentOutcome> {
        if let Some(existing) = filing.review().assigned_ca() {
            debug!(filing_id = %filing.id(), ca_id = %existing, "reviewer already assigned");
            return Ok(AssignmentOutcome::AlreadyAssigned(existing));
        }

        let ranked = self.directory.rank_by_load().await?;
        let Some(chosen) = ranked.first() else {
            warn!(
                filing_id = %filing.id(),
                "no chartered accountant available; filing proceeds unassigned"
            );
            return Ok(AssignmentOutcome::NoReviewerAvailable);
        };
        let ca = chosen.id();
        let owner = filing.owner();

        let added = self.directory.add_client(ca, owner).await?;
        self.users.set_assigned_ca(owner, ca).await?;
        filing.assign_reviewer(ca, clock);

        info!(
            filing_id = %filing.id(),
            ca_id = %ca,
            client_count = chosen.client_count() + usize::from(added),
            "assigned reviewer"
        );
        Ok(AssignmentOutcome::Assigned(ca))
    }
}
