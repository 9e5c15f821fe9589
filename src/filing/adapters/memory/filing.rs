//! In-memory repository for filing lifecycle tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::filing::{
    domain::{AcknowledgementNumber, CaId, Filing, FilingId, UserId},
    ports::{FilingRepository, FilingRepositoryError, FilingRepositoryResult},
};

/// Thread-safe in-memory filing repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFilingRepository {
    state: Arc<RwLock<InMemoryFilingState>>,
}

#[derive(Debug, Default)]
struct InMemoryFilingState {
    filings: HashMap<FilingId, Filing>,
    acknowledgement_index: HashMap<AcknowledgementNumber, FilingId>,
}

impl InMemoryFilingRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> FilingRepositoryError {
    FilingRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

/// Collects filings matching `predicate`, newest first.
fn collect_newest_first(
    state: &InMemoryFilingState,
    predicate: impl Fn(&Filing) -> bool,
) -> Vec<Filing> {
    let mut filings: Vec<Filing> = state
        .filings
        .values()
        .filter(|filing| predicate(filing))
        .cloned()
        .collect();
    filings.sort_by(|left, right| {
        right
            .created_at()
            .cmp(&left.created_at())
            .then_with(|| right.id().cmp(&left.id()))
    });
    filings
}

fn ensure_acknowledgement_free(
    state: &InMemoryFilingState,
    filing: &Filing,
) -> FilingRepositoryResult<()> {
    let Some(acknowledgement) = filing.acknowledgement() else {
        return Ok(());
    };
    match state.acknowledgement_index.get(&acknowledgement.number) {
        Some(owner) if *owner != filing.id() => Err(
            FilingRepositoryError::DuplicateAcknowledgement(acknowledgement.number.clone()),
        ),
        _ => Ok(()),
    }
}

fn index_acknowledgement(state: &mut InMemoryFilingState, filing: &Filing) {
    if let Some(acknowledgement) = filing.acknowledgement() {
        state
            .acknowledgement_index
            .insert(acknowledgement.number.clone(), filing.id());
    }
}

#[async_trait]
impl FilingRepository for InMemoryFilingRepository {
    async fn store(&self, filing: &Filing) -> FilingRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.filings.contains_key(&filing.id()) {
            return Err(FilingRepositoryError::DuplicateFiling(filing.id()));
        }
        ensure_acknowledgement_free(&state, filing)?;

        index_acknowledgement(&mut state, filing);
        state.filings.insert(filing.id(), filing.clone());
        Ok(())
    }

    async fn update(&self, filing: &Filing, expected_version: u64) -> FilingRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;

        let stored_version = state
            .filings
            .get(&filing.id())
            .ok_or(FilingRepositoryError::NotFound(filing.id()))?
            .version();
        if stored_version != expected_version {
            return Err(FilingRepositoryError::VersionConflict {
                filing_id: filing.id(),
                expected: expected_version,
                actual: stored_version,
            });
        }
        ensure_acknowledgement_free(&state, filing)?;

        index_acknowledgement(&mut state, filing);
        state.filings.insert(filing.id(), filing.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: FilingId) -> FilingRepositoryResult<Option<Filing>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.filings.get(&id).cloned())
    }

    async fn find_by_owner(&self, owner: UserId) -> FilingRepositoryResult<Vec<Filing>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(collect_newest_first(&state, |filing| filing.owner() == owner))
    }

    async fn find_by_reviewer(&self, ca: CaId) -> FilingRepositoryResult<Vec<Filing>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(collect_newest_first(&state, |filing| {
            filing.review().is_assigned_to(ca)
        }))
    }

    async fn acknowledgement_exists(
        &self,
        number: &AcknowledgementNumber,
    ) -> FilingRepositoryResult<bool> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.acknowledgement_index.contains_key(number))
    }
}
