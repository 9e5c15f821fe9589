//! Acknowledgement generation and final e-filing.

use super::{
    AcknowledgementReceipt, ConflictReason, FilingServiceError, FilingServiceResult,
    scope::load_owned,
};
use crate::filing::{
    domain::{
        AcknowledgementNumber, AcknowledgementPrefix, AssessmentYear, Filing, FilingId,
        FilingTrigger, UserId, transition,
    },
    ports::FilingRepository,
};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Default number of candidate numbers tried before giving up.
pub const DEFAULT_ACKNOWLEDGEMENT_ATTEMPTS: u32 = 5;

/// Source of randomness for acknowledgement suffixes.
pub trait AcknowledgementSource: Send + Sync {
    /// Returns fresh entropy; the low twelve decimal digits become the
    /// suffix.
    fn next_entropy(&self) -> u128;
}

/// Draws suffix entropy from random UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidAcknowledgementSource;

impl AcknowledgementSource for UuidAcknowledgementSource {
    fn next_entropy(&self) -> u128 {
        Uuid::new_v4().as_u128()
    }
}

/// Acknowledgement generation settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcknowledgementSettings {
    prefix: AcknowledgementPrefix,
    max_attempts: u32,
}

impl AcknowledgementSettings {
    /// Creates settings; `max_attempts` is raised to at least one.
    #[must_use]
    pub fn new(prefix: AcknowledgementPrefix, max_attempts: u32) -> Self {
        Self {
            prefix,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Returns the number prefix.
    #[must_use]
    pub const fn prefix(&self) -> &AcknowledgementPrefix {
        &self.prefix
    }

    /// Returns how many candidates are tried.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

impl Default for AcknowledgementSettings {
    fn default() -> Self {
        Self::new(
            AcknowledgementPrefix::default(),
            DEFAULT_ACKNOWLEDGEMENT_ATTEMPTS,
        )
    }
}

/// Outcome of filing a return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiledReturn {
    /// Issued acknowledgement number.
    pub acknowledgement_number: AcknowledgementNumber,
    /// The filing in its terminal state.
    pub filing: Filing,
}

impl FiledReturn {
    /// Returns the receipt for this return.
    #[must_use]
    pub fn receipt(&self) -> Option<AcknowledgementReceipt> {
        AcknowledgementReceipt::from_filing(&self.filing)
    }
}

/// Final e-filing service.
#[derive(Clone)]
pub struct EFilingService<R, A, C>
where
    R: FilingRepository,
    A: AcknowledgementSource,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    source: Arc<A>,
    settings: AcknowledgementSettings,
    clock: Arc<C>,
}

impl<R, A, C> EFilingService<R, A, C>
where
    R: FilingRepository,
    A: AcknowledgementSource,
    C: Clock + Send + Sync,
{
    /// Creates a new e-filing service.
    #[must_use]
    pub const fn new(
        repository: Arc<R>,
        source: Arc<A>,
        settings: AcknowledgementSettings,
        clock: Arc<C>,
    ) -> Self {
        Self {
            repository,
            source,
            settings,
            clock,
        }
    }

    /// Files an approved or submitted return and stamps its acknowledgement.
    ///
    /// A second call on the same filing fails because `filed` no longer
    /// accepts the trigger.
    ///
    /// # Errors
    ///
    /// Returns [`FilingServiceError::Validation`] unless the filing is
    /// `approved` or `submitted`, and [`FilingServiceError::Conflict`] when no
    /// unused number could be generated or another writer won.
    pub async fn file_return(
        &self,
        owner: UserId,
        filing_id: FilingId,
    ) -> FilingServiceResult<FiledReturn> {
        let mut filing = load_owned(&*self.repository, owner, filing_id).await?;
        let expected_version = filing.version();
        transition(filing.status(), FilingTrigger::File)?;

        let number = self.generate(filing.assessment_year()).await?;
        filing.file(number.clone(), &*self.clock)?;
        self.repository.update(&filing, expected_version).await?;

        info!(
            filing_id = %filing_id,
            acknowledgement_number = %number,
            "return filed"
        );
        Ok(FiledReturn {
            acknowledgement_number: number,
            filing,
        })
    }

    async fn generate(&self, year: AssessmentYear) -> FilingServiceResult<AcknowledgementNumber> {
        let attempts = self.settings.max_attempts();
        for attempt in 1..=attempts {
            let candidate = AcknowledgementNumber::compose(
                self.settings.prefix(),
                year,
                self.source.next_entropy(),
            );
            if !self.repository.acknowledgement_exists(&candidate).await? {
                return Ok(candidate);
            }
            debug!(attempt, candidate = %candidate, "acknowledgement number taken");
        }
        Err(FilingServiceError::Conflict(
            ConflictReason::AcknowledgementExhausted { attempts },
        ))
    }
}
