//! Taxpayer-facing filing lifecycle: create, edit, route, and read.

use super::{
    AssignmentOutcome, CaAssignmentPolicy, FilingServiceResult,
    scope::load_owned,
};
use crate::filing::{
    domain::{
        AssessmentYear, Filing, FilingDomainError, FilingId, FilingInputs, FilingStatus,
        FilingUpdate, UserId,
    },
    ports::{CaDirectory, FilingRepository, UserDirectory},
};
use mockable::Clock;
use std::sync::Arc;
use tracing::info;

/// Request payload for creating a filing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateFilingRequest {
    owner: UserId,
    assessment_year: Option<AssessmentYear>,
    inputs: FilingInputs,
    initial_status: FilingStatus,
}

impl CreateFilingRequest {
    /// Creates a request for an empty draft owned by `owner`.
    #[must_use]
    pub fn new(owner: UserId) -> Self {
        Self {
            owner,
            assessment_year: None,
            inputs: FilingInputs::default(),
            initial_status: FilingStatus::Draft,
        }
    }

    /// Sets the assessment year; the current year is used otherwise.
    #[must_use]
    pub const fn with_assessment_year(mut self, year: AssessmentYear) -> Self {
        self.assessment_year = Some(year);
        self
    }

    /// Sets the taxpayer inputs.
    #[must_use]
    pub fn with_inputs(mut self, inputs: FilingInputs) -> Self {
        self.inputs = inputs;
        self
    }

    /// Requests `pending_review` or `submitted` instead of `draft`.
    #[must_use]
    pub const fn with_initial_status(mut self, status: FilingStatus) -> Self {
        self.initial_status = status;
        self
    }
}

/// Filing lifecycle orchestration service.
#[derive(Clone)]
pub struct FilingLifecycleService<R, D, U, C>
where
    R: FilingRepository,
    D: CaDirectory,
    U: UserDirectory,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    assignment: CaAssignmentPolicy<D, U>,
    clock: Arc<C>,
}

impl<R, D, U, C> FilingLifecycleService<R, D, U, C>
where
    R: FilingRepository,
    D: CaDirectory,
    U: UserDirectory,
    C: Clock + Send + Sync,
{
    /// Creates a new lifecycle service.
    #[must_use]
    pub const fn new(
        repository: Arc<R>,
        assignment: CaAssignmentPolicy<D, U>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            repository,
            assignment,
            clock,
        }
    }

    /// Creates a filing with a computed tax snapshot.
    ///
    /// A filing created in `pending_review` runs reviewer assignment before
    /// it is stored.
    ///
    /// # Errors
    ///
    /// Returns [`super::FilingServiceError::Validation`] for negative or
    /// oversized amounts, an unsupported current year, or an initial status
    /// other than `draft`, `pending_review`, or `submitted`, and [`super::FilingServiceError::Service`] when a
    /// collaborator fails.
    pub async fn create_filing(&self, request: CreateFilingRequest) -> FilingServiceResult<Filing> {
        let CreateFilingRequest {
            owner,
            assessment_year,
            inputs,
            initial_status,
        } = request;
        let clock = &*self.clock;

        let year = assessment_year.map_or_else(|| AssessmentYear::current(clock), Ok)?;
        let mut filing = Filing::new(owner, year, inputs, clock)?;
        match initial_status {
            FilingStatus::Draft => {}
            FilingStatus::PendingReview => {
                filing.request_review(clock)?;
                self.assignment.assign(&mut filing, clock).await?;
            }
            FilingStatus::Submitted => filing.submit(clock)?,
            other => return Err(FilingDomainError::InvalidInitialStatus(other).into()),
        }

        self.repository.store(&filing).await?;
        info!(
            filing_id = %filing.id(),
            owner = %owner,
            assessment_year = %year,
            status = %filing.status(),
            "created filing"
        );
        Ok(filing)
    }

    /// Applies a partial update to the owner's filing and recomputes tax.
    ///
    /// # Errors
    ///
    /// Returns [`super::FilingServiceError::NotFound`] when the filing is
    /// absent or owned by someone else, and
    /// [`super::FilingServiceError::Validation`] outside `draft` and
    /// `action_required` or for negative amounts.
    pub async fn update_filing(
        &self,
        owner: UserId,
        filing_id: FilingId,
        update: FilingUpdate,
    ) -> FilingServiceResult<Filing> {
        let mut filing = load_owned(&*self.repository, owner, filing_id).await?;
        let expected_version = filing.version();

        filing.update_inputs(update, &*self.clock)?;
        self.repository.update(&filing, expected_version).await?;
        info!(
            filing_id = %filing_id,
            taxable_income = %filing.tax_calculation().taxable_income,
            "updated filing inputs"
        );
        Ok(filing)
    }

    /// Moves a draft to `pending_review` and assigns a reviewer on first
    /// request.
    ///
    /// # Errors
    ///
    /// Returns [`super::FilingServiceError::Validation`] unless the filing is
    /// a draft. A missing reviewer is not an error.
    pub async fn request_review(
        &self,
        owner: UserId,
        filing_id: FilingId,
    ) -> FilingServiceResult<(Filing, AssignmentOutcome)> {
        let clock = &*self.clock;
        let mut filing = load_owned(&*self.repository, owner, filing_id).await?;
        let expected_version = filing.version();

        filing.request_review(clock)?;
        let outcome = self.assignment.assign(&mut filing, clock).await?;
        self.repository.update(&filing, expected_version).await?;
        info!(filing_id = %filing_id, status = %filing.status(), "review requested");
        Ok((filing, outcome))
    }

    /// Submits a draft directly, bypassing review.
    ///
    /// # Errors
    ///
    /// Returns [`super::FilingServiceError::Validation`] unless the filing is
    /// a draft.
    pub async fn submit(&self, owner: UserId, filing_id: FilingId) -> FilingServiceResult<Filing> {
        let mut filing = load_owned(&*self.repository, owner, filing_id).await?;
        let expected_version = filing.version();

        filing.submit(&*self.clock)?;
        self.repository.update(&filing, expected_version).await?;
        info!(filing_id = %filing_id, "filing submitted without review");
        Ok(filing)
    }

    /// Returns one of the owner's filings.
    ///
    /// # Errors
    ///
    /// Returns [`super::FilingServiceError::NotFound`] when the filing is
    /// absent or owned by someone else.
    pub async fn get_filing(
        &self,
        owner: UserId,
        filing_id: FilingId,
    ) -> FilingServiceResult<Filing> {
        load_owned(&*self.repository, owner, filing_id).await
    }

    /// Returns the owner's filings, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`super::FilingServiceError::Service`] when storage fails.
    pub async fn list_my_filings(&self, owner: UserId) -> FilingServiceResult<Vec<Filing>> {
        Ok(self.repository.find_by_owner(owner).await?)
    }
}
