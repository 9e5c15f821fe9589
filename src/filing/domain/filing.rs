//! Filing aggregate root.

use super::{
    Acknowledgement, AcknowledgementNumber, AssessmentYear, CaId, CaReview, Comment, CommentId,
    FilingDomainError, FilingId, FilingInputs, FilingStatus, FilingTrigger, FilingUpdate,
    TaxCalculation, UserId, transition,
};
use crate::tax;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// One user's return for one assessment year.
///
/// Every mutating method validates first and only then writes, so a rejected
/// operation leaves the filing untouched. Each successful mutation bumps
/// [`Filing::version`], which repositories use for conditional writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filing {
    id: FilingId,
    owner: UserId,
    assessment_year: AssessmentYear,
    status: FilingStatus,
    inputs: FilingInputs,
    tax_calculation: TaxCalculation,
    review: CaReview,
    acknowledgement: Option<Acknowledgement>,
    version: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted filing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedFilingData {
    /// Persisted filing identifier.
    pub id: FilingId,
    /// Persisted owner reference.
    pub owner: UserId,
    /// Persisted assessment year.
    pub assessment_year: AssessmentYear,
    /// Persisted lifecycle status.
    pub status: FilingStatus,
    /// Persisted taxpayer inputs.
    pub inputs: FilingInputs,
    /// Persisted tax snapshot.
    pub tax_calculation: TaxCalculation,
    /// Persisted review state.
    pub review: CaReview,
    /// Persisted acknowledgement, present only for filed returns.
    pub acknowledgement: Option<Acknowledgement>,
    /// Persisted version counter.
    pub version: u64,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Filing {
    /// Creates a draft filing with a freshly computed tax snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`FilingDomainError::NegativeAmount`] when any input amount is
    /// negative and [`FilingDomainError::AmountTooLarge`] when a total
    /// overflows.
    pub fn new(
        owner: UserId,
        assessment_year: AssessmentYear,
        inputs: FilingInputs,
        clock: &impl Clock,
    ) -> Result<Self, FilingDomainError> {
        inputs.validate()?;
        let timestamp = clock.utc();
        let tax_calculation = snapshot(&inputs)?;

        Ok(Self {
            id: FilingId::new(),
            owner,
            assessment_year,
            status: FilingStatus::Draft,
            inputs,
            tax_calculation,
            review: CaReview::default(),
            acknowledgement: None,
            version: 0,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a filing from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedFilingData) -> Self {
        Self {
            id: data.id,
            owner: data.owner,
            assessment_year: data.assessment_year,
            status: data.status,
            inputs: data.inputs,
            tax_calculation: data.tax_calculation,
            review: data.review,
            acknowledgement: data.acknowledgement,
            version: data.version,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the filing identifier.
    #[must_use]
    pub const fn id(&self) -> FilingId {
        self.id
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn owner(&self) -> UserId {
        self.owner
    }

    /// Returns the assessment year.
    #[must_use]
    pub const fn assessment_year(&self) -> AssessmentYear {
        self.assessment_year
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> FilingStatus {
        self.status
    }

    /// Returns the taxpayer inputs.
    #[must_use]
    pub const fn inputs(&self) -> &FilingInputs {
        &self.inputs
    }

    /// Returns the last computed tax snapshot.
    #[must_use]
    pub const fn tax_calculation(&self) -> &TaxCalculation {
        &self.tax_calculation
    }

    /// Returns the review state.
    #[must_use]
    pub const fn review(&self) -> &CaReview {
        &self.review
    }

    /// Returns the acknowledgement; present if and only if the filing is
    /// filed.
    #[must_use]
    pub const fn acknowledgement(&self) -> Option<&Acknowledgement> {
        self.acknowledgement.as_ref()
    }

    /// Returns the optimistic-concurrency version.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Moves a draft to `pending_review`.
    ///
    /// # Errors
    ///
    /// Returns [`FilingDomainError::InvalidTransition`] unless the filing is a
    /// draft.
    pub fn request_review(&mut self, clock: &impl Clock) -> Result<(), FilingDomainError> {
        self.status = transition(self.status, FilingTrigger::RequestReview)?;
        self.touch(clock);
        Ok(())
    }

    /// Moves a draft straight to `submitted`, bypassing review.
    ///
    /// # Errors
    ///
    /// Returns [`FilingDomainError::InvalidTransition`] unless the filing is a
    /// draft.
    pub fn submit(&mut self, clock: &impl Clock) -> Result<(), FilingDomainError> {
        self.status = transition(self.status, FilingTrigger::Submit)?;
        self.touch(clock);
        Ok(())
    }

    /// Applies a partial update to the inputs and recomputes the tax
    /// snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`FilingDomainError::InvalidTransition`] outside `draft` and
    /// `action_required`, or a validation error for the new inputs.
    pub fn update_inputs(
        &mut self,
        update: FilingUpdate,
        clock: &impl Clock,
    ) -> Result<(), FilingDomainError> {
        let next_status = transition(self.status, FilingTrigger::Edit)?;
        let next_inputs = update.apply_to(&self.inputs);
        next_inputs.validate()?;
        let next_calculation = snapshot(&next_inputs)?;

        self.status = next_status;
        self.inputs = next_inputs;
        self.tax_calculation = next_calculation;
        self.touch(clock);
        Ok(())
    }

    /// Records `ca` as the reviewer unless one is already assigned.
    ///
    /// Returns `true` when the reviewer was set by this call.
    pub fn assign_reviewer(&mut self, ca: CaId, clock: &impl Clock) -> bool {
        let assigned = self.review.assign(ca);
        if assigned {
            self.touch(clock);
        }
        assigned
    }

    /// Appends an unresolved comment and moves the filing to
    /// `action_required`, revoking any earlier approval.
    ///
    /// # Errors
    ///
    /// Returns [`FilingDomainError::InvalidTransition`] outside the review
    /// states, or a validation error for a blank section or text.
    pub fn add_comment(
        &mut self,
        section: impl Into<String>,
        text: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<Comment, FilingDomainError> {
        let next_status = transition(self.status, FilingTrigger::AddComment)?;
        let timestamp = clock.utc();
        let comment = Comment::new(section, text, timestamp)?;

        self.status = next_status;
        let added = self.review.push(comment);
        self.touch(clock);
        Ok(added)
    }

    /// Marks a comment resolved. The status is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`FilingDomainError::CommentNotFound`] when no such comment
    /// exists.
    pub fn resolve_comment(
        &mut self,
        comment_id: CommentId,
        clock: &impl Clock,
    ) -> Result<Comment, FilingDomainError> {
        let resolved = self.review.resolve(comment_id)?.clone();
        self.touch(clock);
        Ok(resolved)
    }

    /// Approves the filing and stamps `reviewed_at`.
    ///
    /// Re-approving an approved filing succeeds and re-stamps the timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`FilingDomainError::UnresolvedComments`] while any comment is
    /// open, or [`FilingDomainError::InvalidTransition`] outside the review
    /// states.
    pub fn approve(&mut self, clock: &impl Clock) -> Result<(), FilingDomainError> {
        let unresolved = self.review.unresolved_count();
        if unresolved > 0 {
            return Err(FilingDomainError::UnresolvedComments(unresolved));
        }
        self.status = transition(self.status, FilingTrigger::Approve)?;
        self.review.mark_reviewed(clock.utc());
        self.touch(clock);
        Ok(())
    }

    /// Files the return under `number`.
    ///
    /// # Errors
    ///
    /// Returns [`FilingDomainError::InvalidTransition`] unless the filing is
    /// `approved` or `submitted`; a second call on a filed return therefore
    /// fails.
    pub fn file(
        &mut self,
        number: AcknowledgementNumber,
        clock: &impl Clock,
    ) -> Result<(), FilingDomainError> {
        self.status = transition(self.status, FilingTrigger::File)?;
        self.acknowledgement = Some(Acknowledgement {
            number,
            filed_at: clock.utc(),
        });
        self.touch(clock);
        Ok(())
    }

    /// Recomputes the tax snapshot from the current inputs.
    ///
    /// # Errors
    ///
    /// Returns [`FilingDomainError::NegativeAmount`] when stored inputs are
    /// negative and [`FilingDomainError::AmountTooLarge`] when a total
    /// overflows.
    pub fn recompute_tax(&mut self) -> Result<&TaxCalculation, FilingDomainError> {
        self.tax_calculation = snapshot(&self.inputs)?;
        Ok(&self.tax_calculation)
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
        self.version += 1;
    }
}

fn snapshot(inputs: &FilingInputs) -> Result<TaxCalculation, FilingDomainError> {
    Ok(tax::assess(&inputs.to_tax_inputs()?)?.into())
}
